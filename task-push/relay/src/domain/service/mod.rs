//! 领域服务

mod relay_domain_service;

pub use relay_domain_service::PushRelayDomainService;
