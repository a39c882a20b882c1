//! 领域服务

mod schedule_planner;
mod task_domain_service;

pub use schedule_planner::{DEFAULT_START_TIME, DEFAULT_TIME_ZONE, PlanError, SchedulePlanner};
pub use task_domain_service::TaskDomainService;
