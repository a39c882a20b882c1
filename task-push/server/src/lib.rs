//! 任务推送服务
//!
//! 维护任务列表与推送订阅，在任务增删时向所有订阅广播推送，
//! 并把任务规划为日程草稿。

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interface;
pub mod service;

pub use config::PushServerConfig;
pub use service::ApplicationBootstrap;
