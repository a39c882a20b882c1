//! Task Push Core 公共库
//!
//! 提供统一的配置加载、错误类型和日志初始化

pub mod config;
pub mod error;
pub mod tracing;

pub use config::{
    ConfigManager, LogFormat, LoggingConfig, PushServerServiceConfig, RelayServiceConfig,
    ServicesConfig, TaskPushAppConfig, app_config, load_config,
};
pub use error::*;
