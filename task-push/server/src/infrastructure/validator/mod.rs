//! 请求校验基础设施层

pub mod request_validator;

pub use request_validator::RequestValidatorImpl;

use task_push_core::error::Result;

use crate::domain::model::{PushSubscription, Task};

/// 请求校验器 trait
pub trait RequestValidator: Send + Sync {
    /// 校验新增任务
    fn validate_task(&self, task: &Task) -> Result<()>;

    /// 校验推送订阅
    fn validate_subscription(&self, subscription: &PushSubscription) -> Result<()>;
}
