//! 请求校验器实现

use task_push_core::bail_code;
use task_push_core::error::{ErrorCode, Result};
use url::Url;

use crate::domain::model::{PushSubscription, Task};

const MAX_TASK_NAME_LEN: usize = 200;

/// 请求校验器实现
pub struct RequestValidatorImpl;

impl RequestValidatorImpl {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RequestValidatorImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl crate::infrastructure::validator::RequestValidator for RequestValidatorImpl {
    fn validate_task(&self, task: &Task) -> Result<()> {
        if task.name.trim().is_empty() {
            bail_code!(ErrorCode::InvalidParameter, "task name cannot be empty");
        }

        if task.name.chars().count() > MAX_TASK_NAME_LEN {
            bail_code!(
                ErrorCode::InvalidParameter,
                format!("task name exceeds maximum length of {}", MAX_TASK_NAME_LEN)
            );
        }

        // 其余字段按原样保存，由日程规划时再解析
        Ok(())
    }

    fn validate_subscription(&self, subscription: &PushSubscription) -> Result<()> {
        let Ok(endpoint) = Url::parse(&subscription.endpoint) else {
            bail_code!(ErrorCode::InvalidParameter, "subscription endpoint is not a valid url");
        };

        if !matches!(endpoint.scheme(), "http" | "https") {
            bail_code!(
                ErrorCode::InvalidParameter,
                "subscription endpoint must use http or https"
            );
        }

        Ok(())
    }
}
