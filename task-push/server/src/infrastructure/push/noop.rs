//! 空推送发送器（仅记录日志）

use async_trait::async_trait;
use task_push_core::error::Result;
use tracing::debug;

use crate::domain::model::PushSubscription;
use crate::domain::repository::PushSender;

pub struct NoopPushSender;

#[async_trait]
impl PushSender for NoopPushSender {
    async fn send(&self, subscription: &PushSubscription, payload: &str) -> Result<()> {
        debug!(endpoint = %subscription.endpoint, payload, "Push skipped (noop sender)");
        Ok(())
    }
}
