//! 仓储接口（Port）

use async_trait::async_trait;

use crate::domain::lifetime::PendingOperation;
use crate::domain::model::{NotificationRequest, PushEvent};

/// 宿主的通知展示能力
///
/// 调用立即返回一个待完成操作，展示结果通过该操作异步给出。
pub trait NotificationDisplay: Send + Sync {
    fn show_notification(&self, request: NotificationRequest) -> PendingOperation;
}

/// 推送事件来源，返回 `None` 表示事件流结束
#[async_trait]
pub trait PushEventSource: Send {
    async fn next_event(&mut self) -> Option<PushEvent>;
}
