//! 进程内推送事件通道

use async_trait::async_trait;
use task_push_core::error::{ErrorBuilder, ErrorCode, Result};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::model::{PushEvent, PushMessageData};
use crate::domain::repository::PushEventSource;

/// 创建一对推送事件发送端 / 事件来源
pub fn push_event_channel(capacity: usize) -> (PushEventSender, ChannelPushEventSource) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (PushEventSender { tx }, ChannelPushEventSource { rx })
}

/// 推送事件发送端，可克隆后在多个生产者之间共享
#[derive(Clone)]
pub struct PushEventSender {
    tx: mpsc::Sender<PushEvent>,
}

impl PushEventSender {
    /// 投递一条负载，返回生成的事件 ID
    pub async fn deliver(&self, data: impl Into<PushMessageData>) -> Result<Uuid> {
        let event = PushEvent::new(Some(data.into()));
        let id = event.id;
        self.deliver_event(event).await?;
        Ok(id)
    }

    pub async fn deliver_event(&self, event: PushEvent) -> Result<()> {
        self.tx.send(event).await.map_err(|_| {
            ErrorBuilder::new(ErrorCode::ServiceUnavailable, "push relay is not accepting events")
                .build_error()
        })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

pub struct ChannelPushEventSource {
    rx: mpsc::Receiver<PushEvent>,
}

#[async_trait]
impl PushEventSource for ChannelPushEventSource {
    async fn next_event(&mut self) -> Option<PushEvent> {
        self.rx.recv().await
    }
}
