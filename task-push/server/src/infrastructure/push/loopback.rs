//! 回环推送发送器：把负载直接投递给进程内的通知中继

use async_trait::async_trait;
use task_push_core::error::Result;
use task_push_relay::PushEventSender;
use tracing::debug;

use crate::domain::model::PushSubscription;
use crate::domain::repository::PushSender;

pub struct LoopbackPushSender {
    relay: PushEventSender,
}

impl LoopbackPushSender {
    pub fn new(relay: PushEventSender) -> Self {
        Self { relay }
    }
}

#[async_trait]
impl PushSender for LoopbackPushSender {
    async fn send(&self, subscription: &PushSubscription, payload: &str) -> Result<()> {
        let event_id = self.relay.deliver(payload).await?;
        debug!(endpoint = %subscription.endpoint, %event_id, "Push delivered to local relay");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use task_push_relay::{PushEventSource, push_event_channel};

    #[tokio::test]
    async fn payload_reaches_relay_source() {
        let (sender, mut source) = push_event_channel(4);
        let loopback = LoopbackPushSender::new(sender);
        let subscription = PushSubscription {
            endpoint: "https://push.example.com/a".to_string(),
            expiration_time: None,
            keys: None,
        };

        loopback.send(&subscription, "Task added: Buy milk").await.unwrap();

        let event = source.next_event().await.unwrap();
        assert_eq!(event.payload_text(), "Task added: Buy milk");
    }
}
