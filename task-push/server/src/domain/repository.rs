//! 仓储接口（Port）

use async_trait::async_trait;
use task_push_core::error::Result;

use crate::domain::model::{PushSubscription, Task};

/// 任务存储（整表读写）
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn load_tasks(&self) -> Result<Vec<Task>>;
    async fn save_tasks(&self, tasks: &[Task]) -> Result<()>;
}

/// 订阅存储（整表读写）
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn load_subscriptions(&self) -> Result<Vec<PushSubscription>>;
    async fn save_subscriptions(&self, subscriptions: &[PushSubscription]) -> Result<()>;
}

/// 推送发送器
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, subscription: &PushSubscription, payload: &str) -> Result<()>;
}
