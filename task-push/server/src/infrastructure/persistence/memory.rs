//! 内存仓储（测试与嵌入场景）

use async_trait::async_trait;
use task_push_core::error::Result;
use tokio::sync::RwLock;

use crate::domain::model::{PushSubscription, Task};
use crate::domain::repository::{SubscriptionRepository, TaskRepository};

#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryTaskRepository {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
        }
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn load_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.read().await.clone())
    }

    async fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        *self.tasks.write().await = tasks.to_vec();
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: RwLock<Vec<PushSubscription>>,
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn load_subscriptions(&self) -> Result<Vec<PushSubscription>> {
        Ok(self.subscriptions.read().await.clone())
    }

    async fn save_subscriptions(&self, subscriptions: &[PushSubscription]) -> Result<()> {
        *self.subscriptions.write().await = subscriptions.to_vec();
        Ok(())
    }
}
