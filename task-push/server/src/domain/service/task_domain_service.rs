//! 任务领域服务 - 任务增删、订阅登记与推送广播

use std::sync::Arc;

use task_push_core::error::Result;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::domain::model::{BroadcastReport, PushSubscription, RemovedTask, Task};
use crate::domain::repository::{PushSender, SubscriptionRepository, TaskRepository};

/// 任务领域服务
///
/// 存储按整表读写，读-改-写过程由各自的锁串行化。
pub struct TaskDomainService {
    tasks: Arc<dyn TaskRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    sender: Arc<dyn PushSender>,
    task_lock: Mutex<()>,
    subscription_lock: Mutex<()>,
}

impl TaskDomainService {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        sender: Arc<dyn PushSender>,
    ) -> Self {
        Self {
            tasks,
            subscriptions,
            sender,
            task_lock: Mutex::new(()),
            subscription_lock: Mutex::new(()),
        }
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.tasks.load_tasks().await
    }

    /// 追加任务并广播 "Task added: {name}"
    #[instrument(skip_all, fields(task = %task.name))]
    pub async fn add_task(&self, task: Task) -> Result<BroadcastReport> {
        let name = task.name.clone();
        {
            let _guard = self.task_lock.lock().await;
            let mut tasks = self.tasks.load_tasks().await?;
            tasks.push(task);
            self.tasks.save_tasks(&tasks).await?;
            info!(total = tasks.len(), "Task added");
        }

        self.broadcast(&format!("Task added: {}", name)).await
    }

    /// 删除指定下标的任务，下标越界时不做任何修改也不广播
    #[instrument(skip(self))]
    pub async fn remove_task(&self, index: usize) -> Result<Option<RemovedTask>> {
        let task = {
            let _guard = self.task_lock.lock().await;
            let mut tasks = self.tasks.load_tasks().await?;
            if index >= tasks.len() {
                debug!(total = tasks.len(), "Task index out of range, nothing removed");
                return Ok(None);
            }
            let task = tasks.remove(index);
            self.tasks.save_tasks(&tasks).await?;
            info!(task = %task.name, total = tasks.len(), "Task removed");
            task
        };

        let broadcast = self.broadcast(&format!("Task removed: {}", task.name)).await?;
        Ok(Some(RemovedTask { task, broadcast }))
    }

    /// 登记订阅，已存在的订阅不会重复保存；返回是否为新增
    #[instrument(skip_all, fields(endpoint = %subscription.endpoint))]
    pub async fn subscribe(&self, subscription: PushSubscription) -> Result<bool> {
        let _guard = self.subscription_lock.lock().await;
        let mut subscriptions = self.subscriptions.load_subscriptions().await?;
        if subscriptions.contains(&subscription) {
            debug!("Subscription already registered");
            return Ok(false);
        }
        subscriptions.push(subscription);
        self.subscriptions.save_subscriptions(&subscriptions).await?;
        info!(total = subscriptions.len(), "Subscription registered");
        Ok(true)
    }

    /// 向所有订阅发送负载
    ///
    /// 单个订阅失败只记录日志，继续发送其余订阅，不重试。
    #[instrument(skip(self))]
    pub async fn broadcast(&self, payload: &str) -> Result<BroadcastReport> {
        let subscriptions = self.subscriptions.load_subscriptions().await?;
        let mut report = BroadcastReport::default();

        for subscription in &subscriptions {
            match self.sender.send(subscription, payload).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(endpoint = %subscription.endpoint, error = %e, "Failed to send push");
                    report.failed += 1;
                }
            }
        }

        debug!(delivered = report.delivered, failed = report.failed, "Broadcast finished");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;
    use task_push_core::error::{ErrorBuilder, ErrorCode};

    use crate::infrastructure::persistence::{
        InMemorySubscriptionRepository, InMemoryTaskRepository,
    };

    #[derive(Default)]
    struct RecordingSender {
        sent: StdMutex<Vec<(String, String)>>,
        failing_endpoint: Option<String>,
    }

    #[async_trait]
    impl PushSender for RecordingSender {
        async fn send(&self, subscription: &PushSubscription, payload: &str) -> Result<()> {
            if self.failing_endpoint.as_deref() == Some(subscription.endpoint.as_str()) {
                return Err(ErrorBuilder::new(ErrorCode::ServiceUnavailable, "gone").build_error());
            }
            self.sent
                .lock()
                .unwrap()
                .push((subscription.endpoint.clone(), payload.to_string()));
            Ok(())
        }
    }

    fn task(name: &str) -> Task {
        Task {
            name: name.to_string(),
            priority: "high".to_string(),
            duration: "30".to_string(),
            energy: "low".to_string(),
            deadline: "2025-06-01".to_string(),
            start_time: Some("10:00".to_string()),
        }
    }

    fn subscription(endpoint: &str) -> PushSubscription {
        PushSubscription {
            endpoint: endpoint.to_string(),
            expiration_time: None,
            keys: None,
        }
    }

    fn service(sender: RecordingSender) -> (TaskDomainService, Arc<RecordingSender>) {
        let sender = Arc::new(sender);
        let service = TaskDomainService::new(
            Arc::new(InMemoryTaskRepository::default()),
            Arc::new(InMemorySubscriptionRepository::default()),
            sender.clone(),
        );
        (service, sender)
    }

    #[tokio::test]
    async fn add_task_broadcasts_to_every_subscription() {
        let (service, sender) = service(RecordingSender::default());
        service.subscribe(subscription("https://push.example.com/a")).await.unwrap();
        service.subscribe(subscription("https://push.example.com/b")).await.unwrap();

        let report = service.add_task(task("Buy milk")).await.unwrap();

        assert_eq!(report, BroadcastReport { delivered: 2, failed: 0 });
        assert_eq!(service.list_tasks().await.unwrap(), vec![task("Buy milk")]);
        let sent = sender.sent.lock().unwrap();
        assert!(sent.iter().all(|(_, payload)| payload == "Task added: Buy milk"));
    }

    #[tokio::test]
    async fn out_of_range_remove_is_a_no_op() {
        let (service, sender) = service(RecordingSender::default());
        service.subscribe(subscription("https://push.example.com/a")).await.unwrap();
        service.add_task(task("Buy milk")).await.unwrap();

        assert!(service.remove_task(1).await.unwrap().is_none());

        assert_eq!(service.list_tasks().await.unwrap().len(), 1);
        assert_eq!(sender.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn remove_task_broadcasts_removed_name() {
        let (service, sender) = service(RecordingSender::default());
        service.subscribe(subscription("https://push.example.com/a")).await.unwrap();
        service.add_task(task("first")).await.unwrap();
        service.add_task(task("second")).await.unwrap();

        let removed = service.remove_task(0).await.unwrap().unwrap();

        assert_eq!(removed.task.name, "first");
        assert_eq!(removed.broadcast.delivered, 1);
        assert_eq!(service.list_tasks().await.unwrap(), vec![task("second")]);
        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.last().unwrap().1, "Task removed: first");
    }

    #[tokio::test]
    async fn duplicate_subscription_is_stored_once() {
        let (service, _) = service(RecordingSender::default());
        assert!(service.subscribe(subscription("https://push.example.com/a")).await.unwrap());
        assert!(!service.subscribe(subscription("https://push.example.com/a")).await.unwrap());

        let report = service.broadcast("hello").await.unwrap();
        assert_eq!(report.delivered, 1);
    }

    #[tokio::test]
    async fn failing_subscription_does_not_stop_broadcast() {
        let (service, sender) = service(RecordingSender {
            failing_endpoint: Some("https://push.example.com/gone".to_string()),
            ..Default::default()
        });
        service.subscribe(subscription("https://push.example.com/gone")).await.unwrap();
        service.subscribe(subscription("https://push.example.com/live")).await.unwrap();

        let report = service.broadcast("Task added: Buy milk").await.unwrap();

        assert_eq!(report, BroadcastReport { delivered: 1, failed: 1 });
        assert_eq!(sender.sent.lock().unwrap()[0].0, "https://push.example.com/live");
    }
}
