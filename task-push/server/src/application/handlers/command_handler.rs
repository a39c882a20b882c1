//! 命令处理器（编排层）- 先校验请求，再交给领域服务

use std::sync::Arc;

use task_push_core::error::Result;
use tracing::instrument;

use crate::application::commands::{AddTaskCommand, RemoveTaskCommand, SubscribeCommand};
use crate::domain::model::{BroadcastReport, RemovedTask};
use crate::domain::service::TaskDomainService;
use crate::infrastructure::validator::RequestValidator;

/// 任务命令处理器
pub struct TaskCommandHandler {
    domain_service: Arc<TaskDomainService>,
    validator: Arc<dyn RequestValidator>,
}

impl TaskCommandHandler {
    pub fn new(domain_service: Arc<TaskDomainService>, validator: Arc<dyn RequestValidator>) -> Self {
        Self {
            domain_service,
            validator,
        }
    }

    #[instrument(skip(self), fields(task = %command.task.name))]
    pub async fn handle_add_task(&self, command: AddTaskCommand) -> Result<BroadcastReport> {
        self.validator.validate_task(&command.task)?;
        self.domain_service.add_task(command.task).await
    }

    #[instrument(skip(self))]
    pub async fn handle_remove_task(&self, command: RemoveTaskCommand) -> Result<Option<RemovedTask>> {
        self.domain_service.remove_task(command.index).await
    }

    /// 返回订阅是否为新增
    #[instrument(skip(self), fields(endpoint = %command.subscription.endpoint))]
    pub async fn handle_subscribe(&self, command: SubscribeCommand) -> Result<bool> {
        self.validator.validate_subscription(&command.subscription)?;
        self.domain_service.subscribe(command.subscription).await
    }
}
