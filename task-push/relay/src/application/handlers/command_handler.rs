//! 命令处理器（编排层）- 轻量级，只负责编排领域服务

use std::sync::Arc;

use tracing::instrument;

use crate::application::commands::HandlePushEventCommand;
use crate::domain::lifetime::LifetimeExtension;
use crate::domain::service::PushRelayDomainService;

/// 中继命令处理器（编排层）
pub struct RelayCommandHandler {
    domain_service: Arc<PushRelayDomainService>,
}

impl RelayCommandHandler {
    pub fn new(domain_service: Arc<PushRelayDomainService>) -> Self {
        Self { domain_service }
    }

    /// 处理推送事件命令，返回本次调用需要等待的操作集合
    #[instrument(skip_all, fields(event_id = %command.event.id))]
    pub fn handle_push_event(&self, command: HandlePushEventCommand) -> LifetimeExtension {
        let mut extension = LifetimeExtension::new();
        self.domain_service
            .handle_push(&command.event, &mut extension);
        extension
    }
}
