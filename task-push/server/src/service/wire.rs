//! Wire 风格的依赖注入模块
//!
//! 按照依赖顺序构建仓储、推送发送器、领域服务、处理器与 HTTP 服务

use std::sync::Arc;

use anyhow::{Context, Result};
use task_push_core::config::TaskPushAppConfig;
use task_push_relay::PushEventDispatcher;
use task_push_relay::RelayConfig;

use crate::application::handlers::{TaskCommandHandler, TaskQueryHandler};
use crate::config::PushServerConfig;
use crate::domain::repository::{SubscriptionRepository, TaskRepository};
use crate::domain::service::{SchedulePlanner, TaskDomainService};
use crate::infrastructure::persistence::{JsonSubscriptionRepository, JsonTaskRepository};
use crate::infrastructure::push::build_push_sender;
use crate::infrastructure::validator::RequestValidatorImpl;
use crate::interface::http::{ApiState, HttpServer};

/// 应用上下文 - 包含所有已初始化的服务
pub struct ApplicationContext {
    pub server: HttpServer,
    /// 进程内中继（推送发送器为 loopback 时存在）
    pub relay: Option<PushEventDispatcher>,
}

/// 构建应用上下文
pub async fn initialize(
    config: &PushServerConfig,
    app_config: &TaskPushAppConfig,
) -> Result<ApplicationContext> {
    // 1. 构建仓储
    let tasks: Arc<dyn TaskRepository> = Arc::new(JsonTaskRepository::new(&config.data_dir));
    let subscriptions: Arc<dyn SubscriptionRepository> =
        Arc::new(JsonSubscriptionRepository::new(&config.data_dir));

    // 2. loopback 模式下启动进程内中继
    let (relay, relay_sender) = if config.push_provider == "loopback" {
        let relay_config = RelayConfig {
            event_source: "channel".to_string(),
            ..RelayConfig::from_app_config(app_config)
        };
        let context = task_push_relay::service::initialize(&relay_config)
            .await
            .context("Failed to start in-process relay")?;
        (Some(context.dispatcher), context.sender)
    } else {
        (None, None)
    };

    // 3. 构建推送发送器
    let sender = build_push_sender(config, relay_sender)?;

    // 4. 构建领域服务与处理器
    let domain_service = Arc::new(TaskDomainService::new(
        Arc::clone(&tasks),
        subscriptions,
        sender,
    ));
    let planner = SchedulePlanner::new(&config.schedule_time_zone)
        .context("Invalid schedule time zone")?;
    let command_handler = Arc::new(TaskCommandHandler::new(
        domain_service,
        Arc::new(RequestValidatorImpl::new()),
    ));
    let query_handler = Arc::new(TaskQueryHandler::new(tasks, planner));

    // 5. 构建 HTTP 服务
    let state = ApiState {
        command_handler,
        query_handler,
        vapid_public_key: config.vapid_public_key.clone(),
    };
    let server = HttpServer::bind(&config.address, state).await?;

    tracing::info!(
        address = %config.address,
        data_dir = %config.data_dir,
        push_provider = %config.push_provider,
        "Task Push Server initialized"
    );

    Ok(ApplicationContext { server, relay })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loopback_provider_starts_local_relay() {
        let dir = tempfile::tempdir().unwrap();
        let config = PushServerConfig {
            address: "127.0.0.1:0".to_string(),
            data_dir: dir.path().to_string_lossy().into_owned(),
            push_provider: "loopback".to_string(),
            ..Default::default()
        };

        let context = initialize(&config, &TaskPushAppConfig::default()).await.unwrap();
        assert!(context.relay.is_some());
        assert!(context.server.local_addr().unwrap().port() > 0);
    }

    #[tokio::test]
    async fn noop_provider_has_no_relay() {
        let dir = tempfile::tempdir().unwrap();
        let config = PushServerConfig {
            address: "127.0.0.1:0".to_string(),
            data_dir: dir.path().to_string_lossy().into_owned(),
            push_provider: "noop".to_string(),
            ..Default::default()
        };

        let context = initialize(&config, &TaskPushAppConfig::default()).await.unwrap();
        assert!(context.relay.is_none());
    }
}
