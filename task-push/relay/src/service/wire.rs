//! Wire 风格的依赖注入模块
//!
//! 按照依赖顺序构建展示后端、领域服务、事件来源与调度器

use std::sync::Arc;

use anyhow::{Context, Result, bail};

use crate::application::handlers::RelayCommandHandler;
use crate::config::RelayConfig;
use crate::domain::repository::PushEventSource;
use crate::domain::service::PushRelayDomainService;
use crate::infrastructure::display::{NotificationDisplayRef, build_notification_display};
use crate::infrastructure::source::{PushEventSender, StdinPushEventSource, push_event_channel};
use crate::interface::http::IngressServer;
use crate::interface::runtime::PushEventDispatcher;

/// 应用上下文 - 包含所有已初始化的服务
pub struct ApplicationContext {
    pub dispatcher: PushEventDispatcher,
    /// 进程内投递入口（事件来源为 channel / http 时存在）
    pub sender: Option<PushEventSender>,
    pub ingress: Option<IngressServer>,
}

/// 构建应用上下文
pub async fn initialize(config: &RelayConfig) -> Result<ApplicationContext> {
    let display = build_notification_display(config).context("Failed to build notification display")?;
    initialize_with_display(config, display).await
}

/// 使用外部提供的展示后端构建应用上下文
pub async fn initialize_with_display(
    config: &RelayConfig,
    display: NotificationDisplayRef,
) -> Result<ApplicationContext> {
    // 1. 构建领域服务与命令处理器
    let domain_service = Arc::new(PushRelayDomainService::new(display));
    let command_handler = Arc::new(RelayCommandHandler::new(domain_service));

    // 2. 构建事件来源
    let (source, sender, ingress) = match config.event_source.as_str() {
        "stdin" => (
            Box::new(StdinPushEventSource::new()) as Box<dyn PushEventSource>,
            None,
            None,
        ),
        "channel" => {
            let (sender, source) = push_event_channel(config.channel_capacity);
            (Box::new(source) as Box<dyn PushEventSource>, Some(sender), None)
        }
        "http" => {
            let (sender, source) = push_event_channel(config.channel_capacity);
            let ingress = IngressServer::bind(&config.ingress_address, sender.clone())
                .await
                .context("Failed to start push ingress")?;
            (
                Box::new(source) as Box<dyn PushEventSource>,
                Some(sender),
                Some(ingress),
            )
        }
        other => bail!("unknown event source: {}", other),
    };

    // 3. 构建调度器
    let dispatcher = PushEventDispatcher::new(source, command_handler, config.max_in_flight);

    tracing::info!(
        display = %config.display_provider,
        source = %config.event_source,
        max_in_flight = config.max_in_flight,
        "Push Relay initialized"
    );

    Ok(ApplicationContext {
        dispatcher,
        sender,
        ingress,
    })
}
