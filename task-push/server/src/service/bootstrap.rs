//! 应用启动器 - 负责依赖注入和服务启动

use anyhow::Result;
use task_push_core::config::TaskPushAppConfig;
use tracing::{error, info};

use crate::config::PushServerConfig;
use crate::service::wire::{self, ApplicationContext};

/// 应用启动器
pub struct ApplicationBootstrap;

impl ApplicationBootstrap {
    /// 运行应用的主入口点
    pub async fn run(app_config: &TaskPushAppConfig) -> Result<()> {
        let config = PushServerConfig::from_app_config(app_config);
        let context = wire::initialize(&config, app_config).await?;
        Self::start(context).await
    }

    /// 启动 HTTP 服务（以及进程内中继），直到收到 Ctrl+C
    pub async fn start(context: ApplicationContext) -> Result<()> {
        let ApplicationContext { server, relay } = context;

        info!("Starting Task Push Server");

        // 中继的事件来源随发送器一起关闭，HTTP 服务停止后自然排空
        let relay_task = relay.map(|dispatcher| tokio::spawn(dispatcher.run()));

        server.run_until(shutdown_signal()).await?;

        if let Some(task) = relay_task {
            match task.await {
                Ok(summary) => info!(
                    dispatched = summary.dispatched,
                    fulfilled = summary.fulfilled,
                    rejected = summary.rejected,
                    "In-process relay stopped"
                ),
                Err(e) => error!(error = %e, "in-process relay aborted"),
            }
        }

        info!("Task Push Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
