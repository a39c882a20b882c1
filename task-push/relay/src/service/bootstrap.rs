//! 应用启动器 - 负责依赖注入和服务启动

use anyhow::Result;
use task_push_core::config::TaskPushAppConfig;
use tracing::{error, info};

use crate::config::RelayConfig;
use crate::service::wire::{self, ApplicationContext};

/// 应用启动器
pub struct ApplicationBootstrap;

impl ApplicationBootstrap {
    /// 运行应用的主入口点
    pub async fn run(app_config: &TaskPushAppConfig) -> Result<()> {
        let config = RelayConfig::from_app_config(app_config);
        let context = wire::initialize(&config).await?;
        Self::start(context).await
    }

    /// 启动接入服务与调度器，直到事件来源结束或收到 Ctrl+C
    pub async fn start(context: ApplicationContext) -> Result<()> {
        let ApplicationContext {
            dispatcher,
            sender,
            ingress,
        } = context;

        let ingress_task = ingress.map(|server| {
            tokio::spawn(async move {
                if let Err(e) = server.run().await {
                    error!(error = %e, "push ingress stopped");
                }
            })
        });

        info!("Starting Push Relay");

        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        };
        // 进程内发送端由本函数持有，停机时先停止接入再释放
        let summary = dispatcher.run_until(shutdown).await;

        if let Some(task) = ingress_task {
            task.abort();
        }
        drop(sender);

        info!(
            dispatched = summary.dispatched,
            fulfilled = summary.fulfilled,
            rejected = summary.rejected,
            "Push Relay stopped"
        );
        Ok(())
    }
}
