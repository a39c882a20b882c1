//! 推送事件调度器 - 宿主事件循环
//!
//! 每个事件对应一次独立的处理调用；调用之间可以重叠，不保证顺序。
//! 调用在其 `wait_until` 收到的全部操作结束后才被回收。

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::application::commands::HandlePushEventCommand;
use crate::application::handlers::RelayCommandHandler;
use crate::domain::lifetime::SettleReport;
use crate::domain::model::PushEvent;
use crate::domain::repository::PushEventSource;

/// 调度统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub dispatched: usize,
    pub fulfilled: usize,
    pub rejected: usize,
}

impl DispatchSummary {
    fn absorb(&mut self, outcome: std::result::Result<SettleReport, JoinError>) {
        match outcome {
            Ok(report) => {
                self.fulfilled += report.fulfilled.len();
                self.rejected += report.rejected.len();
            }
            Err(e) => {
                error!(error = %e, "push handler invocation aborted");
                self.rejected += 1;
            }
        }
    }
}

/// 执行一次处理调用并等待其所有待完成操作结束
///
/// 失败只记录日志，不向调用方传播。
pub async fn run_invocation(handler: &RelayCommandHandler, event: PushEvent) -> SettleReport {
    let event_id = event.id;
    let extension = handler.handle_push_event(HandlePushEventCommand { event });
    let report = extension.settle().await;

    for (operation_id, err) in &report.rejected {
        warn!(%event_id, %operation_id, error = %err, "pending operation rejected");
    }
    debug!(
        %event_id,
        fulfilled = report.fulfilled.len(),
        rejected = report.rejected.len(),
        "push handler invocation settled"
    );

    report
}

pub struct PushEventDispatcher {
    source: Box<dyn PushEventSource>,
    command_handler: Arc<RelayCommandHandler>,
    in_flight: Arc<Semaphore>,
}

impl PushEventDispatcher {
    pub fn new(
        source: Box<dyn PushEventSource>,
        command_handler: Arc<RelayCommandHandler>,
        max_in_flight: usize,
    ) -> Self {
        Self {
            source,
            command_handler,
            in_flight: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// 运行到事件来源结束
    pub async fn run(self) -> DispatchSummary {
        self.run_until(std::future::pending::<()>()).await
    }

    /// 运行到事件来源结束或收到停机信号；停机后不再接收新事件，
    /// 但会等待已开始的调用全部结束
    pub async fn run_until<S>(mut self, shutdown: S) -> DispatchSummary
    where
        S: Future<Output = ()>,
    {
        info!("Starting push event dispatcher");

        let mut invocations: JoinSet<SettleReport> = JoinSet::new();
        let mut summary = DispatchSummary::default();
        tokio::pin!(shutdown);

        loop {
            let event = tokio::select! {
                event = self.source.next_event() => event,
                _ = &mut shutdown => {
                    info!("shutdown requested, draining in-flight push handlers");
                    break;
                }
            };

            let Some(event) = event else {
                debug!("push event source closed");
                break;
            };

            let permit = match Arc::clone(&self.in_flight).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };

            summary.dispatched += 1;
            let handler = Arc::clone(&self.command_handler);
            invocations.spawn(async move {
                let report = run_invocation(&handler, event).await;
                drop(permit);
                report
            });

            while let Some(outcome) = invocations.try_join_next() {
                summary.absorb(outcome);
            }
        }

        while let Some(outcome) = invocations.join_next().await {
            summary.absorb(outcome);
        }

        info!(
            dispatched = summary.dispatched,
            fulfilled = summary.fulfilled,
            rejected = summary.rejected,
            "push event dispatcher stopped"
        );
        summary
    }
}
