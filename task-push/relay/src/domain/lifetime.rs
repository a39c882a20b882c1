//! 调用生命周期延长（wait_until）
//!
//! 处理函数把待完成操作交给 `LifetimeExtension`，运行时在回收该次调用前
//! 等待所有操作结束。

use std::fmt;
use std::future::{Future, IntoFuture};

use futures::future::{BoxFuture, FutureExt, join_all};
use task_push_core::error::{Result, TaskPushError};
use uuid::Uuid;

/// 待完成操作标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationId(Uuid);

impl OperationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 待完成操作句柄
pub struct PendingOperation {
    id: OperationId,
    future: BoxFuture<'static, Result<()>>,
}

impl PendingOperation {
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            id: OperationId::new(),
            future: future.boxed(),
        }
    }

    pub fn fulfilled() -> Self {
        Self::new(async { Ok(()) })
    }

    pub fn rejected(error: TaskPushError) -> Self {
        Self::new(async move { Err(error) })
    }

    pub fn id(&self) -> OperationId {
        self.id
    }
}

impl fmt::Debug for PendingOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingOperation")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl IntoFuture for PendingOperation {
    type Output = Result<()>;
    type IntoFuture = BoxFuture<'static, Result<()>>;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

/// 单次调用的生命周期延长集合
#[derive(Debug, Default)]
pub struct LifetimeExtension {
    pending: Vec<PendingOperation>,
}

impl LifetimeExtension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wait_until(&mut self, operation: PendingOperation) {
        self.pending.push(operation);
    }

    pub fn pending_ids(&self) -> Vec<OperationId> {
        self.pending.iter().map(PendingOperation::id).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// 等待全部操作结束（成功或失败）
    pub async fn settle(self) -> SettleReport {
        let outcomes = join_all(self.pending.into_iter().map(|operation| {
            let id = operation.id();
            operation.into_future().map(move |result| (id, result))
        }))
        .await;

        let mut report = SettleReport::default();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(()) => report.fulfilled.push(id),
                Err(e) => report.rejected.push((id, e)),
            }
        }
        report
    }
}

/// 结束结果
#[derive(Debug, Default)]
pub struct SettleReport {
    pub fulfilled: Vec<OperationId>,
    pub rejected: Vec<(OperationId, TaskPushError)>,
}

impl SettleReport {
    pub fn settled(&self) -> usize {
        self.fulfilled.len() + self.rejected.len()
    }
}
