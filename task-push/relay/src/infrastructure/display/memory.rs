//! 内存展示后端，记录所有展示请求

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use task_push_core::error::{ErrorBuilder, ErrorCode};

use crate::domain::lifetime::{OperationId, PendingOperation};
use crate::domain::model::NotificationRequest;
use crate::domain::repository::NotificationDisplay;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedNotification {
    pub operation_id: OperationId,
    pub request: NotificationRequest,
}

#[derive(Default)]
pub struct MemoryNotificationDisplay {
    shown: Mutex<Vec<DisplayedNotification>>,
    reject: AtomicBool,
}

impl MemoryNotificationDisplay {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 之后的展示请求全部以失败结束（模拟权限被撤销）
    pub fn set_rejecting(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    pub fn shown(&self) -> Vec<DisplayedNotification> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationDisplay for MemoryNotificationDisplay {
    fn show_notification(&self, request: NotificationRequest) -> PendingOperation {
        let operation = if self.reject.load(Ordering::SeqCst) {
            PendingOperation::rejected(
                ErrorBuilder::new(ErrorCode::ServiceUnavailable, "notification permission denied")
                    .build_error(),
            )
        } else {
            PendingOperation::fulfilled()
        };

        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(DisplayedNotification {
                operation_id: operation.id(),
                request,
            });
        operation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_requests_and_rejects_on_demand() {
        let display = MemoryNotificationDisplay::shared();
        let ok = display.show_notification(NotificationRequest::task_notification("a"));
        assert!(ok.await.is_ok());

        display.set_rejecting(true);
        let failed = display.show_notification(NotificationRequest::task_notification("b"));
        let failed_id = failed.id();
        assert!(failed.await.is_err());

        let shown = display.shown();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[1].operation_id, failed_id);
        assert_eq!(shown[1].request.options.body, "b");
    }
}
