use std::sync::Arc;

use tracing::info;

use crate::domain::lifetime::PendingOperation;
use crate::domain::model::NotificationRequest;
use crate::domain::repository::NotificationDisplay;

/// 仅输出日志的展示后端
pub struct LogNotificationDisplay;

impl NotificationDisplay for LogNotificationDisplay {
    fn show_notification(&self, request: NotificationRequest) -> PendingOperation {
        info!(
            title = %request.title,
            body = %request.options.body,
            icon = %request.options.icon,
            "notification displayed"
        );
        PendingOperation::fulfilled()
    }
}

impl LogNotificationDisplay {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self)
    }
}
