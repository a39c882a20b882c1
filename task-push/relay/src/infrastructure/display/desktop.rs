//! 桌面系统通知（freedesktop / macOS）

use std::sync::Arc;

use notify_rust::Notification;
use task_push_core::error::{ErrorBuilder, ErrorCode};
use tracing::debug;

use crate::domain::lifetime::PendingOperation;
use crate::domain::model::NotificationRequest;
use crate::domain::repository::NotificationDisplay;

pub struct DesktopNotificationDisplay;

impl DesktopNotificationDisplay {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self)
    }
}

impl NotificationDisplay for DesktopNotificationDisplay {
    fn show_notification(&self, request: NotificationRequest) -> PendingOperation {
        PendingOperation::new(async move {
            // notify-rust 的 show 会阻塞等待通知服务应答
            let shown = tokio::task::spawn_blocking(move || {
                Notification::new()
                    .summary(&request.title)
                    .body(&request.options.body)
                    .icon(&request.options.icon)
                    .show()
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .await
            .map_err(|e| {
                ErrorBuilder::new(ErrorCode::InternalError, "desktop notification task failed")
                    .details(e)
                    .build_error()
            })?;

            shown.map_err(|e| {
                ErrorBuilder::new(ErrorCode::ServiceUnavailable, "desktop notification rejected")
                    .details(e)
                    .build_error()
            })?;

            debug!("desktop notification shown");
            Ok(())
        })
    }
}
