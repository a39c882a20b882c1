pub mod desktop;
pub mod log;
pub mod memory;
pub mod webhook;

use std::sync::Arc;

use anyhow::{Result, anyhow};

use crate::config::RelayConfig;
use crate::domain::repository::NotificationDisplay;

pub use desktop::DesktopNotificationDisplay;
pub use log::LogNotificationDisplay;
pub use memory::{DisplayedNotification, MemoryNotificationDisplay};
pub use webhook::WebhookNotificationDisplay;

pub type NotificationDisplayRef = Arc<dyn NotificationDisplay>;

/// 根据配置构建通知展示后端
pub fn build_notification_display(config: &RelayConfig) -> Result<NotificationDisplayRef> {
    match config.display_provider.as_str() {
        "log" => Ok(LogNotificationDisplay::shared()),
        "memory" => Ok(MemoryNotificationDisplay::shared()),
        "desktop" => Ok(DesktopNotificationDisplay::shared()),
        "webhook" => {
            let endpoint = config
                .display_webhook_endpoint
                .as_deref()
                .ok_or_else(|| anyhow!("webhook display requires display_webhook_endpoint"))?;
            Ok(Arc::new(WebhookNotificationDisplay::new(endpoint)?))
        }
        other => Err(anyhow!("unknown display provider: {}", other)),
    }
}
