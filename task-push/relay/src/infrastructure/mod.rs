//! 基础设施层（Port impl）

pub mod display;
pub mod source;

pub use display::{
    DesktopNotificationDisplay, LogNotificationDisplay, MemoryNotificationDisplay,
    NotificationDisplayRef, WebhookNotificationDisplay, build_notification_display,
};
pub use source::{
    ChannelPushEventSource, PushEventSender, StdinPushEventSource, push_event_channel,
};
