//! 推送通知中继
//!
//! 接收推送事件，把负载文本作为正文请求宿主展示一条
//! 标题为 "Task Notification" 的系统通知，并在展示操作结束前保持调用存活。

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interface;
pub mod service;

pub use config::RelayConfig;
pub use domain::{
    LifetimeExtension, NOTIFICATION_ICON_URL, NOTIFICATION_TITLE, NotificationDisplay,
    NotificationOptions, NotificationRequest, OperationId, PendingOperation, PushEvent,
    PushEventSource, PushMessageData, PushRelayDomainService, SettleReport,
};
pub use infrastructure::source::{ChannelPushEventSource, PushEventSender, push_event_channel};
pub use interface::runtime::{DispatchSummary, PushEventDispatcher};
pub use service::ApplicationBootstrap;
