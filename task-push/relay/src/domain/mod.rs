//! 领域层（中继核心逻辑）

pub mod lifetime;
pub mod model;
pub mod repository;
pub mod service;

pub use lifetime::{LifetimeExtension, OperationId, PendingOperation, SettleReport};
pub use model::{
    NOTIFICATION_ICON_URL, NOTIFICATION_TITLE, NotificationOptions, NotificationRequest,
    PushEvent, PushMessageData,
};
pub use repository::{NotificationDisplay, PushEventSource};
pub use service::PushRelayDomainService;
