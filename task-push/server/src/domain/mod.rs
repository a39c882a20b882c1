//! 领域层（业务核心逻辑）

pub mod model;
pub mod repository;
pub mod service;

pub use model::{
    BroadcastReport, CalendarEventDraft, EventDateTime, PushSubscription, RemovedTask,
    SchedulePlan, SkippedTask, SubscriptionKeys, Task,
};
pub use repository::{PushSender, SubscriptionRepository, TaskRepository};
pub use service::{SchedulePlanner, TaskDomainService};
