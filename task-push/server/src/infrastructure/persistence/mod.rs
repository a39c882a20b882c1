//! 持久化实现

pub mod json_store;
pub mod memory;

pub use json_store::{JsonFileStore, JsonSubscriptionRepository, JsonTaskRepository};
pub use memory::{InMemorySubscriptionRepository, InMemoryTaskRepository};

pub const TASKS_FILE: &str = "tasks.json";
pub const SUBSCRIPTIONS_FILE: &str = "subscriptions.json";
