pub mod channel;
pub mod stdin;

pub use channel::{ChannelPushEventSource, PushEventSender, push_event_channel};
pub use stdin::StdinPushEventSource;
