mod dispatcher;

pub use dispatcher::{DispatchSummary, PushEventDispatcher, run_invocation};
