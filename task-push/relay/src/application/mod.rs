//! 应用服务层（Command）

pub mod commands;
pub mod handlers;

pub use commands::HandlePushEventCommand;
pub use handlers::RelayCommandHandler;
