//! Handler（编排层）

pub mod command_handler;
pub mod query_handler;

pub use command_handler::TaskCommandHandler;
pub use query_handler::TaskQueryHandler;
