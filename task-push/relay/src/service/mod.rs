pub mod bootstrap;
pub mod wire;

pub use bootstrap::ApplicationBootstrap;
pub use wire::{ApplicationContext, initialize, initialize_with_display};
