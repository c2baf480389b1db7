pub mod commands;
pub mod config;
pub mod di;
pub mod entity;
pub mod interactor;
pub mod presenter;
pub mod services;
pub mod solana;
pub mod utils;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used items
pub use commands::{handle_command, Command};
pub use crate::config::AppConfig;
pub use di::ServiceContainer;
pub use entity::*;
pub use interactor::*;
pub use presenter::*;
pub use services::*;
pub use solana::*;
pub use view::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
