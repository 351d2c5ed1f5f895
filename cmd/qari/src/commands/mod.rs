//! CLI commands module.

mod add;
mod build;
mod config;
mod list;
mod recognize;
mod util;

pub use add::AddCommand;
pub use build::BuildCommand;
pub use config::ConfigCommand;
pub use list::ListCommand;
pub use recognize::RecognizeCommand;

// Re-export utils for use in commands
pub(crate) use util::*;
