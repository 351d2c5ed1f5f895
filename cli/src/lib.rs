//! CLI utilities for qari.
//!
//! This crate provides configuration, directory layout and output helpers
//! for the `qari` command.

pub mod config;
pub mod output;
pub mod paths;

pub use config::{Config, load_config};
pub use output::{Output, OutputFormat, round2};
pub use paths::Paths;
