//! CLI, apartment catalog configuration, output rendering
//!
//! This crate provides the `lakecal` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
