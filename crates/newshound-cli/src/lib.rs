//! Newshound CLI library.
//!
//! Core functionality for the newshound command-line interface:
//! configuration management, command execution, page fetching, and
//! output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetch;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
