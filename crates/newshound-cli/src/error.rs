//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Page fetch error
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] newshound_store::StoreError),

    /// Resolution error
    #[error("Resolution error: {0}")]
    Resolve(#[from] newshound_extractor::ResolveError),

    /// Generation client error
    #[error("Generation client error: {0}")]
    Llm(#[from] newshound_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
