//! Resolution error types.

use thiserror::Error;

/// Errors surfaced by the resolution controller.
///
/// Generation-client failures are deliberately absent: a failed
/// generation call degrades to an empty proposal and the resolution
/// carries on, so only storage and configuration problems abort a run.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The profile store rejected an operation.
    #[error("Store error: {0}")]
    Store(String),

    /// The resolver configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}
