//! Error types for core operations.

use thiserror::Error;

/// Result type for core operations.
pub type DwgResult<T> = Result<T, DwgError>;

/// Errors that can occur in the event and data layer.
#[derive(Debug, Error)]
pub enum DwgError {
    /// A listener reported a failure during dispatch.
    ///
    /// Dispatch is fail-fast: the remaining listeners of that emission
    /// are not invoked and the error reaches the `emit` caller.
    #[error("Listener failed: {0}")]
    Listener(String),

    /// Property value serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
