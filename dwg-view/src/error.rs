//! Error types for viewport operations.

use thiserror::Error;

/// Result type for viewport operations.
pub type ViewResult<T> = Result<T, ViewError>;

/// Errors that can occur in the viewport shell.
#[derive(Debug, Error)]
pub enum ViewError {
    /// A rendering backend reported a failure.
    #[error("Backend error: {0}")]
    Backend(String),

    /// A core event or data operation failed.
    #[error(transparent)]
    Core(#[from] dwg_core::DwgError),
}
