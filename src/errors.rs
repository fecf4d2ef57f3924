//! Typed error definitions for oskit.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OskitError {
    /// An acquisition did not complete within the caller's wait budget.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// A filesystem failure other than contention. Never retried.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed input to a pattern or path helper.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OskitError>;
