//! Error types for cache, provider, and resolver operations

use thiserror::Error;
use wizard_core_starmap::SystemId;

/// Result type for system cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Failures while resolving system coordinates.
///
/// The text of these errors is operator-facing: it may carry identifiers,
/// URLs, and upstream error detail and must not be sent to clients as is.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// The upstream provider reports the system does not exist
    #[error("System ID {0} not found")]
    NotFound(SystemId),

    /// Network failure, timeout, unexpected status, or malformed payload upstream
    #[error("Failed to fetch system data from ESI: {0}")]
    UpstreamUnavailable(String),

    /// The local store could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// The cache or client could not be constructed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CacheError {
    pub fn upstream<S: Into<String>>(detail: S) -> Self {
        CacheError::UpstreamUnavailable(detail.into())
    }

    pub fn storage<S: Into<String>>(detail: S) -> Self {
        CacheError::Storage(detail.into())
    }
}

impl From<sqlx::Error> for CacheError {
    fn from(err: sqlx::Error) -> Self {
        CacheError::Storage(err.to_string())
    }
}
