//! Validation errors for system identifiers

use thiserror::Error;

/// Result type for starmap operations
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Reasons a client-supplied system identifier is rejected.
///
/// The display text of every variant is safe to return to clients verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or both identifiers were not supplied
    #[error("Both system_id_1 and system_id_2 are required")]
    Missing,

    /// An identifier could not be read as an integer
    #[error("System IDs must be valid integers")]
    NotInteger,

    /// An identifier lies outside the known-space range
    #[error("{field}: System ID must be between 30,000,000 and 31,000,000")]
    OutOfRange { field: &'static str, value: i64 },

    /// The request body was not valid JSON
    #[error("Request body must be valid JSON")]
    MalformedBody,
}

impl ValidationError {
    /// Create an out-of-range error for the named request field
    pub fn out_of_range(field: &'static str, value: i64) -> Self {
        ValidationError::OutOfRange { field, value }
    }
}
