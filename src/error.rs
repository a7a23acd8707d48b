/*!
 * Startup errors for the service binary
 */

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WizardError>;

#[derive(Debug, Error)]
pub enum WizardError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Logging could not be set up
    #[error("Logging error: {0}")]
    Logging(String),
}

impl WizardError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        WizardError::Config(msg.into())
    }
}
