/*!
 * Wizard Light-Years - distance service for EVE Online solar systems
 *
 * The binary is a thin shell around [`wizard_server`]. This library holds the
 * pieces the shell needs:
 * - layered service configuration (defaults, TOML file, environment)
 * - tracing subscriber setup
 * - the startup error type
 */

pub mod config;
pub mod error;
pub mod logging;

pub use config::{LogFormat, LogLevel, ServiceConfig};
pub use error::{Result, WizardError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
