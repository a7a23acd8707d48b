/*!
 * Logging and tracing initialization
 */

use std::fs::File;
use std::path::Path;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{LogFormat, LogLevel, ServiceConfig};
use crate::error::{Result, WizardError};

/// Crates whose events follow the configured level
const SERVICE_TARGETS: [&str; 3] = ["wizard_lightyears", "wizard_server", "system_cache"];

/// Filter directives used when `RUST_LOG` is not set
pub fn default_directives(level: LogLevel) -> String {
    let level = level.to_tracing_level();
    let mut directives: Vec<String> = SERVICE_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect();
    directives.push("tower_http=info".to_string());
    directives.join(",")
}

/// Initialize structured logging based on configuration
pub fn init_logging(config: &ServiceConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(config.log_level)))
        .map_err(|e| WizardError::Logging(format!("Failed to create log filter: {}", e)))?;

    match (&config.log_file, config.log_format) {
        (Some(log_path), _) => init_file_logging(log_path, env_filter),
        (None, LogFormat::Json) => init_json_logging(env_filter),
        (None, LogFormat::Compact) => init_stdout_logging(env_filter),
    }
}

/// Initialize human-readable logging to stdout
fn init_stdout_logging(env_filter: EnvFilter) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| WizardError::Logging(e.to_string()))
}

/// Initialize JSON lines on stdout
fn init_json_logging(env_filter: EnvFilter) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .json()
        .with_current_span(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| WizardError::Logging(e.to_string()))
}

/// Initialize logging to a file
fn init_file_logging(log_path: &Path, env_filter: EnvFilter) -> Result<()> {
    let file = File::create(log_path).map_err(|e| {
        WizardError::Logging(format!(
            "Failed to create log file {}: {}",
            log_path.display(),
            e
        ))
    })?;

    let fmt_layer = fmt::layer()
        .with_writer(file)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false) // No ANSI colors in file
        .json();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| WizardError::Logging(e.to_string()))
}
