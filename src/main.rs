/*!
 * Wizard Light-Years CLI - starts the distance API
 */

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use wizard_lightyears::{logging, LogFormat, LogLevel, ServiceConfig};

#[derive(Parser)]
#[command(name = "wizard-lightyears")]
#[command(version, about = "Light-year distances between EVE Online solar systems", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Address to bind (overrides API_HOST)
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// Port to bind (overrides API_PORT)
    #[arg(short = 'p', long, value_name = "PORT")]
    port: Option<u16>,

    /// SQLite cache file (overrides DATABASE_PATH)
    #[arg(long = "database", value_name = "FILE")]
    database: Option<PathBuf>,

    /// ESI base URL (overrides ESI_BASE_URL)
    #[arg(long, value_name = "URL")]
    esi_base_url: Option<String>,

    /// Disable per-client rate limiting
    #[arg(long)]
    no_rate_limit: bool,

    /// Log level
    #[arg(long, value_enum)]
    log_level: Option<LogLevelArg>,

    /// Log output format for stdout
    #[arg(long, value_enum)]
    log_format: Option<LogFormatArg>,

    /// Write JSON logs to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LogFormatArg {
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

impl Cli {
    /// Flags win over every other configuration source
    fn apply(self, config: &mut ServiceConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(database) = self.database {
            config.database_path = database;
        }
        if let Some(url) = self.esi_base_url {
            config.esi_base_url = url;
        }
        if self.no_rate_limit {
            config.rate_limit.enabled = false;
        }
        if let Some(level) = self.log_level {
            config.log_level = level.into();
        }
        if let Some(format) = self.log_format {
            config.log_format = format.into();
        }
        if self.log_file.is_some() {
            config.log_file = self.log_file;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ServiceConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    logging::init_logging(&config)?;
    let server_config = config.to_server_config()?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(wizard_server::start_server(server_config))
}
