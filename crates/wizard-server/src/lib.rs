//! Wizard Server - HTTP API for jump distances
//!
//! Headless axum service exposing `GET /` and `GET|POST /calculate-distance`.
//! Coordinates come from the [`system_cache`] crate; rate limiting is per
//! client address using governor.

pub mod api;
pub mod error;
pub mod rate_limit;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use rate_limit::{ClientRateLimiter, RateLimiters};
pub use server::{build_router, router, run_server};
pub use state::AppState;

use std::num::NonZeroU32;
use std::time::Duration;

/// Per-client request quotas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Applies to `/calculate-distance`
    pub per_minute: NonZeroU32,
    /// Applies to every route
    pub per_hour: NonZeroU32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_minute: NonZeroU32::new(60).expect("non-zero literal"),
            per_hour: NonZeroU32::new(1000).expect("non-zero literal"),
        }
    }
}

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub esi_base_url: String,
    pub esi_timeout: Duration,
    pub rate_limit: RateLimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_path: "wizard_calculator.db".to_string(),
            esi_base_url: system_cache::ESI_BASE_URL.to_string(),
            esi_timeout: system_cache::DEFAULT_TIMEOUT,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Start the API server and run until shutdown
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    server::run_server(config).await
}
