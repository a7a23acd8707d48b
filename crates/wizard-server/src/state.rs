//! Shared application state

use crate::ServerConfig;
use anyhow::Context;
use std::sync::Arc;
use system_cache::{CoordinateResolver, EsiClient, SqliteStore, SystemResolver, SystemStore};

/// State shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Turns system identifiers into names and positions
    pub resolver: Arc<dyn SystemResolver>,

    /// Local coordinate cache (read directly only for service metadata)
    pub store: Arc<dyn SystemStore>,
}

impl AppState {
    pub fn new(resolver: Arc<dyn SystemResolver>, store: Arc<dyn SystemStore>) -> Self {
        Self { resolver, store }
    }

    /// Open the cache database and wire up the ESI-backed resolver
    pub async fn connect(config: &ServerConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn SystemStore> = Arc::new(
            SqliteStore::open(&config.database_path)
                .await
                .with_context(|| format!("Failed to open system cache at {}", config.database_path))?,
        );

        let provider = Arc::new(
            EsiClient::new(config.esi_base_url.clone(), config.esi_timeout)
                .context("Failed to build ESI client")?,
        );
        tracing::info!(base_url = %provider.base_url(), "ESI client ready");

        let resolver = Arc::new(CoordinateResolver::new(store.clone(), provider));

        Ok(Self::new(resolver, store))
    }
}
