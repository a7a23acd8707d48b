//! Read-through coordinate resolution
//!
//! A cached row is served as is. On a miss the provider is asked once and the
//! result is written to the store before it is returned. Provider failures are
//! passed back unchanged and leave the store untouched.

use crate::error::Result;
use crate::provider::CoordinateProvider;
use crate::store::SystemStore;
use async_trait::async_trait;
use std::sync::Arc;
use wizard_core_starmap::{SystemId, SystemRecord};

/// Anything that can turn a system identifier into a name and position
#[async_trait]
pub trait SystemResolver: Send + Sync {
    async fn resolve(&self, system_id: SystemId) -> Result<SystemRecord>;
}

/// Store-first resolver that falls back to the upstream provider
#[derive(Clone)]
pub struct CoordinateResolver {
    store: Arc<dyn SystemStore>,
    provider: Arc<dyn CoordinateProvider>,
}

impl CoordinateResolver {
    pub fn new(store: Arc<dyn SystemStore>, provider: Arc<dyn CoordinateProvider>) -> Self {
        Self { store, provider }
    }

    pub fn store(&self) -> &Arc<dyn SystemStore> {
        &self.store
    }
}

#[async_trait]
impl SystemResolver for CoordinateResolver {
    async fn resolve(&self, system_id: SystemId) -> Result<SystemRecord> {
        if let Some(cached) = self.store.get(system_id).await? {
            tracing::debug!(system_id = %system_id, "Cache hit");
            return Ok(cached.into());
        }

        tracing::debug!(system_id = %system_id, "Cache miss, asking provider");
        let record = self.provider.fetch(system_id).await?;

        self.store
            .put(record.system_id, &record.name, record.position)
            .await?;

        tracing::info!(system_id = %system_id, name = %record.name, "Cached new system");
        Ok(record)
    }
}
