//! ESI client for solar system names and positions
//!
//! One `GET /universe/systems/{id}/` per call, no retries. A 404 means the
//! system does not exist; every other failure is reported as the upstream
//! being unavailable.

use crate::error::{CacheError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use wizard_core_starmap::{Coordinates, SystemId, SystemRecord};

/// Default ESI base URL (includes the route version)
pub const ESI_BASE_URL: &str = "https://esi.evetech.net/latest";

/// API compatibility date sent with every ESI request
pub const ESI_COMPATIBILITY_DATE: &str = "2026-02-02";

/// User agent identifying this client to ESI
pub const ESI_USER_AGENT: &str = "WizardLightYearsCalculator/0.1";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only source of system names and coordinates
#[async_trait]
pub trait CoordinateProvider: Send + Sync {
    async fn fetch(&self, system_id: SystemId) -> Result<SystemRecord>;
}

/// The subset of the ESI system payload the calculator needs
#[derive(Debug, Deserialize)]
struct EsiSystem {
    name: String,
    position: Coordinates,
}

/// HTTP client for the ESI universe endpoints
#[derive(Debug, Clone)]
pub struct EsiClient {
    client: Client,
    base_url: String,
}

impl EsiClient {
    /// Create a client against `base_url` with the given request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Compatibility-Date",
            HeaderValue::from_static(ESI_COMPATIBILITY_DATE),
        );

        let client = Client::builder()
            .user_agent(ESI_USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::InvalidConfig(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client against the public ESI endpoint
    pub fn with_defaults() -> Result<Self> {
        Self::new(ESI_BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn system_url(&self, system_id: SystemId) -> String {
        format!("{}/universe/systems/{}/", self.base_url, system_id)
    }
}

#[async_trait]
impl CoordinateProvider for EsiClient {
    async fn fetch(&self, system_id: SystemId) -> Result<SystemRecord> {
        let url = self.system_url(system_id);
        tracing::debug!(%url, "Fetching system from ESI");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CacheError::upstream(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CacheError::NotFound(system_id));
        }
        if !status.is_success() {
            return Err(CacheError::upstream(format!(
                "{} returned HTTP {}",
                url, status
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CacheError::upstream(format!("reading body from {} failed: {}", url, e)))?;

        let payload: EsiSystem = serde_json::from_slice(&body).map_err(|e| {
            CacheError::upstream(format!("invalid response format from {}: {}", url, e))
        })?;

        Ok(SystemRecord::new(system_id, payload.name, payload.position))
    }
}
