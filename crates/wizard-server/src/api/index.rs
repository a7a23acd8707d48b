//! Service metadata and fallback routes

use crate::{error::ApiError, state::AppState};
use axum::{extract::State, Json};
use serde_json::{json, Value};

pub const API_NAME: &str = "WizardLightYearsCalculator";

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Json<Value> {
    let cached_systems = match state.store.count().await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!(error = %e, "Could not count cached systems");
            None
        }
    };

    Json(json!({
        "api": API_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Calculate distances between EVE Online solar systems",
        "endpoints": {
            "/calculate-distance": "GET or POST with system_id_1 and system_id_2"
        },
        "cached_systems": cached_systems,
    }))
}

/// Fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::EndpointNotFound
}
