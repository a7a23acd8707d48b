//! Error types for the HTTP layer
//!
//! [`ApiError`] is the only place where internal failures become client text.
//! Variants carry no upstream detail; that detail is logged when a
//! [`CacheError`] is converted and never reaches the response body.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use system_cache::CacheError;
use thiserror::Error;
use wizard_core_starmap::ValidationError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("One or more system IDs not found in EVE Online universe")]
    NotFound,

    #[error("Unable to retrieve system information. Please try again later.")]
    UpstreamUnavailable,

    #[error("A service error occurred")]
    Storage,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited { retry_after_secs: u64 },

    #[error("Endpoint not found")]
    EndpointNotFound,

    #[error("An unexpected error occurred")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound | ApiError::EndpointNotFound => StatusCode::NOT_FOUND,
            ApiError::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Storage | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        match &err {
            CacheError::NotFound(system_id) => {
                tracing::warn!(system_id = %system_id, error = %err, "System not found upstream");
                ApiError::NotFound
            }
            CacheError::UpstreamUnavailable(_) => {
                tracing::error!(error = %err, "Upstream provider failed");
                ApiError::UpstreamUnavailable
            }
            CacheError::Storage(_) => {
                tracing::error!(error = %err, "System cache failed");
                ApiError::Storage
            }
            CacheError::InvalidConfig(_) => {
                tracing::error!(error = %err, "Unexpected resolver failure");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        match self {
            ApiError::RateLimited { retry_after_secs } => {
                let body = serde_json::json!({
                    "error": message,
                    "retry_after": format!("{} seconds", retry_after_secs),
                });
                let mut response = (status, Json(body)).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                response
            }
            _ => (status, Json(serde_json::json!({ "error": message }))).into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
