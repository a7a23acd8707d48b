//! Distance endpoint
//!
//! Accepts `system_id_1` and `system_id_2` from a JSON body (POST with a JSON
//! content type) or from the query string (everything else). Both ids are
//! validated before anything is resolved.

use crate::{error::ApiResult, state::AppState};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap, Method},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wizard_core_starmap::{distance, SystemId, ValidationError};

/// Query-string form of the request. Values stay strings until validated.
#[derive(Debug, Default, Deserialize)]
pub struct DistanceQuery {
    pub system_id_1: Option<String>,
    pub system_id_2: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemSummary {
    pub system_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistanceResponse {
    pub system_1: SystemSummary,
    pub system_2: SystemSummary,
    pub distance_meters: f64,
    pub distance_lightyears: f64,
}

/// `GET|POST /calculate-distance`
pub async fn calculate_distance(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    query: Result<Query<DistanceQuery>, QueryRejection>,
    body: Bytes,
) -> ApiResult<Json<DistanceResponse>> {
    let (first, second) = if method == Method::POST && is_json(&headers) {
        read_body(&body)?
    } else {
        let Query(query) = query.map_err(|e| {
            tracing::debug!(error = %e, "Unreadable query string");
            ValidationError::NotInteger
        })?;
        (
            query.system_id_1.map(Value::String),
            query.system_id_2.map(Value::String),
        )
    };

    let (id_1, id_2) = parse_ids(first.as_ref(), second.as_ref())?;

    let (system_1, system_2) =
        tokio::try_join!(state.resolver.resolve(id_1), state.resolver.resolve(id_2))?;

    let d = distance(&system_1.position, &system_2.position);
    tracing::info!(
        system_1 = %system_1.name,
        system_2 = %system_2.name,
        light_years = d.light_years,
        "Calculated distance"
    );

    Ok(Json(DistanceResponse {
        system_1: SystemSummary {
            system_id: system_1.system_id.get(),
            name: system_1.name,
        },
        system_2: SystemSummary {
            system_id: system_2.system_id.get(),
            name: system_2.name,
        },
        distance_meters: d.meters,
        distance_lightyears: d.light_years,
    }))
}

/// `application/json` or any `application/*+json`
fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Pull both fields out of a JSON body. A body that is valid JSON but not an
/// object simply has no fields.
fn read_body(body: &[u8]) -> Result<(Option<Value>, Option<Value>), ValidationError> {
    let mut value: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Malformed JSON body");
        ValidationError::MalformedBody
    })?;

    match value.as_object_mut() {
        Some(fields) => Ok((fields.remove("system_id_1"), fields.remove("system_id_2"))),
        None => Ok((None, None)),
    }
}

/// Validate both identifiers: presence, then integer form, then range
pub(crate) fn parse_ids(
    first: Option<&Value>,
    second: Option<&Value>,
) -> Result<(SystemId, SystemId), ValidationError> {
    let (Some(first), Some(second)) = (present(first), present(second)) else {
        return Err(ValidationError::Missing);
    };

    let first = as_integer(first).ok_or(ValidationError::NotInteger)?;
    let second = as_integer(second).ok_or(ValidationError::NotInteger)?;

    Ok((
        SystemId::for_field("system_id_1", first)?,
        SystemId::for_field("system_id_2", second)?,
    ))
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    })
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
