//! End-to-end tests for the HTTP API, driven in-process through the router

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    extract::ConnectInfo,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use system_cache::{CacheError, SystemResolver, SystemStore};
use tower::ServiceExt;
use wizard_core_starmap::{CachedSystem, Coordinates, SystemId, SystemRecord};
use wizard_server::{build_router, AppState, RateLimitConfig};

const JITA: i64 = 30000142;
const PERIMETER: i64 = 30000144;
const UNKNOWN: i64 = 30999999;
const BROKEN: i64 = 30000001;
const STORAGE_FAIL: i64 = 30000002;

/// Resolver answering from a fixed table and counting calls
struct MockResolver {
    systems: HashMap<i64, SystemRecord>,
    calls: AtomicUsize,
}

impl MockResolver {
    fn new() -> Self {
        let mut systems = HashMap::new();
        systems.insert(
            JITA,
            SystemRecord::new(
                SystemId::new(JITA).unwrap(),
                "Jita",
                Coordinates::new(-129400292875304960.0, 61596815791300400.0, 1720986748719556600.0),
            ),
        );
        systems.insert(
            PERIMETER,
            SystemRecord::new(
                SystemId::new(PERIMETER).unwrap(),
                "Perimeter",
                Coordinates::new(-129524275563970560.0, 61576851935436800.0, 1721076251935088640.0),
            ),
        );
        Self {
            systems,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SystemResolver for MockResolver {
    async fn resolve(&self, system_id: SystemId) -> system_cache::Result<SystemRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match system_id.get() {
            BROKEN => Err(CacheError::upstream(
                "ESI API connection failed: timeout at 10.5s",
            )),
            STORAGE_FAIL => Err(CacheError::storage(
                "no such table: systems at /home/user/db",
            )),
            id => self
                .systems
                .get(&id)
                .cloned()
                .ok_or(CacheError::NotFound(system_id)),
        }
    }
}

/// Store that only reports a size for the index route
struct FixedCountStore(u64);

#[async_trait]
impl SystemStore for FixedCountStore {
    async fn get(&self, _system_id: SystemId) -> system_cache::Result<Option<CachedSystem>> {
        Ok(None)
    }

    async fn put(
        &self,
        _system_id: SystemId,
        _name: &str,
        _position: Coordinates,
    ) -> system_cache::Result<()> {
        Ok(())
    }

    async fn count(&self) -> system_cache::Result<u64> {
        Ok(self.0)
    }
}

fn no_limits() -> RateLimitConfig {
    RateLimitConfig {
        enabled: false,
        ..Default::default()
    }
}

fn app_with(limits: RateLimitConfig) -> (Router, Arc<MockResolver>) {
    let resolver = Arc::new(MockResolver::new());
    let state = AppState::new(resolver.clone(), Arc::new(FixedCountStore(2)));
    (build_router(state, &limits), resolver)
}

fn app() -> (Router, Arc<MockResolver>) {
    app_with(no_limits())
}

fn post_json(body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/calculate-distance")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_index_lists_service_metadata() {
    let (app, resolver) = app();
    let (status, body) = send(&app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["api"], "WizardLightYearsCalculator");
    assert!(body["version"].is_string());
    assert!(body["description"].is_string());
    assert!(body["endpoints"]["/calculate-distance"].is_string());
    assert_eq!(body["cached_systems"], 2);
    assert_eq!(resolver.calls(), 0);
}

#[tokio::test]
async fn test_post_json_returns_distance() {
    let (app, resolver) = app();
    let (status, body) = send(
        &app,
        post_json(json!({"system_id_1": JITA, "system_id_2": PERIMETER}).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["system_1"]["system_id"], JITA);
    assert_eq!(body["system_1"]["name"], "Jita");
    assert_eq!(body["system_2"]["system_id"], PERIMETER);
    assert_eq!(body["system_2"]["name"], "Perimeter");

    let meters = body["distance_meters"].as_f64().unwrap();
    let light_years = body["distance_lightyears"].as_f64().unwrap();
    assert!((meters - 154_211_180_594_232.75).abs() / 154_211_180_594_232.75 < 1e-9);
    assert!((light_years - 0.016_301_393_297_487_605).abs() / 0.016_301_393_297_487_605 < 1e-9);
    assert_eq!(resolver.calls(), 2);
}

#[tokio::test]
async fn test_get_query_matches_post() {
    let (app, _) = app();
    let (get_status, get_body) = send(
        &app,
        get(&format!("/calculate-distance?system_id_1={}&system_id_2={}", JITA, PERIMETER)),
    )
    .await;
    let (post_status, post_body) = send(
        &app,
        post_json(json!({"system_id_1": JITA, "system_id_2": PERIMETER}).to_string()),
    )
    .await;

    assert_eq!(get_status, StatusCode::OK);
    assert_eq!(post_status, StatusCode::OK);
    assert_eq!(get_body, post_body);
}

#[tokio::test]
async fn test_same_system_is_zero_distance() {
    let (app, _) = app();
    let (status, body) = send(
        &app,
        post_json(json!({"system_id_1": JITA, "system_id_2": JITA}).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["distance_meters"], 0.0);
    assert_eq!(body["distance_lightyears"], 0.0);
}

#[tokio::test]
async fn test_validation_failures_never_reach_resolver() {
    let (app, resolver) = app();
    let cases = [
        (json!({"system_id_2": PERIMETER}), "required"),
        (json!({"system_id_1": JITA}), "required"),
        (json!({}), "required"),
        (json!({"system_id_1": "not_a_number", "system_id_2": PERIMETER}), "integer"),
        (json!({"system_id_1": 30000142.5, "system_id_2": PERIMETER}), "integer"),
        (json!({"system_id_1": 29999999, "system_id_2": PERIMETER}), "between"),
        (json!({"system_id_1": JITA, "system_id_2": 31000001}), "between"),
        (json!({"system_id_1": -1, "system_id_2": PERIMETER}), "between"),
    ];

    for (payload, expected) in cases {
        let (status, body) = send(&app, post_json(payload.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        let error = body["error"].as_str().unwrap().to_lowercase();
        assert!(error.contains(expected), "{payload}: {error}");
    }

    let (status, _) = send(&app, get("/calculate-distance?system_id_1=abc&system_id_2=30000144")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, get("/calculate-distance?system_id_1=30000142")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(resolver.calls(), 0);
}

#[tokio::test]
async fn test_out_of_range_names_the_field() {
    let (app, _) = app();
    let (_, body) = send(
        &app,
        post_json(json!({"system_id_1": JITA, "system_id_2": 31000001}).to_string()),
    )
    .await;
    assert!(body["error"].as_str().unwrap().starts_with("system_id_2:"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, resolver) = app();
    let (status, body) = send(&app, post_json("{\"system_id_1\": 30000142,")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(resolver.calls(), 0);
}

#[tokio::test]
async fn test_unknown_system_is_sanitized_not_found() {
    let (app, _) = app();
    let (status, body) = send(
        &app,
        post_json(json!({"system_id_1": JITA, "system_id_2": UNKNOWN}).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error = body["error"].as_str().unwrap();
    assert!(!error.contains(&UNKNOWN.to_string()));
    assert!(!error.contains("ESI"));
    assert!(error.to_lowercase().contains("not found"));
}

#[tokio::test]
async fn test_upstream_failure_is_sanitized_bad_gateway() {
    let (app, _) = app();
    let (status, body) = send(
        &app,
        post_json(json!({"system_id_1": BROKEN, "system_id_2": PERIMETER}).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let error = body["error"].as_str().unwrap();
    assert!(!error.contains("10.5s"));
    assert!(error.to_lowercase().contains("retrieve system information"));
}

#[tokio::test]
async fn test_storage_failure_is_sanitized_server_error() {
    let (app, _) = app();
    let (status, body) = send(
        &app,
        post_json(json!({"system_id_1": STORAGE_FAIL, "system_id_2": PERIMETER}).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(!error.contains("/home/user/db"));
    assert!(!error.contains("systems"));
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let (app, _) = app();
    let (status, body) = send(&app, get("/nonexistent-endpoint")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Endpoint not found");
}

fn from_client(mut request: Request<Body>, addr: [u8; 4]) -> Request<Body> {
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((addr, 40000))));
    request
}

#[tokio::test]
async fn test_per_minute_limit_returns_429_per_client() {
    let (app, _) = app_with(RateLimitConfig {
        enabled: true,
        per_minute: NonZeroU32::new(2).unwrap(),
        per_hour: NonZeroU32::new(100).unwrap(),
    });
    let uri = format!("/calculate-distance?system_id_1={}&system_id_2={}", JITA, PERIMETER);

    for _ in 0..2 {
        let (status, _) = send(&app, from_client(get(&uri), [10, 0, 0, 1])).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, from_client(get(&uri), [10, 0, 0, 1])).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "Rate limit exceeded. Please try again later.");
    let retry_after = body["retry_after"].as_str().unwrap();
    assert!(retry_after.ends_with(" seconds"), "{retry_after}");

    let (status, _) = send(&app, from_client(get(&uri), [10, 0, 0, 2])).await;
    assert_eq!(status, StatusCode::OK);

    // The per-minute quota does not apply to the index.
    let (status, _) = send(&app, from_client(get("/"), [10, 0, 0, 1])).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_hourly_limit_covers_index_and_unknown_paths() {
    let (app, _) = app_with(RateLimitConfig {
        enabled: true,
        per_minute: NonZeroU32::new(100).unwrap(),
        per_hour: NonZeroU32::new(2).unwrap(),
    });

    let (status, _) = send(&app, from_client(get("/"), [10, 0, 0, 3])).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, from_client(get("/nonexistent-endpoint"), [10, 0, 0, 3])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Endpoint not found");

    let (status, _) = send(&app, from_client(get("/nonexistent-endpoint"), [10, 0, 0, 3])).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    let (status, _) = send(&app, from_client(get("/"), [10, 0, 0, 3])).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_distance_requests_do_not_spend_hourly_quota() {
    let (app, _) = app_with(RateLimitConfig {
        enabled: true,
        per_minute: NonZeroU32::new(60).unwrap(),
        per_hour: NonZeroU32::new(2).unwrap(),
    });
    let uri = format!("/calculate-distance?system_id_1={}&system_id_2={}", JITA, PERIMETER);

    for _ in 0..4 {
        let (status, _) = send(&app, from_client(get(&uri), [10, 0, 0, 4])).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = send(&app, from_client(get("/"), [10, 0, 0, 4])).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_per_minute_rejections_do_not_spend_hourly_quota() {
    let (app, _) = app_with(RateLimitConfig {
        enabled: true,
        per_minute: NonZeroU32::new(1).unwrap(),
        per_hour: NonZeroU32::new(1).unwrap(),
    });
    let uri = format!("/calculate-distance?system_id_1={}&system_id_2={}", JITA, PERIMETER);

    let (status, _) = send(&app, from_client(get(&uri), [10, 0, 0, 5])).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, from_client(get(&uri), [10, 0, 0, 5])).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    let (status, _) = send(&app, from_client(get("/"), [10, 0, 0, 5])).await;
    assert_eq!(status, StatusCode::OK);
}
