//! Axum router and server loop

use crate::{
    api,
    error::ApiError,
    rate_limit::{self, RateLimiters},
    state::AppState,
    RateLimitConfig, ServerConfig,
};
use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// How often idle clients are dropped from the limiters
const LIMITER_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Build the application router from rate limit settings
pub fn build_router(state: AppState, limits: &RateLimitConfig) -> Router {
    router(state, RateLimiters::from_config(limits))
}

/// Build the application router around existing limiters.
///
/// `/calculate-distance` is charged only against the per-minute quota. The
/// index and the fallback share the hourly quota. With `None` no limiter
/// layer is installed.
pub fn router(state: AppState, limiters: Option<RateLimiters>) -> Router {
    let mut distance_routes = Router::new().route(
        "/calculate-distance",
        get(api::calculate_distance).post(api::calculate_distance),
    );

    let mut general_routes = Router::new()
        .route("/", get(api::index))
        .fallback(api::not_found);

    if let Some(limiters) = limiters {
        distance_routes = distance_routes.route_layer(middleware::from_fn_with_state(
            limiters.per_minute,
            rate_limit::enforce,
        ));
        // `layer` rather than `route_layer` so unknown paths are limited too
        general_routes = general_routes.layer(middleware::from_fn_with_state(
            limiters.per_hour,
            rate_limit::enforce,
        ));
    }

    distance_routes
        .merge(general_routes)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(detail, "Handler panicked");
    ApiError::Internal.into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Run the API server until Ctrl-C
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting {} v{}", api::index::API_NAME, env!("CARGO_PKG_VERSION"));
    tracing::info!("System cache: {}", config.database_path);

    let state = AppState::connect(&config).await?;

    let limiters = RateLimiters::from_config(&config.rate_limit);
    let sweeper = match &limiters {
        Some(limiters) => {
            tracing::info!(
                per_minute = config.rate_limit.per_minute.get(),
                per_hour = config.rate_limit.per_hour.get(),
                "Rate limiting enabled"
            );
            Some(limiters.spawn_sweeper(LIMITER_SWEEP_INTERVAL))
        }
        None => {
            tracing::warn!("Rate limiting disabled");
            None
        }
    };

    let app = router(state, limiters);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }

    Ok(())
}
