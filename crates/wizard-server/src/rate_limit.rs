//! Per-client rate limiting middleware
//!
//! Each limiter is a governor GCRA keyed by client IP. A request that exceeds
//! its quota is answered with 429 before reaching the handler. Keys whose
//! quota has fully replenished are swept periodically so the per-client map
//! stays bounded by the number of recently active clients.

use crate::{error::ApiError, RateLimitConfig};
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota, RateLimiter,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Rate limiter keyed by client address
#[derive(Clone)]
pub struct ClientRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
    clock: DefaultClock,
}

impl ClientRateLimiter {
    pub fn new(quota: Quota) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            clock: DefaultClock::default(),
        }
    }

    pub fn per_minute(max_requests: NonZeroU32) -> Self {
        Self::new(Quota::per_minute(max_requests))
    }

    pub fn per_hour(max_requests: NonZeroU32) -> Self {
        Self::new(Quota::per_hour(max_requests))
    }

    /// Take one request from `client`'s quota.
    ///
    /// On rejection returns the whole number of seconds until the next request
    /// would be allowed, never less than one.
    pub fn check(&self, client: IpAddr) -> Result<(), u64> {
        self.limiter.check_key(&client).map_err(|not_until| {
            let wait = not_until.wait_time_from(self.clock.now());
            let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            secs.max(1)
        })
    }

    /// Drop clients whose quota has fully replenished
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of clients currently tracked
    pub fn len(&self) -> usize {
        self.limiter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limiter.is_empty()
    }
}

/// The two quotas the router enforces
#[derive(Clone)]
pub struct RateLimiters {
    /// Applies to `/calculate-distance` only
    pub per_minute: ClientRateLimiter,
    /// Applies to every other route, including the fallback
    pub per_hour: ClientRateLimiter,
}

impl RateLimiters {
    /// `None` when rate limiting is disabled
    pub fn from_config(config: &RateLimitConfig) -> Option<Self> {
        config.enabled.then(|| Self {
            per_minute: ClientRateLimiter::per_minute(config.per_minute),
            per_hour: ClientRateLimiter::per_hour(config.per_hour),
        })
    }

    pub fn retain_recent(&self) {
        self.per_minute.retain_recent();
        self.per_hour.retain_recent();
    }

    /// Sweep stale clients from both limiters every `period`
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let limiters = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                limiters.retain_recent();
                tracing::debug!(
                    per_minute_clients = limiters.per_minute.len(),
                    per_hour_clients = limiters.per_hour.len(),
                    "Swept rate limiter state"
                );
            }
        })
    }
}

/// Client address from the connection, or loopback when the router is driven
/// without connection info (in-process tests)
fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Middleware for `axum::middleware::from_fn_with_state`
pub async fn enforce(
    State(limiter): State<ClientRateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_ip(&request);

    match limiter.check(client) {
        Ok(()) => next.run(request).await,
        Err(retry_after_secs) => {
            tracing::warn!(%client, path = %request.uri().path(), retry_after_secs, "Rate limit exceeded");
            ApiError::RateLimited { retry_after_secs }.into_response()
        }
    }
}
