//! Rate limiting middleware.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use rategate_core::SlidingWindowLimiter;

use crate::response::error_too_many_requests;

const REJECTION_MESSAGE: &str = "Rate limit exceeded. Too many requests.";

/// Shared limiter handle cloned into the router.
///
/// The limiter is constructed once at startup and owned by whoever
/// builds the router; this state is just a cheap clone of that handle.
#[derive(Clone)]
pub struct RateLimitState {
    limiter: Arc<SlidingWindowLimiter>,
}

impl RateLimitState {
    /// Wrap a limiter for use with [`rate_limit`].
    #[must_use]
    pub fn new(limiter: Arc<SlidingWindowLimiter>) -> Self {
        Self { limiter }
    }

    /// The underlying limiter.
    #[must_use]
    pub fn limiter(&self) -> &SlidingWindowLimiter {
        &self.limiter
    }
}

/// Resolve the client identifier for a request.
///
/// Checks `X-Forwarded-For` (leftmost entry), then `X-Real-Ip`, then
/// the peer address recorded by `ConnectInfo`. Returns `None` when none
/// of these yield a non-empty identifier.
#[must_use]
pub fn client_ip(request: &Request) -> Option<String> {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        let first = forwarded.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return Some(first.to_owned());
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
    {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return Some(real_ip.to_owned());
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
}

/// Admission-control middleware.
///
/// Apply with `axum::middleware::from_fn_with_state`. Admitted requests
/// reach the downstream handler unmodified; rejected requests get a 429
/// envelope and the handler never runs. Requests with no resolvable
/// client identifier are admitted, since the limiter keys on non-empty
/// identifiers.
pub async fn rate_limit(
    State(state): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(client) = client_ip(&request) else {
        tracing::debug!("request has no resolvable client identifier, admitting");
        return next.run(request).await;
    };

    if state.limiter().check(&client) {
        next.run(request).await
    } else {
        tracing::debug!(client = %client, "rate limit exceeded");
        error_too_many_requests(REJECTION_MESSAGE)
    }
}
