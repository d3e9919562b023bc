//! # Rategate HTTP
//!
//! Axum middleware that gates requests through a
//! [`SlidingWindowLimiter`](rategate_core::SlidingWindowLimiter).
//!
//! The middleware extracts a client identifier from the request (proxy
//! forwarding headers first, then the peer address), asks the limiter
//! for an admission decision, and short-circuits rejected requests with
//! an HTTP 429 JSON envelope before the downstream handler runs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod middleware;
/// Standard JSON response envelope.
pub mod response;

pub use middleware::{RateLimitState, client_ip, rate_limit};
pub use response::ApiResponse;
