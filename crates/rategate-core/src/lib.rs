//! # Rategate Core
//!
//! Per-client admission control with an exact sliding window log.
//!
//! This crate provides:
//! - A keyed rate limiter that retains request timestamps per client
//! - Construction-time quota validation
//! - Sharded locking for cross-client parallelism
//! - Opportunistic eviction of idle clients to bound memory

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod limiter;
pub mod quota;

pub use clock::{Clock, ManualClock, SystemClock};
pub use limiter::{LimiterConfig, SlidingWindowLimiter};
pub use quota::{Quota, QuotaError};
