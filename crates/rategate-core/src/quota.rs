//! Quota configuration and validation.
//!
//! A quota is validated once, when the limiter is built. The admission
//! path never revalidates and never fails.

use std::num::NonZeroU32;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Quota validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuotaError {
    /// The request ceiling must admit at least one request.
    #[error("max_requests must be positive")]
    ZeroMaxRequests,

    /// The window must span a positive duration.
    #[error("window must be a positive duration")]
    ZeroWindow,
}

/// Maximum admitted requests per trailing window.
///
/// Immutable once constructed; one quota per limiter instance.
/// Deserialization goes through [`Quota::new`], so a config file cannot
/// smuggle in a zero window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuota")]
pub struct Quota {
    max_requests: NonZeroU32,
    window: Duration,
}

/// Unvalidated quota shape as it appears in config files.
#[derive(Deserialize)]
struct RawQuota {
    max_requests: u32,
    window: Duration,
}

impl TryFrom<RawQuota> for Quota {
    type Error = QuotaError;

    fn try_from(raw: RawQuota) -> Result<Self, Self::Error> {
        Self::new(raw.max_requests, raw.window)
    }
}

impl Quota {
    /// Create a quota of `max_requests` per `window`.
    ///
    /// # Errors
    ///
    /// Returns `QuotaError` if either bound is zero.
    pub fn new(max_requests: u32, window: Duration) -> Result<Self, QuotaError> {
        let max_requests = NonZeroU32::new(max_requests).ok_or(QuotaError::ZeroMaxRequests)?;
        if window.is_zero() {
            return Err(QuotaError::ZeroWindow);
        }
        Ok(Self {
            max_requests,
            window,
        })
    }

    /// Convenience quota of `max_requests` per minute.
    ///
    /// # Errors
    ///
    /// Returns `QuotaError::ZeroMaxRequests` if `max_requests` is zero.
    pub fn per_minute(max_requests: u32) -> Result<Self, QuotaError> {
        Self::new(max_requests, Duration::from_secs(60))
    }

    /// Convenience quota of `max_requests` per second.
    ///
    /// # Errors
    ///
    /// Returns `QuotaError::ZeroMaxRequests` if `max_requests` is zero.
    pub fn per_second(max_requests: u32) -> Result<Self, QuotaError> {
        Self::new(max_requests, Duration::from_secs(1))
    }

    /// Request ceiling within the window.
    #[must_use]
    pub const fn max_requests(&self) -> u32 {
        self.max_requests.get()
    }

    /// Trailing window duration.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }
}
