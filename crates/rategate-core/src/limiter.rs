//! Keyed sliding-window-log admission control.
//!
//! Each client identifier maps to the instants of its admitted requests
//! within the trailing window. An admission check prunes instants that
//! have aged out, counts the remainder, and appends the current instant
//! only when the quota still has room. Rejected checks never consume
//! quota.
//!
//! State is sharded by a hash of the client identifier. One shard lock
//! covers the whole read-prune-append sequence for a client, so two
//! concurrent checks for the same client can never both observe room
//! and over-admit. Checks for clients on different shards proceed in
//! parallel.
//!
//! Idle clients are evicted opportunistically: every
//! [`LimiterConfig::sweep_interval`] checks on a shard, that shard drops
//! every client whose window has emptied. [`SlidingWindowLimiter::sweep`]
//! does the same across all shards for callers that prefer driving
//! eviction from a periodic task.

use std::collections::{HashMap, VecDeque};
use std::hash::{BuildHasher, Hasher, RandomState};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};
use crate::quota::Quota;

/// Tuning knobs for limiter state management.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterConfig {
    /// Number of independently locked shards. More shards means more
    /// cross-client parallelism at the cost of a coarser sweep.
    pub shards: usize,
    /// Checks handled by a shard between opportunistic eviction sweeps.
    pub sweep_interval: u64,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            shards: 16,
            sweep_interval: 1024,
        }
    }
}

/// Per-client log of admitted-request instants.
type WindowLog = VecDeque<Instant>;

struct ShardState {
    windows: HashMap<String, WindowLog>,
    checks_since_sweep: u64,
}

struct Shard {
    state: Mutex<ShardState>,
}

impl Shard {
    fn new() -> Self {
        Self {
            state: Mutex::new(ShardState {
                windows: HashMap::new(),
                checks_since_sweep: 0,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ShardState> {
        // Nothing inside the critical section can panic, so a poisoned
        // lock still holds consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Per-client request-rate limiter using an exact sliding window log.
///
/// Constructed once at startup with a validated [`Quota`], then shared
/// (typically behind an `Arc`) with every caller that needs admission
/// decisions. [`check`](Self::check) is synchronous and never performs
/// I/O.
pub struct SlidingWindowLimiter<C: Clock = SystemClock> {
    quota: Quota,
    sweep_interval: u64,
    shards: Box<[Shard]>,
    hasher: RandomState,
    clock: C,
}

impl SlidingWindowLimiter<SystemClock> {
    /// Create a limiter with the given quota and default configuration.
    #[must_use]
    pub fn new(quota: Quota) -> Self {
        Self::with_config(quota, LimiterConfig::default())
    }

    /// Create a limiter with explicit state-management configuration.
    #[must_use]
    pub fn with_config(quota: Quota, config: LimiterConfig) -> Self {
        Self::with_clock(quota, config, SystemClock)
    }
}

impl<C: Clock> SlidingWindowLimiter<C> {
    /// Create a limiter reading time from a caller-supplied clock.
    #[must_use]
    pub fn with_clock(quota: Quota, config: LimiterConfig, clock: C) -> Self {
        let shard_count = config.shards.max(1);
        let shards: Vec<Shard> = (0..shard_count).map(|_| Shard::new()).collect();
        Self {
            quota,
            sweep_interval: config.sweep_interval.max(1),
            shards: shards.into_boxed_slice(),
            hasher: RandomState::new(),
            clock,
        }
    }

    /// The quota this limiter enforces.
    #[must_use]
    pub const fn quota(&self) -> Quota {
        self.quota
    }

    /// Check whether `client_id` may make a request right now.
    ///
    /// Returns `true` and records the request when fewer than
    /// `max_requests` admissions fall within the trailing window.
    /// Returns `false` otherwise; the rejected call is not recorded, so
    /// rejection never extends a client's lockout. Instants exactly one
    /// window old no longer count, making the window half-open.
    pub fn check(&self, client_id: &str) -> bool {
        let now = self.clock.now();
        let window = self.quota.window();
        let shard = self.shard_for(client_id);
        let mut state = shard.lock();

        let log = state.windows.entry(client_id.to_owned()).or_default();
        prune(log, now, window);

        let allowed = (log.len() as u64) < u64::from(self.quota.max_requests());
        if allowed {
            log.push_back(now);
        } else {
            tracing::trace!(client_id, "admission rejected");
        }

        state.checks_since_sweep += 1;
        if state.checks_since_sweep >= self.sweep_interval {
            state.checks_since_sweep = 0;
            let evicted = sweep_windows(&mut state.windows, now, window);
            if evicted > 0 {
                tracing::debug!(evicted, "evicted idle clients from shard");
            }
        }

        allowed
    }

    /// Evict every client whose window is empty as of now.
    ///
    /// Returns the number of clients removed. Safe to call from a
    /// periodic task; each shard is locked briefly in turn.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let window = self.quota.window();
        let mut evicted = 0;
        for shard in &self.shards {
            let mut state = shard.lock();
            state.checks_since_sweep = 0;
            evicted += sweep_windows(&mut state.windows, now, window);
        }
        if evicted > 0 {
            tracing::debug!(evicted, "evicted idle clients");
        }
        evicted
    }

    /// Number of client identifiers currently tracked.
    #[must_use]
    pub fn tracked_clients(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.lock().windows.len())
            .sum()
    }

    fn shard_for(&self, client_id: &str) -> &Shard {
        let mut hasher = self.hasher.build_hasher();
        hasher.write(client_id.as_bytes());
        let index = (hasher.finish() as usize) % self.shards.len();
        &self.shards[index]
    }
}

/// Drop instants that have aged out of the trailing window.
///
/// The comparison is `>=`, so an instant exactly `window` old is
/// evicted: the window counts `(now - window, now]`.
fn prune(log: &mut WindowLog, now: Instant, window: Duration) {
    while let Some(&front) = log.front() {
        if now.duration_since(front) >= window {
            log.pop_front();
        } else {
            break;
        }
    }
}

fn sweep_windows(
    windows: &mut HashMap<String, WindowLog>,
    now: Instant,
    window: Duration,
) -> usize {
    let before = windows.len();
    windows.retain(|_, log| {
        prune(log, now, window);
        !log.is_empty()
    });
    before - windows.len()
}
