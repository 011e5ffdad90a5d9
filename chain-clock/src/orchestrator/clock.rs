// File: chain-clock/src/orchestrator/clock.rs
//
// Wall-clock sources for the simulated ledger
//
// The simulator stamps each block with `clock.now() + offset`. Injecting the
// clock keeps block timestamps deterministic in tests and real in demos.

use crate::types::Timestamp;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Clock abstraction trait - the simulator depends only on this trait
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use chain_clock::orchestrator::clock::{Clock, ManualClock};
///
/// let clock = Arc::new(ManualClock::starting_at(1_700_000_000));
/// clock.advance(Duration::from_secs(30));
/// assert_eq!(clock.now().as_secs(), 1_700_000_030);
/// ```
pub trait Clock: Send + Sync {
    /// Current wall-clock time in whole seconds since epoch
    fn now(&self) -> Timestamp;
}

/// Real system time
///
/// Blocks produced back-to-back may share a timestamp, and blocks produced
/// across a second boundary will not. Use [`ManualClock`] when a test needs
/// exact values.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // Pre-epoch system time is clamped to the epoch
        Timestamp::from_secs(Utc::now().timestamp().max(0) as u64)
    }
}

/// Manually driven clock (test environment)
///
/// Time only moves when told to via [`ManualClock::advance`] or
/// [`ManualClock::set`], making block timestamps fully reproducible.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use chain_clock::orchestrator::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::starting_at(100);
/// let start = clock.now();
///
/// clock.advance(Duration::from_secs(3600));
/// assert_eq!(clock.now().saturating_since(start), 3600);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Default start time, 2024-01-01T00:00:00Z
    pub const DEFAULT_START: u64 = 1_704_067_200;

    pub fn new() -> Self {
        Self::starting_at(Self::DEFAULT_START)
    }

    pub fn starting_at(secs: u64) -> Self {
        Self {
            now: AtomicU64::new(secs),
        }
    }

    /// Move time forward, whole seconds only
    pub fn advance(&self, d: Duration) {
        let secs = d.as_secs();
        let mut current = self.now.load(Ordering::SeqCst);
        loop {
            let next = current.saturating_add(secs);
            match self
                .now
                .compare_exchange_weak(current, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }

    pub fn set(&self, secs: u64) {
        self.now.store(secs, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_secs(self.now.load(Ordering::SeqCst))
    }
}
