//! SimulatedLedgerBuilder - Fluent API for configuring SimulatedLedger instances

use super::SimulatedLedger;
use crate::orchestrator::{Clock, ManualClock};
use crate::types::Timestamp;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
enum Genesis {
    /// Stamped with the clock's current time
    AtClockNow,
    At(Timestamp),
    Absent,
}

/// Builder for SimulatedLedger instances
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use chain_clock::orchestrator::ManualClock;
/// use chain_clock::simulator::SimulatedLedger;
///
/// let ledger = SimulatedLedger::builder()
///     .with_clock(Arc::new(ManualClock::starting_at(1_700_000_000)))
///     .with_min_block_interval(1)
///     .with_max_advance(365 * 24 * 3600)
///     .build();
/// assert_eq!(ledger.block_count(), 1);
/// ```
pub struct SimulatedLedgerBuilder {
    /// Clock implementation for block timestamps
    clock: Option<Arc<dyn Clock>>,

    genesis: Genesis,

    min_block_interval: u64,

    max_advance: Option<u64>,
}

impl SimulatedLedgerBuilder {
    /// Create new builder with defaults
    ///
    /// Default configuration:
    /// - `ManualClock` starting at [`ManualClock::DEFAULT_START`]
    /// - genesis block stamped at the clock's current time
    /// - no minimum block interval, no advance limit
    pub fn new() -> Self {
        Self {
            clock: None,
            genesis: Genesis::AtClockNow,
            min_block_interval: 0,
            max_advance: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Stamp genesis with a fixed timestamp instead of the clock's time
    pub fn with_genesis_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.genesis = Genesis::At(timestamp);
        self
    }

    /// Start with no block at all, so reads fail with `NotReady` until the
    /// first block is mined
    pub fn without_genesis(mut self) -> Self {
        self.genesis = Genesis::Absent;
        self
    }

    /// Minimum seconds between consecutive block timestamps
    pub fn with_min_block_interval(mut self, secs: u64) -> Self {
        self.min_block_interval = secs;
        self
    }

    /// Largest single time shift the ledger accepts
    pub fn with_max_advance(mut self, secs: u64) -> Self {
        self.max_advance = Some(secs);
        self
    }

    pub fn build(self) -> SimulatedLedger {
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(ManualClock::new()));

        let genesis = match self.genesis {
            Genesis::AtClockNow => Some(clock.now()),
            Genesis::At(timestamp) => Some(timestamp),
            Genesis::Absent => None,
        };

        SimulatedLedger::new(clock, genesis, self.min_block_interval, self.max_advance)
    }
}

impl Default for SimulatedLedgerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
