//! SimulatedLedger - In-process test-mode ledger node
//!
//! Implements [`RequestChannel`] without any network, so reader and advancer
//! logic can be unit tested deterministically. Fault injection covers the
//! transport failures a real node connection can produce.

mod builder;

pub use builder::SimulatedLedgerBuilder;

use crate::channel::RequestChannel;
use crate::error::{ClockError, ClockResult, Operation};
use crate::orchestrator::Clock;
use crate::types::{Block, ShiftAck, TimeShift, Timestamp};
use async_trait::async_trait;
use log::{debug, warn};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Mutable ledger state, guarded as a unit so each request is atomic
#[derive(Debug, Default)]
struct LedgerState {
    /// Produced blocks, index == block number
    blocks: Vec<Block>,
    /// Cumulative clock offset in seconds
    offset: u64,
    /// Shift accepted since the last produced block
    pending_shift: u64,
    shifts_accepted: u64,
    blocks_mined: u64,
}

/// In-process single-node test ledger
///
/// # Block timestamps
///
/// A new block is stamped with the largest of:
/// - `clock.now() + offset`
/// - `previous + pending shift` (a shift is never swallowed by a previous
///   block that ran ahead of the clock)
/// - `previous + min_block_interval`
///
/// # Example
///
/// ```rust
/// use chain_clock::simulator::SimulatedLedger;
/// use chain_clock::{increase_time, latest_time};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let ledger = SimulatedLedger::builder().build();
/// let t0 = latest_time(&ledger).await.unwrap();
/// increase_time(&ledger, 3600).await.unwrap();
/// assert!(latest_time(&ledger).await.unwrap().saturating_since(t0) >= 3600);
/// # }
/// ```
pub struct SimulatedLedger {
    /// Injected clock for deterministic timestamps
    clock: Arc<dyn Clock>,

    state: RwLock<LedgerState>,

    /// Minimum spacing between consecutive block timestamps
    min_block_interval: u64,

    /// Largest single shift the node accepts
    max_advance: Option<u64>,

    // Fault injection
    connected: AtomicBool,
    fail_next_shift: AtomicBool,
    fail_next_mine: AtomicBool,
}

impl SimulatedLedger {
    pub fn builder() -> SimulatedLedgerBuilder {
        SimulatedLedgerBuilder::new()
    }

    pub(crate) fn new(
        clock: Arc<dyn Clock>,
        genesis: Option<Timestamp>,
        min_block_interval: u64,
        max_advance: Option<u64>,
    ) -> Self {
        let mut state = LedgerState::default();
        if let Some(timestamp) = genesis {
            state.blocks.push(Self::make_block(0, timestamp));
        }

        Self {
            clock,
            state: RwLock::new(state),
            min_block_interval,
            max_advance,
            connected: AtomicBool::new(true),
            fail_next_shift: AtomicBool::new(false),
            fail_next_mine: AtomicBool::new(false),
        }
    }

    fn make_block(number: u64, timestamp: Timestamp) -> Block {
        Block::new(number, timestamp)
            .with_hash(format!("0x{:016x}{:016x}", number, timestamp.as_secs()))
    }

    // ========================================================================
    // Fault injection
    // ========================================================================

    /// Make every request fail with a transport error until [`Self::reconnect`]
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Drop the connection on the next `shift_time` request, before it is applied
    pub fn fail_next_shift(&self) {
        self.fail_next_shift.store(true, Ordering::SeqCst);
    }

    /// Drop the connection on the next `mine_block` request.
    ///
    /// A shift already accepted stays pending and is applied by the next
    /// successful mine. Real nodes may behave differently.
    pub fn fail_next_mine(&self) {
        self.fail_next_mine.store(true, Ordering::SeqCst);
    }

    fn ensure_connected(&self, operation: Operation) -> ClockResult<()> {
        if !self.is_connected() {
            return Err(ClockError::transport(operation, "ledger disconnected"));
        }
        Ok(())
    }

    fn take_fault(flag: &AtomicBool, operation: Operation) -> ClockResult<()> {
        if flag.swap(false, Ordering::SeqCst) {
            warn!("Injected transport failure during {}", operation);
            return Err(ClockError::transport(operation, "connection reset by peer"));
        }
        Ok(())
    }

    // ========================================================================
    // Direct state access (for test assertions)
    // ========================================================================

    /// Number of blocks, genesis included
    pub fn block_count(&self) -> usize {
        self.state.read().blocks.len()
    }

    /// Blocks produced by `mine_block`, genesis excluded
    pub fn blocks_mined(&self) -> u64 {
        self.state.read().blocks_mined
    }

    pub fn shifts_accepted(&self) -> u64 {
        self.state.read().shifts_accepted
    }

    /// Cumulative clock offset in seconds
    pub fn total_offset(&self) -> u64 {
        self.state.read().offset
    }

    pub fn block(&self, number: u64) -> Option<Block> {
        let index = usize::try_from(number).ok()?;
        self.state.read().blocks.get(index).cloned()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }
}

#[async_trait]
impl RequestChannel for SimulatedLedger {
    async fn get_latest_block(&self) -> ClockResult<Option<Block>> {
        self.ensure_connected(Operation::GetLatestBlock)?;
        Ok(self.state.read().blocks.last().cloned())
    }

    async fn shift_time(&self, shift: TimeShift) -> ClockResult<ShiftAck> {
        self.ensure_connected(Operation::ShiftTime)?;
        Self::take_fault(&self.fail_next_shift, Operation::ShiftTime)?;

        let secs = shift.as_secs();
        if let Some(max) = self.max_advance {
            if secs > max {
                warn!("Rejecting shift of {}, maximum is {}s", shift, max);
                return Err(ClockError::rejected(
                    None,
                    format!("shift of {} exceeds maximum advance of {}s", shift, max),
                ));
            }
        }

        let mut state = self.state.write();
        let offset = state.offset.checked_add(secs).ok_or_else(|| {
            ClockError::rejected(None, "cumulative time offset would overflow")
        })?;
        state.offset = offset;
        state.pending_shift = state.pending_shift.saturating_add(secs);
        state.shifts_accepted += 1;
        debug!("Shifted ledger clock by {} (offset now {}s)", shift, offset);

        Ok(ShiftAck {
            total_offset: Some(offset),
        })
    }

    async fn mine_block(&self) -> ClockResult<Block> {
        self.ensure_connected(Operation::MineBlock)?;
        Self::take_fault(&self.fail_next_mine, Operation::MineBlock)?;

        let mut state = self.state.write();
        let shifted_now = self.clock.now().saturating_add_secs(state.offset);

        let timestamp = match state.blocks.last() {
            Some(previous) => {
                let spacing = state.pending_shift.max(self.min_block_interval);
                shifted_now.max(previous.timestamp.saturating_add_secs(spacing))
            }
            None => shifted_now,
        };

        let number = state.blocks.len() as u64;
        let block = Self::make_block(number, timestamp);
        state.blocks.push(block.clone());
        state.pending_shift = 0;
        state.blocks_mined += 1;
        debug!("Mined block {} at {}", number, timestamp);

        Ok(block)
    }
}
