//! ClockAdvancer - shift the ledger clock and make the shift observable
//!
//! A time shift alone is accepted by the node but not visible to readers
//! until a block is produced. Every advance therefore issues the shift and
//! then mines exactly one block, in that order, and only the mining
//! acknowledgment completes the call.
//!
//! Advancing is **not idempotent**: two calls with the same duration move
//! the clock twice. Nothing is retried, since repeating a partially applied
//! shift could double-apply it.

use crate::channel::RequestChannel;
use crate::error::{ClockError, ClockResult};
use crate::reader::ClockReader;
use crate::types::{Block, TimeShift, Timestamp};
use log::{debug, trace, warn};
use std::fmt::{Display, Formatter};

/// Per-call progress of an advance
///
/// ```text
/// Idle -> ShiftRequested -> ShiftAcknowledged -> BlockRequested -> BlockProduced
///   \__________\________________\___________________\______> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvancePhase {
    Idle,
    ShiftRequested,
    ShiftAcknowledged,
    BlockRequested,
    /// Terminal success
    BlockProduced,
    /// Terminal failure
    Failed,
}

impl AdvancePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::BlockProduced | Self::Failed)
    }

    fn can_move_to(&self, next: AdvancePhase) -> bool {
        use AdvancePhase::*;
        match (self, next) {
            (from, Failed) => !from.is_terminal(),
            (Idle, ShiftRequested)
            | (ShiftRequested, ShiftAcknowledged)
            | (ShiftAcknowledged, BlockRequested)
            | (BlockRequested, BlockProduced) => true,
            _ => false,
        }
    }
}

impl Display for AdvancePhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Shifts the ledger clock through a borrowed request channel
pub struct ClockAdvancer<'a, C: RequestChannel + ?Sized> {
    channel: &'a C,
    phase: AdvancePhase,
}

impl<'a, C: RequestChannel + ?Sized> ClockAdvancer<'a, C> {
    pub fn new(channel: &'a C) -> Self {
        Self {
            channel,
            phase: AdvancePhase::Idle,
        }
    }

    /// Terminal phase of the most recent call, `Idle` before the first one
    pub fn last_phase(&self) -> AdvancePhase {
        self.phase
    }

    fn enter(&mut self, next: AdvancePhase) {
        debug_assert!(
            self.phase.can_move_to(next),
            "invalid advance transition {} -> {}",
            self.phase,
            next
        );
        trace!("Advance phase {} -> {}", self.phase, next);
        self.phase = next;
    }

    fn fail<T>(&mut self, err: ClockError) -> ClockResult<T> {
        self.enter(AdvancePhase::Failed);
        Err(err)
    }

    /// Advance the ledger clock by `secs` seconds and mine one block.
    ///
    /// # Returns
    ///
    /// The timestamp of the newly produced block.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `secs <= 0`, before any request is sent
    /// - `AdvanceRejected` if the node refuses the shift
    /// - `Transport` if either request fails
    pub async fn advance(&mut self, secs: i64) -> ClockResult<Timestamp> {
        self.phase = AdvancePhase::Idle;
        match TimeShift::from_secs(secs) {
            Ok(shift) => Ok(self.run(shift).await?.timestamp),
            Err(err) => self.fail(err),
        }
    }

    /// Advance by an already validated shift, returning the produced block
    pub async fn advance_by(&mut self, shift: TimeShift) -> ClockResult<Block> {
        self.phase = AdvancePhase::Idle;
        self.run(shift).await
    }

    /// Advance until the next block is stamped at or after `target`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `target` is not after the latest block, in which
    /// case nothing is shifted or mined.
    pub async fn advance_to(&mut self, target: Timestamp) -> ClockResult<Timestamp> {
        self.phase = AdvancePhase::Idle;
        let latest = match ClockReader::new(self.channel).latest_time().await {
            Ok(latest) => latest,
            Err(err) => return self.fail(err),
        };

        if target <= latest {
            return self.fail(ClockError::invalid_argument(format!(
                "target {} is not after latest block time {}",
                target, latest
            )));
        }

        let shift = match TimeShift::from_unsigned(target.saturating_since(latest)) {
            Ok(shift) => shift,
            Err(err) => return self.fail(err),
        };
        Ok(self.run(shift).await?.timestamp)
    }

    async fn run(&mut self, shift: TimeShift) -> ClockResult<Block> {
        self.enter(AdvancePhase::ShiftRequested);
        let ack = match self.channel.shift_time(shift).await {
            Ok(ack) => ack,
            Err(err) => {
                warn!("Time shift of {} failed: {}", shift, err);
                return self.fail(err);
            }
        };
        self.enter(AdvancePhase::ShiftAcknowledged);
        debug!(
            "Node accepted shift of {} (total offset {:?})",
            shift, ack.total_offset
        );

        // The shift is only observable once a block carries it
        self.enter(AdvancePhase::BlockRequested);
        let block = match self.channel.mine_block().await {
            Ok(block) => block,
            Err(err) => {
                warn!(
                    "Block production after shift of {} failed, ledger time is undefined: {}",
                    shift, err
                );
                return self.fail(err);
            }
        };
        self.enter(AdvancePhase::BlockProduced);
        debug!(
            "Advanced ledger clock by {}: block {} at {}",
            shift, block.number, block.timestamp
        );

        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Operation;
    use crate::orchestrator::ManualClock;
    use crate::simulator::SimulatedLedger;
    use std::sync::Arc;

    fn ledger() -> SimulatedLedger {
        SimulatedLedger::builder()
            .with_clock(Arc::new(ManualClock::starting_at(10_000)))
            .build()
    }

    #[test]
    fn test_phase_transitions() {
        use AdvancePhase::*;
        assert!(Idle.can_move_to(ShiftRequested));
        assert!(BlockRequested.can_move_to(BlockProduced));
        assert!(ShiftAcknowledged.can_move_to(Failed));
        assert!(!Idle.can_move_to(BlockRequested));
        assert!(!BlockProduced.can_move_to(Failed));
        assert!(!Failed.can_move_to(Failed));
        assert!(BlockProduced.is_terminal() && Failed.is_terminal());
        assert!(!BlockRequested.is_terminal());
    }

    #[tokio::test]
    async fn test_advance_returns_new_block_time() {
        let ledger = ledger();
        let mut advancer = ClockAdvancer::new(&ledger);
        assert_eq!(advancer.last_phase(), AdvancePhase::Idle);

        let t = advancer.advance(3_600).await.unwrap();
        assert_eq!(t, Timestamp::from_secs(13_600));
        assert_eq!(advancer.last_phase(), AdvancePhase::BlockProduced);
        assert_eq!(ledger.blocks_mined(), 1);
    }

    #[tokio::test]
    async fn test_advance_invalid_argument_sends_nothing() {
        let ledger = ledger();
        let mut advancer = ClockAdvancer::new(&ledger);

        for secs in [0, -5] {
            let err = advancer.advance(secs).await.unwrap_err();
            assert!(matches!(err, ClockError::InvalidArgument(_)));
            assert_eq!(advancer.last_phase(), AdvancePhase::Failed);
        }
        assert_eq!(ledger.shifts_accepted(), 0);
        assert_eq!(ledger.blocks_mined(), 0);
    }

    #[tokio::test]
    async fn test_advance_rejected_is_not_retried() {
        let ledger = SimulatedLedger::builder().with_max_advance(100).build();
        let mut advancer = ClockAdvancer::new(&ledger);

        let err = advancer.advance(101).await.unwrap_err();
        assert!(matches!(err, ClockError::AdvanceRejected { .. }));
        assert_eq!(advancer.last_phase(), AdvancePhase::Failed);
        assert_eq!(ledger.blocks_mined(), 0);
        assert_eq!(ledger.shifts_accepted(), 0);
    }

    #[tokio::test]
    async fn test_mine_failure_surfaces_transport() {
        let ledger = ledger();
        ledger.fail_next_mine();

        let mut advancer = ClockAdvancer::new(&ledger);
        let err = advancer.advance(60).await.unwrap_err();
        assert_eq!(err.operation(), Some(Operation::MineBlock));
        assert_eq!(advancer.last_phase(), AdvancePhase::Failed);
        // The shift itself went through before the mine failed
        assert_eq!(ledger.shifts_accepted(), 1);
    }

    #[tokio::test]
    async fn test_advancer_reusable_after_failure() {
        let ledger = ledger();
        let mut advancer = ClockAdvancer::new(&ledger);

        assert!(advancer.advance(-1).await.is_err());
        advancer.advance(1).await.unwrap();
        assert_eq!(advancer.last_phase(), AdvancePhase::BlockProduced);
    }

    #[tokio::test]
    async fn test_advance_to_target() {
        let ledger = ledger();
        let mut advancer = ClockAdvancer::new(&ledger);

        let t = advancer.advance_to(Timestamp::from_secs(20_000)).await.unwrap();
        assert!(t >= Timestamp::from_secs(20_000));

        let err = advancer
            .advance_to(Timestamp::from_secs(20_000))
            .await
            .unwrap_err();
        assert!(matches!(err, ClockError::InvalidArgument(_)));
        assert_eq!(ledger.blocks_mined(), 1);
    }

    #[tokio::test]
    async fn test_advance_by_returns_block() {
        let ledger = ledger();
        let block = ClockAdvancer::new(&ledger)
            .advance_by(TimeShift::from_secs(5).unwrap())
            .await
            .unwrap();
        assert_eq!(block.number, 1);
        assert_eq!(ledger.block(1), Some(block));
    }
}
