//! ClockReader - latest block timestamp

use crate::channel::RequestChannel;
use crate::error::{ClockError, ClockResult};
use crate::types::{Block, Timestamp};
use log::trace;

/// Reads the timestamp of the ledger's latest block.
///
/// Borrows the channel; reading never produces a block or mutates ledger
/// state, so two reads with no state change in between return the same value.
pub struct ClockReader<'a, C: RequestChannel + ?Sized> {
    channel: &'a C,
}

impl<'a, C: RequestChannel + ?Sized> ClockReader<'a, C> {
    pub fn new(channel: &'a C) -> Self {
        Self { channel }
    }

    /// Latest block as reported by the node
    ///
    /// # Errors
    ///
    /// - `NotReady` if no block has been produced yet
    /// - `Transport` if the channel fails or the header is malformed
    pub async fn latest_block(&self) -> ClockResult<Block> {
        let block = self
            .channel
            .get_latest_block()
            .await?
            .ok_or(ClockError::NotReady)?;
        trace!("Latest block {} at {}", block.number, block.timestamp);
        Ok(block)
    }

    /// Timestamp of the latest block
    pub async fn latest_time(&self) -> ClockResult<Timestamp> {
        Ok(self.latest_block().await?.timestamp)
    }
}
