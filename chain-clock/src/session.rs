//! Consumer-facing time-control API
//!
//! [`LedgerSession`] is an explicit handle to one ledger. Several sessions,
//! each bound to its own ledger, can live in the same test process. The free
//! functions do the same work against any borrowed channel.
//!
//! Concurrent advances against one ledger are not supported: callers must
//! run time-dependent scenarios one at a time per ledger instance.

use crate::advancer::ClockAdvancer;
use crate::channel::{JsonRpcChannel, RequestChannel};
use crate::config::ChannelConfig;
use crate::error::{ClockResult, ConfigError};
use crate::reader::ClockReader;
use crate::types::{Block, Timestamp};
use std::sync::Arc;

/// Handle to a single ledger, shared by the scenarios that use it
#[derive(Clone)]
pub struct LedgerSession {
    channel: Arc<dyn RequestChannel>,
}

impl LedgerSession {
    pub fn new<C: RequestChannel + 'static>(channel: C) -> Self {
        Self {
            channel: Arc::new(channel),
        }
    }

    /// Bind to a channel the test environment keeps its own handle to
    pub fn from_shared<C: RequestChannel + 'static>(channel: Arc<C>) -> Self {
        Self { channel }
    }

    /// Connect to a node over JSON-RPC
    pub fn connect(config: ChannelConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(JsonRpcChannel::with_config(config)?))
    }

    pub fn channel(&self) -> &dyn RequestChannel {
        self.channel.as_ref()
    }

    pub fn reader(&self) -> ClockReader<'_, dyn RequestChannel> {
        ClockReader::new(self.channel.as_ref())
    }

    pub fn advancer(&self) -> ClockAdvancer<'_, dyn RequestChannel> {
        ClockAdvancer::new(self.channel.as_ref())
    }

    /// Timestamp of the latest block
    pub async fn latest_time(&self) -> ClockResult<Timestamp> {
        latest_time(self.channel.as_ref()).await
    }

    pub async fn latest_block(&self) -> ClockResult<Block> {
        latest_block(self.channel.as_ref()).await
    }

    /// Shift the clock forward by `secs` and mine one block.
    ///
    /// Not idempotent: every call adds another `secs`.
    pub async fn increase_time(&self, secs: i64) -> ClockResult<Timestamp> {
        increase_time(self.channel.as_ref(), secs).await
    }

    /// Shift the clock so the next block lands at or after `target`
    pub async fn increase_time_to(&self, target: Timestamp) -> ClockResult<Timestamp> {
        increase_time_to(self.channel.as_ref(), target).await
    }
}

impl std::fmt::Debug for LedgerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerSession").finish_non_exhaustive()
    }
}

/// Timestamp of the latest block on `channel`
pub async fn latest_time<C: RequestChannel + ?Sized>(channel: &C) -> ClockResult<Timestamp> {
    ClockReader::new(channel).latest_time().await
}

pub async fn latest_block<C: RequestChannel + ?Sized>(channel: &C) -> ClockResult<Block> {
    ClockReader::new(channel).latest_block().await
}

/// Shift the clock on `channel` forward by `secs` and mine one block.
///
/// Returns the new block's timestamp. Not idempotent.
pub async fn increase_time<C: RequestChannel + ?Sized>(
    channel: &C,
    secs: i64,
) -> ClockResult<Timestamp> {
    ClockAdvancer::new(channel).advance(secs).await
}

pub async fn increase_time_to<C: RequestChannel + ?Sized>(
    channel: &C,
    target: Timestamp,
) -> ClockResult<Timestamp> {
    ClockAdvancer::new(channel).advance_to(target).await
}
