//! Request channel seam
//!
//! The ledger node is reached only through [`RequestChannel`]. The in-process
//! simulator and the JSON-RPC transport both implement it, so the reader and
//! advancer run unchanged against either.

pub mod json_rpc;
pub(crate) mod wire;

pub use crate::error::Operation;
pub use json_rpc::JsonRpcChannel;

use crate::error::ClockResult;
use crate::types::{Block, ShiftAck, TimeShift};
use async_trait::async_trait;
use std::sync::Arc;

/// Node-control transport to a single test-mode ledger node.
///
/// The channel is owned by the test environment. Readers and advancers only
/// borrow it and never close it.
///
/// # Implementation Note
///
/// Each call is one request/response exchange. Implementations must not
/// retry on their own: a repeated `shift_time` would apply the shift twice.
#[async_trait]
pub trait RequestChannel: Send + Sync {
    /// Get the most recently produced block.
    ///
    /// # Returns
    ///
    /// `None` when the node has not produced any block yet.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the node is unreachable or the header is
    /// malformed.
    async fn get_latest_block(&self) -> ClockResult<Option<Block>>;

    /// Ask the node to shift the clock used for the next block.
    ///
    /// The shift is not observable until a block is mined.
    ///
    /// # Errors
    ///
    /// Returns `AdvanceRejected` if the node refuses the shift, `Transport`
    /// on channel failure.
    async fn shift_time(&self, shift: TimeShift) -> ClockResult<ShiftAck>;

    /// Force production of exactly one new block and return it.
    async fn mine_block(&self) -> ClockResult<Block>;
}

#[async_trait]
impl<T: RequestChannel + ?Sized> RequestChannel for &T {
    async fn get_latest_block(&self) -> ClockResult<Option<Block>> {
        (**self).get_latest_block().await
    }

    async fn shift_time(&self, shift: TimeShift) -> ClockResult<ShiftAck> {
        (**self).shift_time(shift).await
    }

    async fn mine_block(&self) -> ClockResult<Block> {
        (**self).mine_block().await
    }
}

#[async_trait]
impl<T: RequestChannel + ?Sized> RequestChannel for Arc<T> {
    async fn get_latest_block(&self) -> ClockResult<Option<Block>> {
        (**self).get_latest_block().await
    }

    async fn shift_time(&self, shift: TimeShift) -> ClockResult<ShiftAck> {
        (**self).shift_time(shift).await
    }

    async fn mine_block(&self) -> ClockResult<Block> {
        (**self).mine_block().await
    }
}

#[async_trait]
impl<T: RequestChannel + ?Sized> RequestChannel for Box<T> {
    async fn get_latest_block(&self) -> ClockResult<Option<Block>> {
        (**self).get_latest_block().await
    }

    async fn shift_time(&self, shift: TimeShift) -> ClockResult<ShiftAck> {
        (**self).shift_time(shift).await
    }

    async fn mine_block(&self) -> ClockResult<Block> {
        (**self).mine_block().await
    }
}
