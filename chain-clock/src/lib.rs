//! # chain-clock
//!
//! Test-time control for a single-node test ledger.
//!
//! Logic that depends on elapsed chain time (lockups, auctions, vesting,
//! deadlines) cannot be tested by waiting. This crate reads the timestamp of
//! the ledger's latest block and advances the ledger clock, forcing a new
//! block so the advance is visible to the next read.
//!
//! ## Quick Start
//!
//! ```rust
//! use chain_clock::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let session = LedgerSession::new(SimulatedLedger::builder().build());
//!
//! let t0 = session.latest_time().await?;
//! session.increase_time(DAY).await?;
//! assert_elapsed_at_least(session.channel(), t0, DAY as u64).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Against a running test node, connect over JSON-RPC instead:
//!
//! ```rust,ignore
//! let session = LedgerSession::connect(ChannelConfig::new("127.0.0.1:8545"))?;
//! ```
//!
//! ## Components
//!
//! - [`reader::ClockReader`]: latest block timestamp, no side effects
//! - [`advancer::ClockAdvancer`]: shift then mine, in that order, never retried
//! - [`channel::RequestChannel`]: the node-control seam, implemented by
//!   [`channel::JsonRpcChannel`] and [`simulator::SimulatedLedger`]

#![warn(clippy::all)]

pub mod advancer;
pub mod assertions;
pub mod channel;
pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod reader;
pub mod session;
pub mod simulator;
pub mod types;
pub mod units;

// Convenient re-exports for common usage
pub mod prelude;

// Re-export commonly used types at crate root
pub use error::{ClockError, ClockResult};
pub use session::{increase_time, increase_time_to, latest_block, latest_time, LedgerSession};
pub use types::{Block, TimeShift, Timestamp};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
