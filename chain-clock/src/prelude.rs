//! Convenient re-exports for time-dependent test scenarios
//!
//! ```rust
//! use chain_clock::prelude::*;
//! ```

pub use crate::advancer::{AdvancePhase, ClockAdvancer};
pub use crate::assertions::{
    assert_block_number, assert_elapsed_at_least, assert_time_at_least, assert_time_unchanged,
};
pub use crate::channel::{JsonRpcChannel, Operation, RequestChannel};
pub use crate::config::ChannelConfig;
pub use crate::error::{ClockError, ClockResult};
pub use crate::logging::init_test_logging;
pub use crate::orchestrator::{Clock, ManualClock, SystemClock};
pub use crate::reader::ClockReader;
pub use crate::session::{increase_time, increase_time_to, latest_block, latest_time, LedgerSession};
pub use crate::simulator::{SimulatedLedger, SimulatedLedgerBuilder};
pub use crate::types::{Block, ShiftAck, TimeShift, Timestamp};
pub use crate::units::{self, DAY, HOUR, MINUTE, WEEK, YEAR};

pub use std::sync::Arc;
