use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Node-control request that was in flight when a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Query of the most recently produced block
    GetLatestBlock,
    /// Request to shift the node clock forward
    ShiftTime,
    /// Request to produce one new block
    MineBlock,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::GetLatestBlock => "get_latest_block",
            Self::ShiftTime => "shift_time",
            Self::MineBlock => "mine_block",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by the time-control subsystem.
///
/// None of these are recovered locally. Every variant is meant to fail the
/// calling test scenario, and no operation is retried automatically because a
/// time shift is not safely repeatable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// The channel or node was unreachable, timed out, or answered with a
    /// malformed or absent payload.
    #[error("Transport error during {operation}: {reason}")]
    Transport { operation: Operation, reason: String },

    /// No block has been produced yet on the ledger.
    #[error("Ledger has not produced any block yet")]
    NotReady,

    /// Input was rejected before any request was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The node refused the time shift. The shift may or may not have been
    /// partially applied, so the caller decides what to do next.
    #[error("Time advance rejected by node{}: {message}", code_suffix(.code))]
    AdvanceRejected { code: Option<i64>, message: String },
}

impl ClockError {
    pub fn transport<S: Into<String>>(operation: Operation, reason: S) -> Self {
        Self::Transport {
            operation,
            reason: reason.into(),
        }
    }

    pub fn invalid_argument<S: Into<String>>(reason: S) -> Self {
        Self::InvalidArgument(reason.into())
    }

    pub fn rejected<S: Into<String>>(code: Option<i64>, message: S) -> Self {
        Self::AdvanceRejected {
            code,
            message: message.into(),
        }
    }

    /// Operation that failed, for transport errors
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Transport { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

fn code_suffix(code: &Option<i64>) -> String {
    code.map(|c| format!(" (code {})", c)).unwrap_or_default()
}

pub type ClockResult<T> = std::result::Result<T, ClockError>;

/// Errors raised while loading or validating a [`crate::config::ChannelConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Invalid {field}: {value} seconds - must be between {min} and {max} seconds")]
    InvalidTimeout {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("Method name for {0} must not be empty")]
    EmptyMethod(&'static str),

    #[error("max_advance_secs must be greater than zero")]
    InvalidMaxAdvance,

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
