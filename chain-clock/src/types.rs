//! Ledger data model: timestamps, time shifts and blocks
//!
//! All times are whole seconds. Block timestamps are seconds since the Unix
//! epoch as recorded in the block header.

use crate::error::{ClockError, ClockResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::num::NonZeroU64;
use std::time::Duration;

/// Seconds since epoch as recorded in a block header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const EPOCH: Timestamp = Timestamp(0);

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// Add a number of seconds, `None` on overflow
    pub fn checked_add_secs(&self, secs: u64) -> Option<Self> {
        self.0.checked_add(secs).map(Self)
    }

    pub fn saturating_add_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Seconds elapsed since `earlier`, zero if `earlier` is later than `self`
    pub fn saturating_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Timestamp {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

/// A validated, strictly positive forward shift in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeShift(NonZeroU64);

impl TimeShift {
    /// Validate a caller-supplied number of seconds.
    ///
    /// Zero and negative values are rejected with `InvalidArgument`.
    pub fn from_secs(secs: i64) -> ClockResult<Self> {
        if secs <= 0 {
            return Err(ClockError::invalid_argument(format!(
                "time shift must be a positive number of seconds, got {}",
                secs
            )));
        }

        // secs > 0 was checked above
        Self::from_unsigned(secs as u64)
    }

    /// Validate an unsigned number of seconds, zero is rejected
    pub fn from_unsigned(secs: u64) -> ClockResult<Self> {
        NonZeroU64::new(secs)
            .map(Self)
            .ok_or_else(|| ClockError::invalid_argument("time shift must not be zero"))
    }

    /// Build from a [`Duration`], keeping whole seconds only.
    ///
    /// A duration shorter than one second is rejected.
    pub fn from_duration(duration: Duration) -> ClockResult<Self> {
        NonZeroU64::new(duration.as_secs()).map(Self).ok_or_else(|| {
            ClockError::invalid_argument(format!(
                "time shift must be at least one second, got {:?}",
                duration
            ))
        })
    }

    pub fn as_secs(&self) -> u64 {
        self.0.get()
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0.get())
    }
}

impl TryFrom<i64> for TimeShift {
    type Error = ClockError;

    fn try_from(secs: i64) -> ClockResult<Self> {
        Self::from_secs(secs)
    }
}

impl TryFrom<Duration> for TimeShift {
    type Error = ClockError;

    fn try_from(duration: Duration) -> ClockResult<Self> {
        Self::from_duration(duration)
    }
}

impl Display for TimeShift {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// A block as reported by the ledger node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Sequence number (genesis is 0)
    pub number: u64,
    /// Timestamp recorded in the header
    pub timestamp: Timestamp,
    /// Block hash, when the node reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl Block {
    pub fn new(number: u64, timestamp: Timestamp) -> Self {
        Self {
            number,
            timestamp,
            hash: None,
        }
    }

    pub fn with_hash<S: Into<String>>(mut self, hash: S) -> Self {
        self.hash = Some(hash.into());
        self
    }
}

/// Node acknowledgment of a time shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShiftAck {
    /// Cumulative clock offset in seconds, if the node reports it
    pub total_offset: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_shift_rejects_non_positive() {
        assert!(matches!(
            TimeShift::from_secs(0),
            Err(ClockError::InvalidArgument(_))
        ));
        assert!(matches!(
            TimeShift::from_secs(-5),
            Err(ClockError::InvalidArgument(_))
        ));
        assert!(matches!(
            TimeShift::from_secs(i64::MIN),
            Err(ClockError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_time_shift_accepts_positive() {
        let shift = TimeShift::from_secs(86_400).unwrap();
        assert_eq!(shift.as_secs(), 86_400);
        assert_eq!(shift.as_duration(), Duration::from_secs(86_400));
        assert_eq!(shift.to_string(), "86400s");
    }

    #[test]
    fn test_time_shift_from_duration_drops_subsecond() {
        let shift = TimeShift::try_from(Duration::from_millis(2_500)).unwrap();
        assert_eq!(shift.as_secs(), 2);

        assert!(TimeShift::try_from(Duration::from_millis(999)).is_err());
    }

    #[test]
    fn test_timestamp_arithmetic() {
        let t = Timestamp::from_secs(100);
        assert_eq!(t.checked_add_secs(5), Some(Timestamp::from_secs(105)));
        assert_eq!(Timestamp::from_secs(u64::MAX).checked_add_secs(1), None);
        assert_eq!(
            Timestamp::from_secs(u64::MAX).saturating_add_secs(1),
            Timestamp::from_secs(u64::MAX)
        );
        assert_eq!(Timestamp::from_secs(150).saturating_since(t), 50);
        assert_eq!(t.saturating_since(Timestamp::from_secs(150)), 0);
    }

    #[test]
    fn test_timestamp_serializes_as_integer() {
        let json = serde_json::to_string(&Timestamp::from_secs(1_700_000_000)).unwrap();
        assert_eq!(json, "1700000000");

        let block = Block::new(3, Timestamp::from_secs(42));
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["timestamp"], 42);
        assert!(json.get("hash").is_none());
    }
}
