//! Second counts for common spans, for use with `increase_time`
//!
//! ```rust
//! use chain_clock::units;
//!
//! assert_eq!(units::days(1), 86_400);
//! assert_eq!(units::weeks(2), units::days(14));
//! ```

pub const SECOND: i64 = 1;
pub const MINUTE: i64 = 60 * SECOND;
pub const HOUR: i64 = 60 * MINUTE;
pub const DAY: i64 = 24 * HOUR;
pub const WEEK: i64 = 7 * DAY;
/// 365 days, no leap handling
pub const YEAR: i64 = 365 * DAY;

pub const fn minutes(n: i64) -> i64 {
    n.saturating_mul(MINUTE)
}

pub const fn hours(n: i64) -> i64 {
    n.saturating_mul(HOUR)
}

pub const fn days(n: i64) -> i64 {
    n.saturating_mul(DAY)
}

pub const fn weeks(n: i64) -> i64 {
    n.saturating_mul(WEEK)
}

pub const fn years(n: i64) -> i64 {
    n.saturating_mul(YEAR)
}
