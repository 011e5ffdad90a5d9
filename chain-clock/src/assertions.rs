//! Time assertion helpers for test scenarios
//!
//! These helpers read the ledger through a [`RequestChannel`] and produce
//! readable failure messages for test output.

use crate::channel::RequestChannel;
use crate::reader::ClockReader;
use crate::types::Timestamp;
use anyhow::{Context, Result};

/// Assert that the latest block time is at least `min`
///
/// # Errors
///
/// Returns an error if:
/// - the read fails
/// - the latest block is earlier than `min`
///
/// # Example
///
/// ```rust,ignore
/// assert_time_at_least(&ledger, deadline).await?;
/// ```
pub async fn assert_time_at_least<C: RequestChannel + ?Sized>(
    channel: &C,
    min: Timestamp,
) -> Result<()> {
    let actual = ClockReader::new(channel)
        .latest_time()
        .await
        .context("Failed to read latest block time")?;

    if actual < min {
        anyhow::bail!(
            "Latest block time too early: expected >={}, got {} ({}s short)",
            min,
            actual,
            min.saturating_since(actual)
        );
    }

    Ok(())
}

/// Assert that at least `secs` seconds of ledger time passed since `baseline`
///
/// # Example
///
/// ```rust,ignore
/// let t0 = latest_time(&ledger).await?;
/// increase_time(&ledger, units::DAY).await?;
/// assert_elapsed_at_least(&ledger, t0, units::DAY as u64).await?;
/// ```
pub async fn assert_elapsed_at_least<C: RequestChannel + ?Sized>(
    channel: &C,
    baseline: Timestamp,
    secs: u64,
) -> Result<()> {
    let actual = ClockReader::new(channel)
        .latest_time()
        .await
        .context("Failed to read latest block time")?;

    let elapsed = actual.saturating_since(baseline);
    if elapsed < secs {
        anyhow::bail!(
            "Elapsed ledger time too short: expected >={}s since {}, got {}s",
            secs,
            baseline,
            elapsed
        );
    }

    Ok(())
}

/// Assert that the latest block time equals `expected`
pub async fn assert_time_unchanged<C: RequestChannel + ?Sized>(
    channel: &C,
    expected: Timestamp,
) -> Result<()> {
    let actual = ClockReader::new(channel)
        .latest_time()
        .await
        .context("Failed to read latest block time")?;

    if actual != expected {
        anyhow::bail!(
            "Latest block time changed: expected {}, got {}",
            expected,
            actual
        );
    }

    Ok(())
}

/// Assert that the latest block has sequence number `expected`
pub async fn assert_block_number<C: RequestChannel + ?Sized>(
    channel: &C,
    expected: u64,
) -> Result<()> {
    let block = ClockReader::new(channel)
        .latest_block()
        .await
        .context("Failed to read latest block")?;

    if block.number != expected {
        anyhow::bail!(
            "Block number mismatch: expected {}, got {}",
            expected,
            block.number
        );
    }

    Ok(())
}
