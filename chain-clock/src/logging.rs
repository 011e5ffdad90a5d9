//! Test logger setup
//!
//! The library only emits records through the `log` facade. Scenarios that
//! want to see them call [`init_test_logging`] once; later calls are no-ops.

/// Route `log` records to the test harness output.
///
/// Honors `RUST_LOG`, defaulting to `info` for this crate.
pub fn init_test_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("chain_clock=info"),
    )
    .is_test(true)
    .try_init();
}
