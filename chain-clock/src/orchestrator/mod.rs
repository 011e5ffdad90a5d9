// File: chain-clock/src/orchestrator/mod.rs
//
// Orchestrator Module
//
// Time sources injected into the simulated ledger.

/// Clock abstractions for deterministic block timestamps
pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};
