//! telemetry/mod.rs
//! Per-run pack counters.
//!
//! Counters are plain integers owned by the sink; there is no shared state and
//! nothing is reported until the run returns its summary.

pub mod counters;

pub use counters::*;
