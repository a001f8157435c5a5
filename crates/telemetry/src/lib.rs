//! Internal telemetry for the intake engine.
//!
//! Structured logging via `tracing` plus a small set of in-process counters;
//! a marketing-site backend does not warrant an external metrics system.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
