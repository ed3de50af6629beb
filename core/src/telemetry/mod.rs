//! telemetry/mod.rs
//! Counters, stage timers and immutable snapshots for key generation, transforms and batches.
//!
//! - Workers keep their own counters and merge them at the end (no shared atomics).
//! - Snapshots are immutable and serializable for `--report` output.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
