//! Batch processing of image files.
//!
//! Responsibilities:
//! - Discover inputs under a directory
//! - Derive key material once per run and share the table read-only
//! - Run load → encrypt → save (→ verify) per image on a bounded worker pool
//! - Decrypt a stored container with key material rebuilt from its seed
//! - Collect per-item outcomes and telemetry into a report
//!
//! Non-responsibilities:
//! - Argument parsing
//! - Logger initialisation

pub mod types;
pub mod discover;
pub mod material;
pub mod item;
pub mod runner;
pub mod decrypt;

pub use types::*;
pub use discover::*;
pub use material::*;
pub use item::*;
pub use runner::*;
pub use decrypt::*;
