//! Byte-indexed codec tables.
//!
//! Responsibilities:
//! - Precompute `encrypt[v]` for every byte and the inverse lookup
//! - Verify the round-trip once, before any transform reads the table
//!
//! Non-responsibilities:
//! - Parallelism
//! - Image I/O

pub mod types;
pub mod table;

pub use types::*;
pub use table::*;
