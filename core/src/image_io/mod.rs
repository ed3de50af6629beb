//! Image codec adapter, output naming and the lossless ciphertext container.
//!
//! Responsibilities:
//! - Decode files into `PixelBuffer` and encode them back by extension
//! - Derive output paths (prefix + optional target directory)
//! - Persist widened ciphertext without loss (`.rsai`)
//!
//! Non-responsibilities:
//! - Key material
//! - Parallelism

pub mod types;
pub mod codec;
pub mod naming;
pub mod container;

pub use types::*;
pub use codec::*;
pub use naming::*;
pub use container::*;
