//! pixel-rsa-core
//!
//! Textbook RSA applied byte-wise to image samples: prime sieve, key derivation, a 256-entry
//! codec table, and a data-parallel transform over sequential, threaded and wgpu backends.
//! No CLI, no logger initialisation.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;

// Key material and tables
pub mod keys;
pub mod codec;

// Buffers and transforms
pub mod pixel;
pub mod transform;

// I/O and orchestration
pub mod image_io;
pub mod batch;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::batch::{run_batch, run_decrypt, run_single, BatchReport, ItemOutcome, ItemStatus, KeyMaterial};
    pub use crate::codec::{build_table, CodecTable, Direction};
    pub use crate::config::EngineConfig;
    pub use crate::keys::{derive_keys, generate_primes, KeyPair, PrimeSet};
    pub use crate::pixel::{PixelBuffer, Samples};
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::transform::{transform, Strategy, TransformEngine};
    pub use crate::types::EngineError;
}
