use std::io;
use thiserror::Error;

use crate::{
    codec::CodecError,
    image_io::{ContainerError, ImageIoError},
    keys::KeyError,
    transform::TransformError,
};

/// Unified engine error covering key material, tables, transforms and image I/O.
/// - `From<T>` impls enable `?` across layers.
/// - Key and table faults are fatal for a run; image faults are reported per item by the batch
///   runner and only surface here in single-file mode.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("key error: {0}")]
    Key(#[from] KeyError),

    #[error("codec table error: {0}")]
    Codec(#[from] CodecError),

    #[error("transform error: {0}")]
    Transform(#[from] TransformError),

    #[error("image error: {0}")]
    Image(#[from] ImageIoError),

    #[error("container error: {0}")]
    Container(#[from] ContainerError),

    /// Decrypting the written ciphertext did not reproduce the source samples.
    #[error("verification failed for {path}: first difference at sample {index}")]
    VerifyMismatch { path: String, index: usize },

    /// A container was written under different key material than the one rebuilt for it.
    #[error("{path} was encrypted with modulus {stored}, rebuilt keys give {derived}")]
    KeyMismatch { path: String, stored: u64, derived: u64 },

    /// A directory batch in which not a single file decoded.
    #[error("no valid image files found under {0}")]
    NoValidImages(String),

    /// Batch pipeline wiring failure (closed channel, panicked worker).
    #[error("pipeline error: {0}")]
    Pipeline(&'static str),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Config(e.to_string())
    }
}
