use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::{CipherSample, CodecTable, Direction};

/// How a transform is executed. The output never depends on the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Strategy {
    Sequential,
    /// Dedicated pool with exactly this many threads. Zero is rejected.
    Threaded(usize),
    /// wgpu compute; falls back to the threaded backend when no adapter is present.
    Accelerator,
    /// Per-buffer choice between threaded and accelerator, by size and load.
    #[default]
    Auto,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Sequential => f.write_str("sequential"),
            Strategy::Threaded(n) => write!(f, "threaded:{n}"),
            Strategy::Accelerator => f.write_str("accelerator"),
            Strategy::Auto => f.write_str("auto"),
        }
    }
}

/// Accepts `sequential`, `threaded`, `threaded:N`, `accelerator` (or `gpu`) and `auto`.
/// Bare `threaded` resolves to the host's logical CPU count.
impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "sequential" | "seq" => Ok(Strategy::Sequential),
            "threaded" => Ok(Strategy::Threaded(num_cpus::get())),
            "accelerator" | "gpu" => Ok(Strategy::Accelerator),
            "auto" => Ok(Strategy::Auto),
            other => match other.strip_prefix("threaded:") {
                Some(n) => n
                    .parse::<usize>()
                    .map(Strategy::Threaded)
                    .map_err(|e| format!("invalid thread count {n:?}: {e}")),
                None => Err(format!("unknown strategy {s:?}")),
            },
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Plain samples handed to a decrypt, or ciphertext handed to an encrypt.
    #[error("cannot {direction} a buffer of {samples} samples")]
    DirectionMismatch { direction: Direction, samples: &'static str },

    /// Ciphertext value that no byte encrypts to under this table.
    #[error("unknown ciphertext {value} at sample {index}")]
    UnknownCiphertext { index: usize, value: CipherSample },

    #[error("worker count must be at least 1")]
    InvalidWorkerCount,

    #[error("input has {input} samples but output has {output}")]
    LengthMismatch { input: usize, output: usize },

    #[error("accelerator unavailable: {0}")]
    AcceleratorUnavailable(String),

    #[error("accelerator error: {0}")]
    Gpu(String),

    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

/// An execution backend. Implementations write `out[i]` from `input[i]` only, so any split of the
/// index range produces the same result.
pub trait TransformBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn encrypt(
        &self,
        table: &CodecTable,
        input: &[u8],
        out: &mut [CipherSample],
    ) -> Result<(), TransformError>;

    /// Fails with `UnknownCiphertext` carrying the lowest offending index.
    fn decrypt(
        &self,
        table: &CodecTable,
        input: &[CipherSample],
        out: &mut [u8],
    ) -> Result<(), TransformError>;
}

pub(crate) fn check_lengths(input: usize, output: usize) -> Result<(), TransformError> {
    if input != output {
        return Err(TransformError::LengthMismatch { input, output });
    }
    Ok(())
}
