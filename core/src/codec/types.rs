use std::fmt;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which half of the codec table a transform reads.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TryFromPrimitive)]
pub enum Direction {
    Encrypt = 0x01,
    Decrypt = 0x02,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Encrypt => "encrypt",
            Direction::Decrypt => "decrypt",
        })
    }
}

/// Ciphertext sample. Moduli are capped at `u32::MAX`, so every ciphertext fits.
pub type CipherSample = u32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Two byte values mapped to the same ciphertext.
    #[error("ciphertext collision: bytes {a} and {b} both encrypt to {value}")]
    Collision { a: u8, b: u8, value: CipherSample },

    /// `decrypt(encrypt(v)) != v` for some byte.
    #[error("round-trip failed for byte {byte}: got {got}")]
    RoundTrip { byte: u8, got: u64 },

    /// Modulus too small for the byte domain, or too large for the sample width.
    #[error("modulus {n} outside supported range")]
    Modulus { n: u64 },
}
