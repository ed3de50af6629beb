//! pixel.rs
//! The one pixel buffer type shared by the codec adapter, the transform engine and the batch
//! runner. Storage is an owned `Vec`; dropping the buffer releases it on every path.

use crate::codec::{CipherSample, Direction};

/// Sample storage: plain 8-bit image data or widened ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Samples {
    Plain(Vec<u8>),
    Cipher(Vec<CipherSample>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::Plain(v) => v.len(),
            Samples::Cipher(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The direction that consumes this kind of sample.
    pub fn input_direction(&self) -> Direction {
        match self {
            Samples::Plain(_) => Direction::Encrypt,
            Samples::Cipher(_) => Direction::Decrypt,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Samples::Plain(_) => "plain",
            Samples::Cipher(_) => "cipher",
        }
    }
}

/// Interleaved pixel samples with their geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub samples: Samples,
}

impl PixelBuffer {
    pub fn plain(width: u32, height: u32, channels: u8, samples: Vec<u8>) -> Self {
        Self { width, height, channels, samples: Samples::Plain(samples) }
    }

    pub fn cipher(width: u32, height: u32, channels: u8, samples: Vec<CipherSample>) -> Self {
        Self { width, height, channels, samples: Samples::Cipher(samples) }
    }

    /// `width · height · channels`
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Geometry agrees with the sample count.
    pub fn is_well_formed(&self) -> bool {
        self.expected_len() == self.len()
    }

    /// Sample bytes for the image encoder: plain bytes as-is, ciphertext reduced to its low byte.
    /// The ciphertext view is lossy and only good for a preview.
    pub fn preview_bytes(&self) -> Vec<u8> {
        match &self.samples {
            Samples::Plain(v) => v.clone(),
            Samples::Cipher(v) => v.iter().map(|c| (*c & 0xFF) as u8).collect(),
        }
    }

    pub fn with_samples(&self, samples: Samples) -> Self {
        Self { width: self.width, height: self.height, channels: self.channels, samples }
    }
}
