use std::fmt;
use std::path::{Path, PathBuf};
use num_enum::TryFromPrimitive;
use thiserror::Error;

use crate::utils::enum_name_or_hex;

/// Output formats the encoder knows, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Bmp,
    Tga,
    Jpeg,
}

impl OutputFormat {
    /// Case-insensitive extension lookup; `None` means "unsupported, write nothing".
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(OutputFormat::Png),
            "bmp" => Some(OutputFormat::Bmp),
            "tga" => Some(OutputFormat::Tga),
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Png => "png",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tga => "tga",
            OutputFormat::Jpeg => "jpg",
        })
    }
}

#[derive(Debug, Error)]
pub enum ImageIoError {
    /// File missing, unreadable or not a decodable image.
    #[error("failed to load {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// Extension has no encoder. Nothing was written.
    #[error("unsupported output format for {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Encoder or filesystem failure while writing.
    #[error("failed to save {path}: {reason}")]
    Save { path: PathBuf, reason: String },

    /// Buffer cannot be encoded as an image (wrong sample kind or geometry).
    #[error("invalid buffer for {path}: {reason}")]
    InvalidBuffer { path: PathBuf, reason: String },
}

impl ImageIoError {
    pub fn is_load(&self) -> bool {
        matches!(self, ImageIoError::Load { .. })
    }
}

/// Sample width tag stored in the container header.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum SampleWidth {
    U32 = 0x0004,
}

fn sample_width_name(raw: &u16) -> String {
    enum_name_or_hex::<SampleWidth>(*raw)
}

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad magic: expected RSAI, got {0:?}")]
    BadMagic([u8; 4]),

    #[error("unsupported container version {0}")]
    UnsupportedVersion(u16),

    #[error("unsupported sample width: {}", sample_width_name(.0))]
    UnsupportedSampleWidth(u16),

    #[error("header CRC mismatch: stored={stored:#010x} computed={computed:#010x}")]
    HeaderCrc { stored: u32, computed: u32 },

    #[error("body CRC mismatch: stored={stored:#010x} computed={computed:#010x}")]
    BodyCrc { stored: u32, computed: u32 },

    #[error("buffer too short: have={have}, need={need}")]
    Truncated { have: usize, need: usize },

    #[error("invalid container: {0}")]
    Invalid(String),
}
