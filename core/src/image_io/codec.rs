//! image_io/codec.rs
//!
//! Decode/encode between image files and `PixelBuffer`, backed by the `image` crate.
//! Samples are always 8-bit with the file's native channel count (1–4).

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageFormat, ImageReader};

use crate::image_io::types::{ImageIoError, OutputFormat};
use crate::pixel::{PixelBuffer, Samples};

const JPEG_QUALITY: u8 = 100;

/// Load an image file into a plain `PixelBuffer`.
///
/// Format is sniffed from content, not from the extension.
pub fn decode(path: &Path) -> Result<PixelBuffer, ImageIoError> {
    let load_err = |reason: String| ImageIoError::Load { path: path.to_path_buf(), reason };

    let img = ImageReader::open(path)
        .map_err(|e| load_err(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| load_err(e.to_string()))?
        .decode()
        .map_err(|e| load_err(e.to_string()))?;

    Ok(from_dynamic(img))
}

/// Flatten a decoded image to 8-bit interleaved samples.
pub fn from_dynamic(img: DynamicImage) -> PixelBuffer {
    let (width, height) = (img.width(), img.height());
    let (channels, samples) = match img.color().channel_count() {
        1 => (1, img.into_luma8().into_raw()),
        2 => (2, img.into_luma_alpha8().into_raw()),
        3 => (3, img.into_rgb8().into_raw()),
        _ => (4, img.into_rgba8().into_raw()),
    };
    PixelBuffer::plain(width, height, channels, samples)
}

/// Write `buffer` to `path`, format chosen by extension.
///
/// Ciphertext buffers are written through their lossy low-byte preview.
///
/// Errors:
/// - `UnsupportedFormat` for unknown extensions; no file is created
/// - `InvalidBuffer` when geometry and sample count disagree
/// - `Save` for encoder or filesystem failures
pub fn encode(path: &Path, buffer: &PixelBuffer) -> Result<(), ImageIoError> {
    let format = OutputFormat::from_path(path)
        .ok_or_else(|| ImageIoError::UnsupportedFormat { path: path.to_path_buf() })?;

    if !buffer.is_well_formed() || buffer.is_empty() {
        return Err(ImageIoError::InvalidBuffer {
            path: path.to_path_buf(),
            reason: format!(
                "{}x{}x{} does not match {} samples",
                buffer.width, buffer.height, buffer.channels, buffer.len()
            ),
        });
    }

    let color = color_type(buffer.channels).ok_or_else(|| ImageIoError::InvalidBuffer {
        path: path.to_path_buf(),
        reason: format!("unsupported channel count {}", buffer.channels),
    })?;

    let bytes = match &buffer.samples {
        Samples::Plain(v) => v.clone(),
        Samples::Cipher(_) => buffer.preview_bytes(),
    };

    let save_err = |reason: String| ImageIoError::Save { path: path.to_path_buf(), reason };

    match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel.
            let (bytes, color) = strip_alpha(bytes, buffer.channels, color);
            let file = File::create(path).map_err(|e| save_err(e.to_string()))?;
            let mut writer = BufWriter::new(file);
            let mut encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
            encoder
                .encode(&bytes, buffer.width, buffer.height, color)
                .map_err(|e| save_err(e.to_string()))
        }
        other => {
            let image_format = match other {
                OutputFormat::Png => ImageFormat::Png,
                OutputFormat::Bmp => ImageFormat::Bmp,
                OutputFormat::Tga => ImageFormat::Tga,
                OutputFormat::Jpeg => ImageFormat::Jpeg,
            };
            image::save_buffer_with_format(
                path,
                &bytes,
                buffer.width,
                buffer.height,
                color,
                image_format,
            )
            .map_err(|e| save_err(e.to_string()))
        }
    }
}

fn color_type(channels: u8) -> Option<ExtendedColorType> {
    match channels {
        1 => Some(ExtendedColorType::L8),
        2 => Some(ExtendedColorType::La8),
        3 => Some(ExtendedColorType::Rgb8),
        4 => Some(ExtendedColorType::Rgba8),
        _ => None,
    }
}

fn strip_alpha(bytes: Vec<u8>, channels: u8, color: ExtendedColorType) -> (Vec<u8>, ExtendedColorType) {
    match channels {
        2 => (bytes.chunks_exact(2).map(|px| px[0]).collect(), ExtendedColorType::L8),
        4 => (
            bytes.chunks_exact(4).flat_map(|px| [px[0], px[1], px[2]]).collect(),
            ExtendedColorType::Rgb8,
        ),
        _ => (bytes, color),
    }
}
