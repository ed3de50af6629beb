//! image_io/container.rs
//!
//! Lossless ciphertext container (`.rsai`).
//!
//! Layout (little-endian):
//! - 0..4   magic "RSAI"
//! - 4..6   version
//! - 6..8   sample width tag
//! - 8..12  width
//! - 12..16 height
//! - 16     channels
//! - 17..20 reserved (zero)
//! - 20..28 modulus
//! - 28..32 CRC32 over bytes 0..28
//! - body:  width·height·channels u32 samples, then CRC32 over the sample bytes

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::constants::{CONTAINER_V1, MAGIC_RSAI};
use crate::image_io::types::{ContainerError, SampleWidth};
use crate::pixel::{PixelBuffer, Samples};
use crate::utils::compute_crc32;

/// Fixed header length in bytes.
pub const CONTAINER_HEADER_LEN: usize = 32;

/// Decoded container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub version: u16,
    pub sample_width: SampleWidth,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub modulus: u64,
}

impl ContainerHeader {
    /// `width·height·channels`, or `None` when it overflows `usize`.
    pub fn sample_count(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.channels as usize)
    }

    fn encode(&self) -> [u8; CONTAINER_HEADER_LEN] {
        let mut out = [0u8; CONTAINER_HEADER_LEN];
        let mut i = 0usize;

        fn put(out: &mut [u8], i: &mut usize, b: &[u8]) {
            out[*i..*i + b.len()].copy_from_slice(b);
            *i += b.len();
        }

        put(&mut out, &mut i, &MAGIC_RSAI);                              // 0..4
        put(&mut out, &mut i, &self.version.to_le_bytes());              // 4..6
        put(&mut out, &mut i, &(self.sample_width as u16).to_le_bytes()); // 6..8
        put(&mut out, &mut i, &self.width.to_le_bytes());                // 8..12
        put(&mut out, &mut i, &self.height.to_le_bytes());               // 12..16
        put(&mut out, &mut i, &[self.channels, 0, 0, 0]);                // 16..20
        put(&mut out, &mut i, &self.modulus.to_le_bytes());              // 20..28

        let crc = compute_crc32(&out[..28]);
        put(&mut out, &mut i, &crc.to_le_bytes());                       // 28..32

        debug_assert_eq!(i, CONTAINER_HEADER_LEN);
        out
    }

    fn decode(buf: &[u8]) -> Result<Self, ContainerError> {
        if buf.len() < CONTAINER_HEADER_LEN {
            return Err(ContainerError::Truncated { have: buf.len(), need: CONTAINER_HEADER_LEN });
        }
        let mut cur = Cursor::new(&buf[..CONTAINER_HEADER_LEN]);

        let mut magic = [0u8; 4];
        cur.read_exact(&mut magic)?;
        if magic != MAGIC_RSAI {
            return Err(ContainerError::BadMagic(magic));
        }

        let version = cur.read_u16::<LittleEndian>()?;
        let raw_width_tag = cur.read_u16::<LittleEndian>()?;
        let width = cur.read_u32::<LittleEndian>()?;
        let height = cur.read_u32::<LittleEndian>()?;
        let channels = cur.read_u8()?;
        let mut reserved = [0u8; 3];
        cur.read_exact(&mut reserved)?;
        let modulus = cur.read_u64::<LittleEndian>()?;
        let stored = cur.read_u32::<LittleEndian>()?;

        let computed = compute_crc32(&buf[..28]);
        if stored != computed {
            return Err(ContainerError::HeaderCrc { stored, computed });
        }
        if version != CONTAINER_V1 {
            return Err(ContainerError::UnsupportedVersion(version));
        }
        let sample_width = SampleWidth::try_from(raw_width_tag)
            .map_err(|_| ContainerError::UnsupportedSampleWidth(raw_width_tag))?;
        if reserved != [0; 3] {
            return Err(ContainerError::Invalid("reserved bytes must be zero".into()));
        }
        if !(1..=4).contains(&channels) {
            return Err(ContainerError::Invalid(format!("channel count {channels}")));
        }

        Ok(Self { version, sample_width, width, height, channels, modulus })
    }
}

/// Serialize a ciphertext buffer.
///
/// Errors:
/// - `Invalid` if the buffer holds plain samples or its geometry is inconsistent
pub fn encode_container(buffer: &PixelBuffer, modulus: u64) -> Result<Vec<u8>, ContainerError> {
    let Samples::Cipher(samples) = &buffer.samples else {
        return Err(ContainerError::Invalid("only ciphertext buffers are stored in a container".into()));
    };
    if !buffer.is_well_formed() {
        return Err(ContainerError::Invalid(format!(
            "{}x{}x{} does not match {} samples",
            buffer.width, buffer.height, buffer.channels, samples.len()
        )));
    }

    let header = ContainerHeader {
        version: CONTAINER_V1,
        sample_width: SampleWidth::U32,
        width: buffer.width,
        height: buffer.height,
        channels: buffer.channels,
        modulus,
    };

    let mut out = Vec::with_capacity(CONTAINER_HEADER_LEN + samples.len() * 4 + 4);
    out.extend_from_slice(&header.encode());
    for s in samples {
        out.write_u32::<LittleEndian>(*s)?;
    }
    let body_crc = compute_crc32(&out[CONTAINER_HEADER_LEN..]);
    out.write_u32::<LittleEndian>(body_crc)?;
    Ok(out)
}

/// Parse and validate a container.
pub fn decode_container(buf: &[u8]) -> Result<(ContainerHeader, PixelBuffer), ContainerError> {
    let header = ContainerHeader::decode(buf)?;

    let oversized = || {
        ContainerError::Invalid(format!(
            "{}x{}x{} samples do not fit in memory",
            header.width, header.height, header.channels
        ))
    };
    let count = header.sample_count().ok_or_else(oversized)?;
    let body_len = count.checked_mul(4).ok_or_else(oversized)?;
    let need = body_len
        .checked_add(CONTAINER_HEADER_LEN + 4)
        .ok_or_else(oversized)?;
    if buf.len() < need {
        return Err(ContainerError::Truncated { have: buf.len(), need });
    }
    if buf.len() > need {
        return Err(ContainerError::Invalid(format!("{} trailing bytes", buf.len() - need)));
    }

    let body = &buf[CONTAINER_HEADER_LEN..CONTAINER_HEADER_LEN + body_len];
    let stored = (&buf[CONTAINER_HEADER_LEN + body_len..]).read_u32::<LittleEndian>()?;
    let computed = compute_crc32(body);
    if stored != computed {
        return Err(ContainerError::BodyCrc { stored, computed });
    }

    let mut samples = vec![0u32; count];
    Cursor::new(body).read_u32_into::<LittleEndian>(&mut samples)?;

    let buffer = PixelBuffer::cipher(header.width, header.height, header.channels, samples);
    Ok((header, buffer))
}

pub fn write_container(path: &Path, buffer: &PixelBuffer, modulus: u64) -> Result<(), ContainerError> {
    let bytes = encode_container(buffer, modulus)?;
    fs::write(path, bytes)?;
    Ok(())
}

pub fn read_container(path: &Path) -> Result<(ContainerHeader, PixelBuffer), ContainerError> {
    let bytes = fs::read(path)?;
    decode_container(&bytes)
}
