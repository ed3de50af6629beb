use std::fmt;
use num_enum::TryFromPrimitive;

/// Render a raw registry id as its enum variant name, or as hex if unknown.
pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

/// CRC32 over a byte slice.
pub fn compute_crc32(data: &[u8]) -> u32 {
    use crc32fast::Hasher;
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Split `len` items into at most `workers` contiguous chunks, never smaller than `min_chunk`
/// (except the last one).
pub fn chunk_len(len: usize, workers: usize, min_chunk: usize) -> usize {
    if len == 0 {
        return 1;
    }
    let workers = workers.max(1);
    let even = (len + workers - 1) / workers;
    even.max(min_chunk).min(len)
}

/// Pack bytes little-endian into `u32` words, zero-padding the tail.
pub fn pack_bytes_le(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks(4)
        .map(|c| {
            let mut word = [0u8; 4];
            word[..c.len()].copy_from_slice(c);
            u32::from_le_bytes(word)
        })
        .collect()
}
