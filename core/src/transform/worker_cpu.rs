use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::codec::{CipherSample, CodecTable};
use crate::constants::MIN_THREAD_CHUNK;
use crate::transform::types::{check_lengths, TransformBackend, TransformError};
use crate::utils::chunk_len;

pub(crate) fn encrypt_slice(table: &CodecTable, input: &[u8], out: &mut [CipherSample]) {
    for (o, &v) in out.iter_mut().zip(input) {
        *o = table.encrypt_sample(v);
    }
}

/// `base` is the offset of `input[0]` in the whole buffer, for error reporting.
pub(crate) fn decrypt_slice(
    table: &CodecTable,
    input: &[CipherSample],
    out: &mut [u8],
    base: usize,
) -> Result<(), TransformError> {
    for (i, (o, &c)) in out.iter_mut().zip(input).enumerate() {
        *o = table
            .decrypt_sample(c)
            .ok_or(TransformError::UnknownCiphertext { index: base + i, value: c })?;
    }
    Ok(())
}

/// Lowest index whose ciphertext is not in the table.
pub(crate) fn first_unknown(table: &CodecTable, input: &[CipherSample]) -> Option<TransformError> {
    input
        .iter()
        .position(|&c| table.decrypt_sample(c).is_none())
        .map(|index| TransformError::UnknownCiphertext { index, value: input[index] })
}

/// Single-threaded reference backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialBackend;

impl TransformBackend for SequentialBackend {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn encrypt(&self, table: &CodecTable, input: &[u8], out: &mut [CipherSample]) -> Result<(), TransformError> {
        check_lengths(input.len(), out.len())?;
        encrypt_slice(table, input, out);
        Ok(())
    }

    fn decrypt(&self, table: &CodecTable, input: &[CipherSample], out: &mut [u8]) -> Result<(), TransformError> {
        check_lengths(input.len(), out.len())?;
        decrypt_slice(table, input, out, 0)
    }
}

/// Contiguous chunks over a dedicated rayon pool. Each task owns a disjoint output slice; the
/// table is only read.
pub struct ThreadedBackend {
    pool: ThreadPool,
    threads: usize,
}

impl ThreadedBackend {
    pub fn new(threads: usize) -> Result<Self, TransformError> {
        if threads == 0 {
            return Err(TransformError::InvalidWorkerCount);
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("pixel-rsa-{i}"))
            .build()
            .map_err(|e| TransformError::ThreadPool(e.to_string()))?;
        Ok(Self { pool, threads })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    fn chunk(&self, len: usize) -> usize {
        chunk_len(len, self.threads, MIN_THREAD_CHUNK)
    }
}

impl TransformBackend for ThreadedBackend {
    fn name(&self) -> &'static str {
        "threaded"
    }

    fn encrypt(&self, table: &CodecTable, input: &[u8], out: &mut [CipherSample]) -> Result<(), TransformError> {
        check_lengths(input.len(), out.len())?;
        let chunk = self.chunk(input.len());
        self.pool.install(|| {
            out.par_chunks_mut(chunk)
                .zip(input.par_chunks(chunk))
                .for_each(|(o, i)| encrypt_slice(table, i, o));
        });
        Ok(())
    }

    fn decrypt(&self, table: &CodecTable, input: &[CipherSample], out: &mut [u8]) -> Result<(), TransformError> {
        check_lengths(input.len(), out.len())?;
        let chunk = self.chunk(input.len());
        let result = self.pool.install(|| {
            out.par_chunks_mut(chunk)
                .zip(input.par_chunks(chunk))
                .enumerate()
                .try_for_each(|(k, (o, i))| decrypt_slice(table, i, o, k * chunk))
        });
        // Chunks fail in any order; report the lowest index like the sequential backend.
        result.map_err(|e| first_unknown(table, input).unwrap_or(e))
    }
}
