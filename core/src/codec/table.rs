use log::debug;

use crate::codec::types::{CipherSample, CodecError};
use crate::constants::{BYTE_DOMAIN, MIN_MODULUS};
use crate::keys::{modexp, KeyPair};

/// Precomputed encrypt/decrypt lookups for one key pair.
///
/// Immutable after `build_table`; share it across threads behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecTable {
    modulus: u64,
    encrypt: [CipherSample; BYTE_DOMAIN],
    /// `(ciphertext, byte)` sorted by ciphertext.
    decrypt: Vec<(CipherSample, u8)>,
}

impl CodecTable {
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    #[inline]
    pub fn encrypt_sample(&self, v: u8) -> CipherSample {
        self.encrypt[v as usize]
    }

    /// Inverse lookup; `None` for a value no byte encrypts to.
    #[inline]
    pub fn decrypt_sample(&self, c: CipherSample) -> Option<u8> {
        self.decrypt
            .binary_search_by_key(&c, |(k, _)| *k)
            .ok()
            .map(|i| self.decrypt[i].1)
    }

    pub fn encrypt_entries(&self) -> &[CipherSample; BYTE_DOMAIN] {
        &self.encrypt
    }

    pub fn decrypt_entries(&self) -> &[(CipherSample, u8)] {
        &self.decrypt
    }

    /// Split decrypt entries into parallel key/value columns (accelerator upload layout).
    pub fn decrypt_columns(&self) -> (Vec<u32>, Vec<u32>) {
        self.decrypt.iter().map(|(c, v)| (*c, *v as u32)).unzip()
    }
}

/// Build the codec table for `keys`.
///
/// - `encrypt[v] = v^e mod n`
/// - `decrypt[c] = (c^d mod n) as u8`, keyed by every produced `c`
///
/// Errors:
/// - `CodecError::Modulus` if `n` is not in `(255, u32::MAX]`
/// - `CodecError::Collision` / `CodecError::RoundTrip` if the permutation is broken
pub fn build_table(keys: &KeyPair) -> Result<CodecTable, CodecError> {
    let n = keys.n();
    if n < MIN_MODULUS || n > u32::MAX as u64 {
        return Err(CodecError::Modulus { n });
    }

    let mut encrypt = [0 as CipherSample; BYTE_DOMAIN];
    for (v, slot) in encrypt.iter_mut().enumerate() {
        *slot = modexp(v as u64, keys.e(), n) as CipherSample;
    }

    let mut decrypt = Vec::with_capacity(BYTE_DOMAIN);
    for (v, &c) in encrypt.iter().enumerate() {
        let plain = modexp(c as u64, keys.d(), n);
        if plain != v as u64 {
            return Err(CodecError::RoundTrip { byte: v as u8, got: plain });
        }
        decrypt.push((c, plain as u8));
    }

    decrypt.sort_unstable_by_key(|(c, _)| *c);
    if let Some(w) = decrypt.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(CodecError::Collision { a: w[0].1, b: w[1].1, value: w[0].0 });
    }

    debug!("[TABLE] built codec table for n={} ({} entries)", n, decrypt.len());
    Ok(CodecTable { modulus: n, encrypt, decrypt })
}
