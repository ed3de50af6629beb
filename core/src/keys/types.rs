use std::fmt;
use thiserror::Error;

use crate::constants::{MAX_PRIME_BOUND, MIN_MODULUS};
use crate::keys::math::{gcd, is_prime, mod_inverse};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// Sieve bound outside `[2, MAX_PRIME_BOUND]`.
    #[error("invalid prime bound {bound}: must be within 2..={max}", max = MAX_PRIME_BOUND)]
    InvalidBound { bound: usize },

    /// Pool ran dry before a usable pair was drawn.
    #[error("insufficient primes: {available} left in pool, need two whose product exceeds {min}", min = MIN_MODULUS - 1)]
    InsufficientPrimes { available: usize },

    /// Explicit primes rejected by validation.
    #[error("invalid prime pair ({p}, {q}): {reason}")]
    InvalidPrimes { p: u64, q: u64, reason: &'static str },

    /// Exponent search or inverse failed. Unreachable while `gcd(e, phi) = 1` holds.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
}

/// Textbook RSA key material for one run.
///
/// Invariants (checked on construction):
/// - `n = p·q` for distinct primes, `255 < n ≤ u32::MAX`
/// - `gcd(e, phi) = 1` and `(d·e) mod phi = 1`
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KeyPair {
    e: u64,
    d: u64,
    n: u64,
    phi: u64,
}

impl KeyPair {
    /// Build keys from two explicit primes using the smallest valid public exponent.
    pub fn from_primes(p: u64, q: u64) -> Result<Self, KeyError> {
        let (n, phi) = modulus_and_totient(p, q)?;
        let e = smallest_public_exponent(phi)?;
        Self::assemble(e, n, phi)
    }

    /// Build keys from two explicit primes and a caller-chosen public exponent.
    pub fn with_public_exponent(p: u64, q: u64, e: u64) -> Result<Self, KeyError> {
        let (n, phi) = modulus_and_totient(p, q)?;
        if e < 2 || e >= phi || gcd(e, phi) != 1 {
            return Err(KeyError::KeyDerivation(format!(
                "public exponent {e} is not a unit modulo phi={phi}"
            )));
        }
        Self::assemble(e, n, phi)
    }

    fn assemble(e: u64, n: u64, phi: u64) -> Result<Self, KeyError> {
        let d = mod_inverse(e, phi).ok_or_else(|| {
            KeyError::KeyDerivation(format!("no inverse for e={e} modulo phi={phi}"))
        })?;
        Ok(Self { e, d, n, phi })
    }

    pub fn e(&self) -> u64 { self.e }
    pub fn d(&self) -> u64 { self.d }
    pub fn n(&self) -> u64 { self.n }
    pub fn phi(&self) -> u64 { self.phi }

    /// Re-check the arithmetic invariants.
    pub fn is_consistent(&self) -> bool {
        self.n > MIN_MODULUS - 1
            && self.n <= u32::MAX as u64
            && gcd(self.e, self.phi) == 1
            && (self.d as u128 * self.e as u128) % self.phi as u128 == 1
    }
}

// The private exponent stays out of logs.
impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("e", &self.e)
            .field("n", &self.n)
            .field("phi", &self.phi)
            .finish_non_exhaustive()
    }
}

fn modulus_and_totient(p: u64, q: u64) -> Result<(u64, u64), KeyError> {
    if p == q {
        return Err(KeyError::InvalidPrimes { p, q, reason: "primes must be distinct" });
    }
    let n = p
        .checked_mul(q)
        .filter(|n| *n <= u32::MAX as u64)
        .ok_or(KeyError::InvalidPrimes { p, q, reason: "modulus does not fit in u32" })?;
    if n < MIN_MODULUS {
        return Err(KeyError::InvalidPrimes { p, q, reason: "modulus must exceed 255" });
    }
    if !is_prime(p) || !is_prime(q) {
        return Err(KeyError::InvalidPrimes { p, q, reason: "both values must be prime" });
    }
    Ok((n, (p - 1) * (q - 1)))
}

/// Smallest `e ≥ 2` coprime to `phi`. The search is bounded by `phi` itself.
fn smallest_public_exponent(phi: u64) -> Result<u64, KeyError> {
    (2..phi)
        .find(|e| gcd(*e, phi) == 1)
        .ok_or_else(|| KeyError::KeyDerivation(format!("no public exponent below phi={phi}")))
}
