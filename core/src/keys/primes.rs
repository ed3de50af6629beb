//! keys/primes.rs
//! Sieve of Eratosthenes and the draw-without-replacement prime pool.

use rand::Rng;

use crate::constants::MAX_PRIME_BOUND;
use crate::keys::types::KeyError;

/// Ordered set of every prime below `bound`.
///
/// Owned by a single run; key derivation takes it by value, draws from it and hands back the
/// remainder, so no two draws can ever see the same prime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeSet {
    bound: usize,
    primes: Vec<u64>,
}

impl PrimeSet {
    pub fn bound(&self) -> usize {
        self.bound
    }

    pub fn len(&self) -> usize {
        self.primes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.primes
    }

    pub fn contains(&self, p: u64) -> bool {
        self.primes.binary_search(&p).is_ok()
    }

    /// Remove and return one prime chosen uniformly from what remains.
    /// Ascending order of the remainder is preserved.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<u64> {
        if self.primes.is_empty() {
            return None;
        }
        let k = rng.gen_range(0..self.primes.len());
        Some(self.primes.remove(k))
    }

    /// Put drawn primes back, keeping the pool ascending.
    pub(crate) fn restore(&mut self, primes: Vec<u64>) {
        if primes.is_empty() {
            return;
        }
        self.primes.extend(primes);
        self.primes.sort_unstable();
    }
}

/// Sieve every prime in `[0, bound)`.
///
/// Errors:
/// - `KeyError::InvalidBound` when `bound < 2` or `bound > MAX_PRIME_BOUND`.
pub fn generate_primes(bound: usize) -> Result<PrimeSet, KeyError> {
    if !(2..=MAX_PRIME_BOUND).contains(&bound) {
        return Err(KeyError::InvalidBound { bound });
    }

    let mut sieve = vec![true; bound];
    sieve[0] = false;
    sieve[1] = false;

    let mut i = 2usize;
    while i * i < bound {
        if sieve[i] {
            // Multiples below i*i were already struck by smaller primes.
            for j in (i * i..bound).step_by(i) {
                sieve[j] = false;
            }
        }
        i += 1;
    }

    let primes = sieve
        .iter()
        .enumerate()
        .filter_map(|(v, is_p)| is_p.then_some(v as u64))
        .collect();

    Ok(PrimeSet { bound, primes })
}
