//! keys/derive.rs
//! Key derivation from a prime pool.
//!
//! Design:
//! - Draw p, then q, uniformly without replacement
//! - Keep drawing q while p·q ≤ 255 (the byte domain must embed into Z_n)
//! - A p with no partner left is set aside and another p is drawn; rejected
//!   candidates go back into the pool
//! - Smallest e coprime to phi, d by extended Euclid

use log::debug;
use rand::Rng;

use crate::constants::MIN_MODULUS;
use crate::keys::primes::PrimeSet;
use crate::keys::types::{KeyError, KeyPair};

/// Draw two distinct primes from `pool` and derive a key pair.
///
/// Returns the key pair together with what is left of the pool.
///
/// Errors:
/// - `KeyError::InsufficientPrimes` if the pool cannot yield a pair with `n > 255`
/// - `KeyError::KeyDerivation` on an internal-consistency fault
pub fn derive_keys<R: Rng + ?Sized>(
    mut pool: PrimeSet,
    rng: &mut R,
) -> Result<(KeyPair, PrimeSet), KeyError> {
    if pool.len() < 2 {
        return Err(KeyError::InsufficientPrimes { available: pool.len() });
    }

    // Primes already tried as p without finding a partner.
    let mut spent = Vec::new();

    let (p, q) = loop {
        let Some(p) = pool.draw(rng) else {
            pool.restore(spent);
            return Err(KeyError::InsufficientPrimes { available: pool.len() });
        };

        let mut rejected = Vec::new();
        let partner = loop {
            match pool.draw(rng) {
                Some(c) if p * c >= MIN_MODULUS => break Some(c),
                Some(c) => {
                    debug!("[KEYGEN] discarding q={} (p·q={} too small)", c, p * c);
                    rejected.push(c);
                }
                None => break None,
            }
        };
        pool.restore(rejected);

        match partner {
            Some(q) => break (p, q),
            None => {
                debug!("[KEYGEN] p={} has no partner with p·q > 255, redrawing p", p);
                spent.push(p);
            }
        }
    };
    pool.restore(spent);

    debug!("[KEYGEN] drew p={} q={} ({} primes left)", p, q, pool.len());

    let keys = KeyPair::from_primes(p, q)?;
    if !keys.is_consistent() {
        return Err(KeyError::KeyDerivation(format!("inconsistent key material: {keys:?}")));
    }

    debug!("[KEYGEN] n={} phi={} e={}", keys.n(), keys.phi(), keys.e());
    Ok((keys, pool))
}
