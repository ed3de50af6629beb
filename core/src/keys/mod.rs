//! keys/mod.rs
//! Prime generation and textbook RSA key derivation.
//!
//! Responsibilities:
//! - Sieve the prime pool for a bound
//! - Draw two primes without replacement and derive `{e, d, n, phi}`
//!
//! Non-responsibilities:
//! - Table construction
//! - Persistence (keys live for one run only)

pub mod types;
pub mod math;
pub mod primes;
pub mod derive;

pub use types::*;
pub use math::*;
pub use primes::*;
pub use derive::*;
