#[cfg(test)]
mod keys_tests {
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use pixel_rsa_core::keys::{derive_keys, gcd, generate_primes, modexp, KeyError, KeyPair};

    #[test]
    fn textbook_primes_use_smallest_exponent() {
        let k = KeyPair::from_primes(61, 53).unwrap();
        assert_eq!(k.n(), 3233);
        assert_eq!(k.phi(), 3120);
        assert_eq!(k.e(), 7);
        assert_eq!(k.d(), 1783);
        assert!(k.is_consistent());
    }

    #[test]
    fn textbook_exponent_17() {
        let k = KeyPair::with_public_exponent(61, 53, 17).unwrap();
        assert_eq!(k.d(), 2753);
        let c = modexp(65, k.e(), k.n());
        assert_eq!(c, 2790);
        assert_eq!(modexp(c, k.d(), k.n()), 65);
    }

    #[test]
    fn rejects_bad_prime_pairs() {
        assert!(matches!(KeyPair::from_primes(61, 61), Err(KeyError::InvalidPrimes { .. })));
        assert!(matches!(KeyPair::from_primes(4, 61), Err(KeyError::InvalidPrimes { .. })));
        // 13 * 17 = 221 cannot hold every byte value.
        assert!(matches!(KeyPair::from_primes(13, 17), Err(KeyError::InvalidPrimes { .. })));
        // 65_537 * 65_539 overflows u32.
        assert!(matches!(KeyPair::from_primes(65_537, 65_539), Err(KeyError::InvalidPrimes { .. })));
        assert!(matches!(
            KeyPair::with_public_exponent(61, 53, 15),
            Err(KeyError::KeyDerivation(_))
        ));
    }

    #[test]
    fn debug_output_hides_private_exponent() {
        let k = KeyPair::from_primes(61, 53).unwrap();
        let shown = format!("{k:?}");
        assert!(shown.contains("3233"));
        assert!(!shown.contains("1783"));
    }

    #[test]
    fn too_few_primes() {
        let mut rng = StdRng::seed_from_u64(1);
        let one = generate_primes(3).unwrap();
        assert_eq!(derive_keys(one, &mut rng).unwrap_err(), KeyError::InsufficientPrimes { available: 1 });

        let none = generate_primes(2).unwrap();
        assert_eq!(derive_keys(none, &mut rng).unwrap_err(), KeyError::InsufficientPrimes { available: 0 });
    }

    #[test]
    fn pool_without_a_large_enough_pair() {
        // Largest product below 14 is 11 * 13 = 143.
        let pool = generate_primes(14).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(derive_keys(pool, &mut rng), Err(KeyError::InsufficientPrimes { .. })));
    }

    #[test]
    fn seeded_derivation_is_reproducible() {
        let a = derive_keys(generate_primes(250).unwrap(), &mut StdRng::seed_from_u64(42)).unwrap();
        let b = derive_keys(generate_primes(250).unwrap(), &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.0, b.0);
        assert_eq!(a.1, b.1);
    }

    #[test]
    fn remainder_pool_shrinks() {
        let pool = generate_primes(250).unwrap();
        let (_, rest) = derive_keys(pool, &mut StdRng::seed_from_u64(5)).unwrap();
        // Only p and q leave the pool; rejected candidates are put back.
        assert_eq!(rest.len(), 51);
        assert!(rest.as_slice().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn small_pool_always_finds_a_pair() {
        // 31 primes below 130; small p values have few partners above 255.
        for seed in 0..200u64 {
            let pool = generate_primes(130).unwrap();
            let (k, rest) = derive_keys(pool, &mut StdRng::seed_from_u64(seed))
                .unwrap_or_else(|e| panic!("seed {seed}: {e}"));
            assert!(k.n() > 255, "seed {seed}");
            assert_eq!(rest.len(), 29, "seed {seed}");
        }
    }

    #[test]
    fn failed_derivation_returns_the_whole_pool() {
        let pool = generate_primes(14).unwrap();
        let err = derive_keys(pool, &mut StdRng::seed_from_u64(9)).unwrap_err();
        assert_eq!(err, KeyError::InsufficientPrimes { available: 6 });
    }

    #[test]
    fn oversized_primes_are_rejected_before_primality() {
        let big = 18_446_744_073_709_551_557; // largest u64 prime
        assert!(matches!(KeyPair::from_primes(big, 3), Err(KeyError::InvalidPrimes { .. })));
        assert!(matches!(KeyPair::from_primes(4_294_967_291, 65_521), Err(KeyError::InvalidPrimes { .. })));
    }

    proptest! {
        #[test]
        fn derived_keys_hold_invariants(seed in any::<u64>(), bound in 250usize..2000) {
            let pool = generate_primes(bound).unwrap();
            let (k, _) = derive_keys(pool, &mut StdRng::seed_from_u64(seed)).unwrap();

            prop_assert!(k.n() > 255);
            prop_assert_eq!(gcd(k.e(), k.phi()), 1);
            prop_assert_eq!((k.d() as u128 * k.e() as u128) % k.phi() as u128, 1);
            prop_assert!((2..k.e()).all(|x| gcd(x, k.phi()) != 1), "e is not the smallest unit");
        }
    }
}
