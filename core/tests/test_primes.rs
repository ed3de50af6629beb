#[cfg(test)]
mod primes_tests {
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use pixel_rsa_core::constants::{DEFAULT_PRIME_BOUND, MAX_PRIME_BOUND};
    use pixel_rsa_core::keys::{generate_primes, is_prime, KeyError};

    fn trial_division(bound: usize) -> Vec<u64> {
        (0..bound as u64).filter(|v| is_prime(*v)).collect()
    }

    #[test]
    fn default_bound_yields_53_primes() {
        let set = generate_primes(DEFAULT_PRIME_BOUND).unwrap();
        assert_eq!(set.len(), 53);
        assert_eq!(&set.as_slice()[..5], &[2, 3, 5, 7, 11]);
        assert_eq!(set.as_slice().last(), Some(&241));
        assert_eq!(set.as_slice(), trial_division(250).as_slice());
    }

    #[test]
    fn bound_is_exclusive() {
        assert_eq!(generate_primes(2).unwrap().len(), 0);
        assert_eq!(generate_primes(3).unwrap().as_slice(), &[2]);
        assert_eq!(generate_primes(11).unwrap().as_slice(), &[2, 3, 5, 7]);
        assert_eq!(generate_primes(12).unwrap().as_slice(), &[2, 3, 5, 7, 11]);
    }

    #[test]
    fn rejects_out_of_range_bounds() {
        assert_eq!(generate_primes(0), Err(KeyError::InvalidBound { bound: 0 }));
        assert_eq!(generate_primes(1), Err(KeyError::InvalidBound { bound: 1 }));
        assert_eq!(
            generate_primes(MAX_PRIME_BOUND + 1),
            Err(KeyError::InvalidBound { bound: MAX_PRIME_BOUND + 1 })
        );
        let top = generate_primes(MAX_PRIME_BOUND).unwrap();
        assert_eq!(top.as_slice().last(), Some(&65_521));
    }

    #[test]
    fn draw_removes_without_replacement() {
        let mut set = generate_primes(100).unwrap();
        let total = set.len();
        let mut rng = StdRng::seed_from_u64(7);

        let mut drawn = Vec::new();
        while let Some(p) = set.draw(&mut rng) {
            assert!(!drawn.contains(&p), "prime {p} drawn twice");
            drawn.push(p);
        }

        assert!(set.is_empty());
        assert_eq!(drawn.len(), total);
        drawn.sort_unstable();
        assert_eq!(drawn, trial_division(100));
    }

    proptest! {
        #[test]
        fn sieve_matches_trial_division(bound in 2usize..4096) {
            let set = generate_primes(bound).unwrap();
            let expected = trial_division(bound);
            prop_assert_eq!(set.as_slice(), expected.as_slice());
            prop_assert!(set.as_slice().windows(2).all(|w| w[0] < w[1]));
        }
    }
}
