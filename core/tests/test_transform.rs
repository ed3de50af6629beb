#[cfg(test)]
mod transform_tests {
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use pixel_rsa_core::codec::{build_table, CodecTable, Direction};
    use pixel_rsa_core::keys::KeyPair;
    use pixel_rsa_core::pixel::{PixelBuffer, Samples};
    use pixel_rsa_core::transform::{
        make_backend, transform, HybridParallelismProfile, SequentialBackend, Strategy,
        TransformBackend, TransformEngine, TransformError,
    };

    fn table() -> CodecTable {
        build_table(&KeyPair::from_primes(61, 53).unwrap()).unwrap()
    }

    fn random_plain(width: u32, height: u32, channels: u8, seed: u64) -> PixelBuffer {
        let mut rng = StdRng::seed_from_u64(seed);
        let len = width as usize * height as usize * channels as usize;
        let samples = (0..len).map(|_| rng.gen::<u8>()).collect();
        PixelBuffer::plain(width, height, channels, samples)
    }

    fn engine(strategy: Strategy) -> TransformEngine {
        TransformEngine::new(&strategy, &HybridParallelismProfile::new(4, 0, 1)).unwrap()
    }

    #[test]
    fn strategies_agree() {
        let table = table();
        // Large enough for the threaded backend to split into several chunks.
        let plain = random_plain(400, 250, 3, 11);
        let expected = engine(Strategy::Sequential).apply(&plain, &table, Direction::Encrypt).unwrap();

        for strategy in [Strategy::Threaded(1), Strategy::Threaded(4), Strategy::Threaded(7), Strategy::Accelerator] {
            let got = transform(&plain, &table, Direction::Encrypt, &strategy).unwrap();
            assert_eq!(got, expected, "{strategy} diverged from sequential");
        }
    }

    #[test]
    fn encrypt_matches_table_elementwise() {
        let table = table();
        let plain = random_plain(17, 9, 4, 3);
        let cipher = engine(Strategy::Threaded(3)).apply(&plain, &table, Direction::Encrypt).unwrap();

        let (Samples::Plain(src), Samples::Cipher(dst)) = (&plain.samples, &cipher.samples) else {
            panic!("unexpected sample kinds");
        };
        for (v, c) in src.iter().zip(dst) {
            assert_eq!(table.encrypt_sample(*v), *c);
        }
        assert_eq!((cipher.width, cipher.height, cipher.channels), (17, 9, 4));
    }

    #[test]
    fn empty_buffer_is_returned_unchanged() {
        let table = table();
        let empty = PixelBuffer::plain(0, 0, 3, Vec::new());
        for strategy in [Strategy::Sequential, Strategy::Threaded(2)] {
            let e = engine(strategy);
            assert_eq!(e.apply(&empty, &table, Direction::Encrypt).unwrap(), empty);
            assert_eq!(e.apply(&empty, &table, Direction::Decrypt).unwrap(), empty);
        }
    }

    #[test]
    fn direction_must_match_samples() {
        let table = table();
        let plain = random_plain(2, 2, 1, 0);
        let err = engine(Strategy::Sequential).apply(&plain, &table, Direction::Decrypt).unwrap_err();
        assert_eq!(
            err,
            TransformError::DirectionMismatch { direction: Direction::Decrypt, samples: "plain" }
        );

        let cipher = PixelBuffer::cipher(1, 1, 1, vec![1]);
        let err = engine(Strategy::Sequential).apply(&cipher, &table, Direction::Encrypt).unwrap_err();
        assert!(matches!(err, TransformError::DirectionMismatch { .. }));
    }

    #[test]
    fn unknown_ciphertext_reports_lowest_index() {
        let table = table();
        let len = 200_000usize;
        let mut samples = vec![table.encrypt_sample(7); len];
        samples[150_000] = 3232;
        samples[100_000] = 3232;
        let bad = PixelBuffer::cipher(len as u32, 1, 1, samples);

        for strategy in [Strategy::Sequential, Strategy::Threaded(4)] {
            let err = engine(strategy).apply(&bad, &table, Direction::Decrypt).unwrap_err();
            assert_eq!(err, TransformError::UnknownCiphertext { index: 100_000, value: 3232 });
        }
    }

    #[test]
    fn zero_threads_is_rejected() {
        let profile = HybridParallelismProfile::single_threaded();
        assert!(matches!(
            make_backend(&Strategy::Threaded(0), &profile),
            Err(TransformError::InvalidWorkerCount)
        ));
    }

    #[test]
    fn backend_checks_lengths() {
        let table = table();
        let mut out = vec![0u32; 3];
        assert_eq!(
            SequentialBackend.encrypt(&table, &[1, 2], &mut out),
            Err(TransformError::LengthMismatch { input: 2, output: 3 })
        );
    }

    #[test]
    fn strategy_from_str() {
        assert_eq!("sequential".parse::<Strategy>(), Ok(Strategy::Sequential));
        assert_eq!("Threaded:8".parse::<Strategy>(), Ok(Strategy::Threaded(8)));
        assert_eq!("gpu".parse::<Strategy>(), Ok(Strategy::Accelerator));
        assert_eq!("auto".parse::<Strategy>(), Ok(Strategy::Auto));
        assert!(matches!("threaded".parse::<Strategy>(), Ok(Strategy::Threaded(n)) if n >= 1));
        assert!("threaded:x".parse::<Strategy>().is_err());
        assert!("fast".parse::<Strategy>().is_err());
        assert_eq!(Strategy::Threaded(3).to_string(), "threaded:3");
    }

    proptest! {
        #[test]
        fn decrypt_inverts_encrypt(samples in proptest::collection::vec(any::<u8>(), 1..3000), threads in 1usize..6) {
            let table = table();
            let len = samples.len() as u32;
            let plain = PixelBuffer::plain(len, 1, 1, samples);
            let e = engine(Strategy::Threaded(threads));

            let cipher = e.apply(&plain, &table, Direction::Encrypt).unwrap();
            let back = e.apply(&cipher, &table, Direction::Decrypt).unwrap();
            prop_assert_eq!(back, plain);
        }
    }
}
