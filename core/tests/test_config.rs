#[cfg(test)]
mod config_tests {
    use std::fs;

    use tempfile::tempdir;

    use pixel_rsa_core::config::EngineConfig;
    use pixel_rsa_core::constants::{DEFAULT_OUTPUT_PREFIX, DEFAULT_PRIME_BOUND};
    use pixel_rsa_core::transform::Strategy;
    use pixel_rsa_core::types::EngineError;

    #[test]
    fn defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.prime_bound, DEFAULT_PRIME_BOUND);
        assert_eq!(cfg.output_prefix, DEFAULT_OUTPUT_PREFIX);
        assert_eq!(cfg.strategy, Strategy::Auto);
        assert!(cfg.write_container);
        assert!(!cfg.verbose && !cfg.verify);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = EngineConfig::from_json_str(r#"{"strategy": {"Threaded": 4}, "seed": 7}"#).unwrap();
        assert_eq!(cfg.strategy, Strategy::Threaded(4));
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.prime_bound, DEFAULT_PRIME_BOUND);

        let cfg = EngineConfig::from_json_str(r#"{"strategy": "Sequential"}"#).unwrap();
        assert_eq!(cfg.strategy, Strategy::Sequential);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for json in [
            r#"{"prime_bound": 1}"#,
            r#"{"prime_bound": 70000}"#,
            r#"{"strategy": {"Threaded": 0}}"#,
            r#"{"batch_workers": 0}"#,
            r#"{"inflight_cap": 0}"#,
            r#"{"target_dir": "/definitely/not/here"}"#,
            r#"{"prime_bound": "many"}"#,
        ] {
            assert!(
                matches!(EngineConfig::from_json_str(json), Err(EngineError::Config(_))),
                "{json} should be rejected"
            );
        }
    }

    #[test]
    fn loads_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{"verify": true, "output_prefix": "ENC_"}"#).unwrap();
        let cfg = EngineConfig::from_json_file(&path).unwrap();
        assert!(cfg.verify);
        assert_eq!(cfg.output_prefix, "ENC_");

        assert!(matches!(
            EngineConfig::from_json_file(&dir.path().join("missing.json")),
            Err(EngineError::Io(_))
        ));
    }
}
