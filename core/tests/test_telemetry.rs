#[cfg(test)]
mod telemetry_snapshot_tests {
    use std::time::Duration;

    use pixel_rsa_core::telemetry::{Stage, StageTimes, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};

    fn make_counters() -> TelemetryCounters {
        let mut c = TelemetryCounters::default();
        c.add_loaded(300);
        c.add_loaded(100);
        c.add_skipped();
        c.add_encrypt(300);
        c.add_encrypt(100);
        c.add_saved();
        c.add_save_failed();
        c
    }

    fn make_timer() -> TelemetryTimer {
        let mut timer = TelemetryTimer::new();
        std::thread::sleep(Duration::from_millis(20));
        timer.add_stage_time(Stage::Load, Duration::from_millis(5));
        timer.add_stage_time(Stage::Encrypt, Duration::from_millis(10));
        timer.finish();
        timer
    }

    #[test]
    fn counters_track_items_and_bytes() {
        let c = make_counters();
        assert_eq!(c.images_loaded, 2);
        assert_eq!(c.images_skipped, 1);
        assert_eq!(c.bytes_plain, 400);
        assert_eq!(c.samples_encrypted, 400);
        assert_eq!(c.bytes_cipher, 1600);
    }

    #[test]
    fn merge_and_add_assign_agree() {
        let a = make_counters();
        let mut merged = a.clone();
        merged.merge(&a);

        let mut summed = a.clone();
        summed += a.clone();

        assert_eq!(merged, summed);
        assert_eq!(merged.images_loaded, 4);
        assert_eq!(merged.images_save_failed, 2);
    }

    #[test]
    fn container_loads_count_cipher_bytes() {
        let mut c = TelemetryCounters::default();
        c.add_container_loaded(10);
        c.add_decrypt(10);
        assert_eq!(c.images_loaded, 1);
        assert_eq!(c.bytes_cipher, 40);
        assert_eq!(c.bytes_plain, 0);
        assert_eq!(c.samples_decrypted, 10);
    }

    #[test]
    fn snapshot_derives_ratio_and_throughput() {
        let snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer());
        assert!((snapshot.expansion_ratio - 4.0).abs() < f64::EPSILON);
        assert!(snapshot.throughput_samples_per_sec > 0.0);
        assert!(snapshot.elapsed >= Duration::from_millis(20));
        assert_eq!(snapshot.total_stage_time(), Duration::from_millis(15));
        assert!(snapshot.has_all_stages(&[Stage::Load, Stage::Encrypt]));
        assert!(!snapshot.has_all_stages(&[Stage::Verify]));
    }

    #[test]
    fn empty_snapshot_has_zero_ratio() {
        let mut timer = TelemetryTimer::new();
        timer.finish();
        let snapshot = TelemetrySnapshot::from(&TelemetryCounters::default(), &timer);
        assert_eq!(snapshot.expansion_ratio, 0.0);
        assert_eq!(snapshot.samples_encrypted, 0);
    }

    #[test]
    fn stage_times_accumulate_and_merge() {
        let mut a = StageTimes::default();
        a.add(Stage::Sieve, Duration::from_millis(2));
        a.add(Stage::Sieve, Duration::from_millis(3));
        let v = a.time(Stage::TableBuild, || 41 + 1);
        assert_eq!(v, 42);

        let mut b = StageTimes::default();
        b.add(Stage::Sieve, Duration::from_millis(5));
        a.merge(&b);

        assert_eq!(a.get(Stage::Sieve), Duration::from_millis(10));
        assert!(a.has_all(&[Stage::Sieve, Stage::TableBuild]));
        assert_eq!(a.get(Stage::Save), Duration::ZERO);
        assert_eq!(Stage::KeyDerive.to_string(), "key_derive");
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer());
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"images_loaded\": 2"));
        let back: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bytes_cipher, snapshot.bytes_cipher);
        assert_eq!(back.elapsed, snapshot.elapsed);
        assert_eq!(back.stage_times, snapshot.stage_times);
    }
}
