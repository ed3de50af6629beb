//! telemetry/snapshot.rs
//! Immutable end-of-run telemetry.
//!
//! Counters are flattened into plain fields so the snapshot serializes as a flat JSON object.

use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub images_loaded: u64,
    pub images_skipped: u64,
    pub images_saved: u64,
    pub images_save_failed: u64,
    pub images_verified: u64,
    pub images_verify_failed: u64,
    pub samples_encrypted: u64,
    pub samples_decrypted: u64,
    pub bytes_plain: u64,
    pub bytes_cipher: u64,
    /// `bytes_cipher / bytes_plain`. 4.0 after a full encrypt pass, 0.0 when nothing was loaded.
    pub expansion_ratio: f64,
    pub throughput_samples_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();

        let expansion_ratio = if counters.bytes_plain > 0 {
            counters.bytes_cipher as f64 / counters.bytes_plain as f64
        } else {
            0.0
        };

        let samples = counters.samples_encrypted + counters.samples_decrypted;
        let throughput = if elapsed.as_secs_f64() > 0.0 {
            samples as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            images_loaded: counters.images_loaded,
            images_skipped: counters.images_skipped,
            images_saved: counters.images_saved,
            images_save_failed: counters.images_save_failed,
            images_verified: counters.images_verified,
            images_verify_failed: counters.images_verify_failed,
            samples_encrypted: counters.samples_encrypted,
            samples_decrypted: counters.samples_decrypted,
            bytes_plain: counters.bytes_plain,
            bytes_cipher: counters.bytes_cipher,
            expansion_ratio,
            throughput_samples_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
