//! telemetry/counters.rs
//! Mutable counters collected while a run is in progress.
//!
//! Converted into an immutable `TelemetrySnapshot` when the run ends.
use std::ops::AddAssign;

/// Deterministic counters collected during a run.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct TelemetryCounters {
    pub images_loaded: u64,
    pub images_skipped: u64,
    pub images_saved: u64,
    pub images_save_failed: u64,
    pub images_verified: u64,
    pub images_verify_failed: u64,
    pub samples_encrypted: u64,
    pub samples_decrypted: u64,
    /// Plain sample bytes read from decoded images.
    pub bytes_plain: u64,
    /// Widened ciphertext bytes produced (4 per sample).
    pub bytes_cipher: u64,
}

impl TelemetryCounters {
    /// Record one decoded image.
    pub fn add_loaded(&mut self, samples: usize) {
        self.images_loaded += 1;
        self.bytes_plain += samples as u64;
    }

    /// Record one ciphertext container read back from disk.
    pub fn add_container_loaded(&mut self, samples: usize) {
        self.images_loaded += 1;
        self.bytes_cipher += samples as u64 * 4;
    }

    /// Record one input that failed to decode.
    pub fn add_skipped(&mut self) {
        self.images_skipped += 1;
    }

    /// Record one encrypt transform over `samples` samples.
    pub fn add_encrypt(&mut self, samples: usize) {
        self.samples_encrypted += samples as u64;
        self.bytes_cipher += samples as u64 * 4;
    }

    /// Record one decrypt transform over `samples` samples.
    pub fn add_decrypt(&mut self, samples: usize) {
        self.samples_decrypted += samples as u64;
    }

    pub fn add_saved(&mut self) {
        self.images_saved += 1;
    }

    pub fn add_save_failed(&mut self) {
        self.images_save_failed += 1;
    }

    pub fn add_verified(&mut self, ok: bool) {
        if ok {
            self.images_verified += 1;
        } else {
            self.images_verify_failed += 1;
        }
    }

    /// Fold another worker's counters into this one.
    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.images_loaded += other.images_loaded;
        self.images_skipped += other.images_skipped;
        self.images_saved += other.images_saved;
        self.images_save_failed += other.images_save_failed;
        self.images_verified += other.images_verified;
        self.images_verify_failed += other.images_verify_failed;
        self.samples_encrypted += other.samples_encrypted;
        self.samples_decrypted += other.samples_decrypted;
        self.bytes_plain += other.bytes_plain;
        self.bytes_cipher += other.bytes_cipher;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
