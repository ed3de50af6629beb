//! config.rs
//! Run configuration. Loaded from JSON (every field optional) and then overridden by the caller.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_INFLIGHT_CAP, DEFAULT_OUTPUT_PREFIX, DEFAULT_PRIME_BOUND, MAX_PRIME_BOUND};
use crate::transform::Strategy;
use crate::types::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sieve bound for the prime pool.
    pub prime_bound: usize,
    pub strategy: Strategy,
    /// Concurrent image tasks; `None` uses the host profile.
    pub batch_workers: Option<usize>,
    /// Where outputs go; `None` writes beside each input.
    pub target_dir: Option<PathBuf>,
    pub output_prefix: String,
    /// Log skip diagnostics at info instead of debug.
    pub verbose: bool,
    /// Decrypt the written container and compare with the source.
    pub verify: bool,
    /// Fixed RNG seed for reproducible keys.
    pub seed: Option<u64>,
    /// Write the lossless `.rsai` container next to each preview image.
    pub write_container: bool,
    pub inflight_cap: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            prime_bound: DEFAULT_PRIME_BOUND,
            strategy: Strategy::default(),
            batch_workers: None,
            target_dir: None,
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            verbose: false,
            verify: false,
            seed: None,
            write_container: true,
            inflight_cap: DEFAULT_INFLIGHT_CAP,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self, EngineError> {
        let cfg: EngineConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, EngineError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject settings that can only fail later.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(2..=MAX_PRIME_BOUND).contains(&self.prime_bound) {
            return Err(EngineError::Config(format!(
                "prime_bound {} outside 2..={}",
                self.prime_bound, MAX_PRIME_BOUND
            )));
        }
        if self.strategy == Strategy::Threaded(0) {
            return Err(EngineError::Config("threaded strategy needs at least one thread".into()));
        }
        if self.batch_workers == Some(0) {
            return Err(EngineError::Config("batch_workers must be at least 1".into()));
        }
        if self.inflight_cap == 0 {
            return Err(EngineError::Config("inflight_cap must be at least 1".into()));
        }
        if let Some(dir) = &self.target_dir {
            if !dir.is_dir() {
                return Err(EngineError::Config(format!("{} is not a directory", dir.display())));
            }
        }
        Ok(())
    }
}
