use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::telemetry::TelemetrySnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemStatus {
    /// Encrypted and saved (and verified, when requested).
    Encrypted,
    /// Stored ciphertext decrypted back to an image.
    Decrypted,
    /// Input could not be decoded; nothing was written.
    Skipped { reason: String },
    TransformFailed { reason: String },
    SaveFailed { reason: String },
    VerifyFailed { reason: String },
}

impl ItemStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ItemStatus::Encrypted | ItemStatus::Decrypted)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ItemStatus::Skipped { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ItemStatus::Encrypted | ItemStatus::Decrypted => None,
            ItemStatus::Skipped { reason }
            | ItemStatus::TransformFailed { reason }
            | ItemStatus::SaveFailed { reason }
            | ItemStatus::VerifyFailed { reason } => Some(reason),
        }
    }
}

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub input: PathBuf,
    /// Preview image.
    pub output: Option<PathBuf>,
    /// Lossless `.rsai` ciphertext.
    pub container: Option<PathBuf>,
    /// Image written by the verify pass or by decryption.
    pub decrypted: Option<PathBuf>,
    pub samples: usize,
    #[serde(flatten)]
    pub status: ItemStatus,
}

impl ItemOutcome {
    pub fn new(input: &Path, samples: usize) -> Self {
        Self {
            input: input.to_path_buf(),
            output: None,
            container: None,
            decrypted: None,
            samples,
            status: ItemStatus::Encrypted,
        }
    }

    pub fn skipped(input: &Path, reason: String) -> Self {
        Self { status: ItemStatus::Skipped { reason }, ..Self::new(input, 0) }
    }

    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = status;
        self
    }
}

/// Result of one run. Carries no private exponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub modulus: u64,
    pub public_exponent: u64,
    pub backend: String,
    pub workers: usize,
    /// In input order.
    pub outcomes: Vec<ItemOutcome>,
    pub telemetry: TelemetrySnapshot,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_ok()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_skipped()).count()
    }

    /// Items that loaded but failed later.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded() - self.skipped()
    }

    /// One line per item that did not succeed.
    pub fn diagnostics(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|o| o.status.reason().map(|r| format!("{}: {}", o.input.display(), r)))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
