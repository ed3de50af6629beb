//! batch/item.rs
//!
//! One image through the pipeline: load → encrypt → save preview + container → verify.
//! Every failure after the load is recorded in the outcome; nothing here aborts the batch.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::batch::types::{ItemOutcome, ItemStatus};
use crate::codec::{CodecTable, Direction};
use crate::config::EngineConfig;
use crate::constants::DECRYPTED_OUTPUT_PREFIX;
use crate::image_io::{container_path, decode, encode, output_path, read_container, write_container, ContainerError, ImageIoError};
use crate::pixel::{PixelBuffer, Samples};
use crate::telemetry::{Stage, StageTimes, TelemetryCounters};
use crate::transform::TransformEngine;
use crate::types::EngineError;

/// Shared, read-only state for every item of a run.
#[derive(Clone, Copy)]
pub struct ItemContext<'a> {
    pub engine: &'a TransformEngine,
    pub table: &'a CodecTable,
    pub config: &'a EngineConfig,
}

/// Per-item telemetry, merged by the runner.
#[derive(Debug, Default, Clone)]
pub struct ItemTelemetry {
    pub counters: TelemetryCounters,
    pub times: StageTimes,
}

pub fn load_item(input: &Path, telemetry: &mut ItemTelemetry) -> Result<PixelBuffer, ImageIoError> {
    let start = Instant::now();
    let loaded = decode(input);
    telemetry.times.add(Stage::Load, start.elapsed());
    match &loaded {
        Ok(buf) => telemetry.counters.add_loaded(buf.len()),
        Err(_) => telemetry.counters.add_skipped(),
    }
    loaded
}

/// Load and process `input`. Decode failures become `Skipped`.
pub fn process_path(ctx: ItemContext<'_>, input: &Path, telemetry: &mut ItemTelemetry) -> ItemOutcome {
    match load_item(input, telemetry) {
        Ok(plain) => process_loaded(ctx, input, &plain, telemetry),
        Err(e) => ItemOutcome::skipped(input, e.to_string()),
    }
}

/// Encrypt an already decoded image and write its outputs.
pub fn process_loaded(
    ctx: ItemContext<'_>,
    input: &Path,
    plain: &PixelBuffer,
    telemetry: &mut ItemTelemetry,
) -> ItemOutcome {
    let mut outcome = ItemOutcome::new(input, plain.len());

    let start = Instant::now();
    let encrypted = ctx.engine.apply(plain, ctx.table, Direction::Encrypt);
    telemetry.times.add(Stage::Encrypt, start.elapsed());
    let cipher = match encrypted {
        Ok(c) => c,
        Err(e) => return outcome.with_status(ItemStatus::TransformFailed { reason: e.to_string() }),
    };
    telemetry.counters.add_encrypt(cipher.len());

    let output = output_path(input, &ctx.config.output_prefix, ctx.config.target_dir.as_deref());
    let start = Instant::now();
    let saved = save_cipher(ctx, &output, &cipher);
    telemetry.times.add(Stage::Save, start.elapsed());
    match saved {
        Ok(container) => {
            telemetry.counters.add_saved();
            outcome.output = Some(output);
            outcome.container = container;
        }
        Err(e) => {
            telemetry.counters.add_save_failed();
            return outcome.with_status(ItemStatus::SaveFailed { reason: e.to_string() });
        }
    }

    if ctx.config.verify {
        match verify(ctx, input, plain, &cipher, outcome.container.as_deref(), telemetry) {
            Ok(path) => {
                telemetry.counters.add_verified(true);
                outcome.decrypted = Some(path);
            }
            Err(e) => {
                telemetry.counters.add_verified(false);
                return outcome.with_status(ItemStatus::VerifyFailed { reason: e.to_string() });
            }
        }
    }

    outcome
}

/// Write the preview image, then the container when enabled. Returns the container path.
fn save_cipher(ctx: ItemContext<'_>, output: &Path, cipher: &PixelBuffer) -> Result<Option<PathBuf>, EngineError> {
    encode(output, cipher)?;
    if !ctx.config.write_container {
        return Ok(None);
    }
    let path = container_path(output);
    write_container(&path, cipher, ctx.table.modulus())?;
    Ok(Some(path))
}

/// Decrypt the stored ciphertext (the container when one was written), compare with the source
/// and write the `DEC_` image.
fn verify(
    ctx: ItemContext<'_>,
    input: &Path,
    plain: &PixelBuffer,
    cipher: &PixelBuffer,
    container: Option<&Path>,
    telemetry: &mut ItemTelemetry,
) -> Result<PathBuf, EngineError> {
    let start = Instant::now();
    let stored = match container {
        Some(path) => {
            let (header, buf) = read_container(path)?;
            if header.modulus != ctx.table.modulus() {
                return Err(ContainerError::Invalid(format!(
                    "modulus {} does not match run modulus {}",
                    header.modulus,
                    ctx.table.modulus()
                ))
                .into());
            }
            buf
        }
        None => cipher.clone(),
    };
    telemetry.times.add(Stage::Verify, start.elapsed());

    let start = Instant::now();
    let decrypted = ctx.engine.apply(&stored, ctx.table, Direction::Decrypt)?;
    telemetry.times.add(Stage::Decrypt, start.elapsed());
    telemetry.counters.add_decrypt(decrypted.len());

    let start = Instant::now();
    let mismatch = match (&decrypted.samples, &plain.samples) {
        (Samples::Plain(got), Samples::Plain(want)) if got.len() == want.len() => {
            got.iter().zip(want).position(|(a, b)| a != b)
        }
        (got, want) => Some(got.len().min(want.len())),
    };
    telemetry.times.add(Stage::Verify, start.elapsed());
    if let Some(index) = mismatch {
        return Err(EngineError::VerifyMismatch { path: input.display().to_string(), index });
    }

    let path = output_path(input, DECRYPTED_OUTPUT_PREFIX, ctx.config.target_dir.as_deref());
    let start = Instant::now();
    encode(&path, &decrypted)?;
    telemetry.times.add(Stage::Save, start.elapsed());
    Ok(path)
}
