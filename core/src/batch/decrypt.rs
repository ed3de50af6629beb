//! batch/decrypt.rs
//!
//! Standalone decryption of a stored `.rsai` container. The key material is rebuilt from the
//! prime bound and seed the container was encrypted with; the stored modulus must match.

use std::path::Path;
use std::time::Instant;

use log::info;

use crate::batch::item::ItemTelemetry;
use crate::batch::material::KeyMaterial;
use crate::batch::runner::{build_report, host_profile};
use crate::batch::types::{BatchReport, ItemOutcome, ItemStatus};
use crate::codec::Direction;
use crate::config::EngineConfig;
use crate::image_io::{decrypted_path, encode, read_container};
use crate::telemetry::{Stage, TelemetryTimer};
use crate::transform::TransformEngine;
use crate::types::EngineError;

/// Decrypt `container` and write `DEC_<name>` beside it (or into the target directory).
///
/// Errors:
/// - `Config` if the path is not a file, no seed is configured, or the configuration is invalid
/// - `Container` if the file is not a valid container
/// - `KeyMismatch` if the rebuilt modulus differs from the stored one
/// - `Transform` / `Image` if decryption or the image write fails
pub fn run_decrypt(container: &Path, config: &EngineConfig) -> Result<BatchReport, EngineError> {
    config.validate()?;
    if !container.is_file() {
        return Err(EngineError::Config(format!("{} is not a file", container.display())));
    }
    let seed = config.seed.ok_or_else(|| {
        EngineError::Config("decrypting a container needs the seed it was encrypted with".into())
    })?;

    let mut timer = TelemetryTimer::new();
    let material = KeyMaterial::generate(config.prime_bound, Some(seed), &mut timer.stage_times)?;
    let profile = host_profile(config);
    let engine = TransformEngine::new(&config.strategy, &profile)?;

    let mut telemetry = ItemTelemetry::default();
    let start = Instant::now();
    let (header, cipher) = read_container(container)?;
    telemetry.times.add(Stage::Load, start.elapsed());
    telemetry.counters.add_container_loaded(cipher.len());

    if header.modulus != material.modulus() {
        return Err(EngineError::KeyMismatch {
            path: container.display().to_string(),
            stored: header.modulus,
            derived: material.modulus(),
        });
    }

    let start = Instant::now();
    let plain = engine.apply(&cipher, material.table(), Direction::Decrypt)?;
    telemetry.times.add(Stage::Decrypt, start.elapsed());
    telemetry.counters.add_decrypt(plain.len());

    let output = decrypted_path(container, &config.output_prefix, config.target_dir.as_deref());
    let start = Instant::now();
    encode(&output, &plain)?;
    telemetry.times.add(Stage::Save, start.elapsed());
    telemetry.counters.add_saved();
    info!("[DECRYPT] {} -> {}", container.display(), output.display());

    let mut outcome = ItemOutcome::new(container, plain.len()).with_status(ItemStatus::Decrypted);
    outcome.decrypted = Some(output);

    timer.stage_times.merge(&telemetry.times);
    timer.finish();
    Ok(build_report(&material, &engine, 1, vec![outcome], &telemetry.counters, &timer))
}
