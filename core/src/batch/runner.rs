//! batch/runner.rs
//!
//! Directory and single-file runs. Items flow through a bounded channel to a scoped worker pool;
//! each worker owns the buffers of the item it is processing and shares only the codec table and
//! the transform engine.

use std::path::{Path, PathBuf};
use std::thread;

use crossbeam::channel::bounded;
use log::{debug, info, warn};

use crate::batch::discover::discover_images;
use crate::batch::item::{load_item, process_loaded, process_path, ItemContext, ItemTelemetry};
use crate::batch::material::KeyMaterial;
use crate::batch::types::{BatchReport, ItemOutcome, ItemStatus};
use crate::config::EngineConfig;
use crate::constants::{DEFAULT_MEM_FRACTION, INFLIGHT_IMAGE_BYTES};
use crate::telemetry::{StageTimes, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::transform::{HybridParallelismProfile, Strategy, TransformEngine};
use crate::types::EngineError;

/// Host profile for `config`. GPUs are only probed when the strategy can use one.
pub fn host_profile(config: &EngineConfig) -> HybridParallelismProfile {
    match config.strategy {
        Strategy::Auto | Strategy::Accelerator => {
            HybridParallelismProfile::dynamic(INFLIGHT_IMAGE_BYTES, DEFAULT_MEM_FRACTION, config.inflight_cap)
        }
        Strategy::Sequential | Strategy::Threaded(_) => {
            HybridParallelismProfile::cpu_only(INFLIGHT_IMAGE_BYTES, DEFAULT_MEM_FRACTION, config.inflight_cap)
        }
    }
}

/// Encrypt every decodable image under `dir`.
///
/// Undecodable files are skipped with a diagnostic; per-item save and verify failures are
/// reported in the outcomes.
///
/// Errors:
/// - `Config` if `dir` is not a directory or the configuration is invalid
/// - `Key` / `Codec` if key material cannot be derived
/// - `NoValidImages` if not a single file decodes
pub fn run_batch(dir: &Path, config: &EngineConfig) -> Result<BatchReport, EngineError> {
    config.validate()?;
    let files = discover_images(dir)?;
    if files.is_empty() {
        return Err(EngineError::NoValidImages(dir.display().to_string()));
    }

    let mut timer = TelemetryTimer::new();
    let material = KeyMaterial::generate(config.prime_bound, config.seed, &mut timer.stage_times)?;
    let profile = host_profile(config);
    let engine = TransformEngine::new(&config.strategy, &profile)?;
    let workers = config
        .batch_workers
        .unwrap_or(profile.cpu_workers)
        .clamp(1, files.len());

    info!(
        "[BATCH] {} files, {} workers, backend {}",
        files.len(),
        workers,
        engine.backend_name()
    );

    let ctx = ItemContext { engine: &engine, table: material.table(), config };
    let (outcomes, counters, times) = run_items(&files, ctx, workers, profile.inflight_images)?;
    timer.stage_times.merge(&times);
    timer.finish();

    if counters.images_loaded == 0 {
        return Err(EngineError::NoValidImages(dir.display().to_string()));
    }

    let report = build_report(&material, &engine, workers, outcomes, &counters, &timer);
    info!(
        "[BATCH] done: {} encrypted, {} skipped, {} failed in {:.2?}",
        report.succeeded(),
        report.skipped(),
        report.failed(),
        report.telemetry.elapsed
    );
    Ok(report)
}

/// Encrypt one file. A load failure is fatal here.
pub fn run_single(file: &Path, config: &EngineConfig) -> Result<BatchReport, EngineError> {
    config.validate()?;
    if !file.is_file() {
        return Err(EngineError::Config(format!("{} is not a file", file.display())));
    }

    let mut timer = TelemetryTimer::new();
    let material = KeyMaterial::generate(config.prime_bound, config.seed, &mut timer.stage_times)?;
    let profile = host_profile(config);
    let engine = TransformEngine::new(&config.strategy, &profile)?;

    let mut telemetry = ItemTelemetry::default();
    let plain = load_item(file, &mut telemetry)?;
    let ctx = ItemContext { engine: &engine, table: material.table(), config };
    let outcome = process_loaded(ctx, file, &plain, &mut telemetry);
    log_outcome(&outcome, config.verbose);

    timer.stage_times.merge(&telemetry.times);
    timer.finish();
    Ok(build_report(&material, &engine, 1, vec![outcome], &telemetry.counters, &timer))
}

/// Feed `files` through `workers` scoped threads. Outcomes come back in input order.
fn run_items(
    files: &[PathBuf],
    ctx: ItemContext<'_>,
    workers: usize,
    inflight: usize,
) -> Result<(Vec<ItemOutcome>, TelemetryCounters, StageTimes), EngineError> {
    let (job_tx, job_rx) = bounded::<(usize, &Path)>(inflight);
    let (out_tx, out_rx) = bounded::<(usize, ItemOutcome, ItemTelemetry)>(inflight);

    let mut slots: Vec<Option<ItemOutcome>> = vec![None; files.len()];
    let mut counters = TelemetryCounters::default();
    let mut times = StageTimes::default();
    let verbose = ctx.config.verbose;

    thread::scope(|scope| {
        scope.spawn(move || {
            for (idx, path) in files.iter().enumerate() {
                if job_tx.send((idx, path.as_path())).is_err() {
                    break;
                }
            }
        });

        for i in 0..workers {
            let rx = job_rx.clone();
            let tx = out_tx.clone();
            scope.spawn(move || {
                debug!("[WORKER-{i}] starting");
                while let Ok((idx, path)) = rx.recv() {
                    let mut telemetry = ItemTelemetry::default();
                    let outcome = process_path(ctx, path, &mut telemetry);
                    log_outcome(&outcome, verbose);
                    if tx.send((idx, outcome, telemetry)).is_err() {
                        break;
                    }
                }
                debug!("[WORKER-{i}] finished");
            });
        }

        drop(job_rx);
        drop(out_tx);

        for (idx, outcome, telemetry) in out_rx.iter() {
            counters.merge(&telemetry.counters);
            times.merge(&telemetry.times);
            slots[idx] = Some(outcome);
        }
    });

    let outcomes = slots
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or(EngineError::Pipeline("a worker stopped before its items were done"))?;
    Ok((outcomes, counters, times))
}

fn log_outcome(outcome: &ItemOutcome, verbose: bool) {
    let input = outcome.input.display();
    match &outcome.status {
        ItemStatus::Encrypted => debug!("[BATCH] encrypted {}", input),
        ItemStatus::Decrypted => debug!("[BATCH] decrypted {}", input),
        ItemStatus::Skipped { reason } => {
            if verbose {
                info!("[BATCH] skipped {}: {}", input, reason);
            } else {
                debug!("[BATCH] skipped {}: {}", input, reason);
            }
        }
        ItemStatus::TransformFailed { reason }
        | ItemStatus::SaveFailed { reason }
        | ItemStatus::VerifyFailed { reason } => warn!("[BATCH] {}: {}", input, reason),
    }
}

pub(crate) fn build_report(
    material: &KeyMaterial,
    engine: &TransformEngine,
    workers: usize,
    outcomes: Vec<ItemOutcome>,
    counters: &TelemetryCounters,
    timer: &TelemetryTimer,
) -> BatchReport {
    BatchReport {
        modulus: material.modulus(),
        public_exponent: material.keys().e(),
        backend: engine.backend_name().to_string(),
        workers,
        outcomes,
        telemetry: TelemetrySnapshot::from(counters, timer),
    }
}
