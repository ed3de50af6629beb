use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use env_logger::Env;
use log::{debug, LevelFilter};
use pixel_rsa_core::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "pixel-rsa",
    author,
    version,
    about = "Encrypt image samples byte-wise with a textbook RSA permutation"
)]
#[command(group(ArgGroup::new("source").required(true).args(["dir", "file", "decrypt"])))]
struct Cli {
    /// Encrypt every image under this directory (recursive).
    #[arg(short = 'd', long, value_name = "DIR", value_parser = existing_dir)]
    dir: Option<PathBuf>,

    /// Encrypt a single image.
    #[arg(short = 'f', long, value_name = "FILE", value_parser = existing_file)]
    file: Option<PathBuf>,

    /// Decrypt a stored .rsai container; needs the --seed and --bound it was written with.
    #[arg(long, value_name = "FILE", value_parser = existing_file)]
    decrypt: Option<PathBuf>,

    /// Write outputs here instead of beside each input.
    #[arg(short = 't', long, value_name = "DIR", value_parser = existing_dir)]
    target: Option<PathBuf>,

    /// Report skipped files at info level and enable debug logging.
    #[arg(short = 'v', long)]
    verbose: bool,

    /// sequential | threaded | threaded:N | accelerator | auto
    #[arg(long, value_name = "S")]
    strategy: Option<Strategy>,

    /// Shorthand for --strategy threaded:N.
    #[arg(long, value_name = "N", conflicts_with = "strategy")]
    threads: Option<usize>,

    /// Concurrent image tasks in directory mode.
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Sieve bound for the prime pool.
    #[arg(long, value_name = "B")]
    bound: Option<usize>,

    /// Seed the prime draw for reproducible keys.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Output file name prefix.
    #[arg(long, value_name = "PREFIX")]
    prefix: Option<String>,

    /// Decrypt what was written and compare with the source.
    #[arg(long)]
    verify: bool,

    /// Skip the lossless .rsai container.
    #[arg(long)]
    no_container: bool,

    /// Write the run report as JSON.
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Load settings from a JSON file; flags override it.
    #[arg(long, value_name = "FILE", value_parser = existing_file)]
    config: Option<PathBuf>,
}

fn existing_dir(s: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("{s} is not a directory"))
    }
}

fn existing_file(s: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("{s} does not exist or is not a file"))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;
    debug!("effective config: {:?}", config);

    let report = match (&cli.dir, &cli.file, &cli.decrypt) {
        (Some(dir), _, _) => run_batch(dir, &config)
            .with_context(|| format!("encrypting images under {}", dir.display()))?,
        (None, Some(file), _) => run_single(file, &config)
            .with_context(|| format!("encrypting {}", file.display()))?,
        (None, None, Some(container)) => run_decrypt(container, &config)
            .with_context(|| format!("decrypting {}", container.display()))?,
        (None, None, None) => bail!("one of --dir, --file or --decrypt is required"),
    };

    print_summary(&report);

    if let Some(path) = &cli.report {
        save_json(path, "run report", &report)?;
    }

    if report.failed() > 0 {
        bail!("{} of {} images failed", report.failed(), report.outcomes.len());
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default));
    builder.format_timestamp(None);
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

/// JSON file (if any) first, then flags.
fn build_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if let Some(target) = &cli.target {
        config.target_dir = Some(target.clone());
    }
    if cli.verbose {
        config.verbose = true;
    }
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    if let Some(n) = cli.threads {
        config.strategy = Strategy::Threaded(n);
    }
    if let Some(n) = cli.workers {
        config.batch_workers = Some(n);
    }
    if let Some(bound) = cli.bound {
        config.prime_bound = bound;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(prefix) = &cli.prefix {
        config.output_prefix = prefix.clone();
    }
    if cli.verify {
        config.verify = true;
    }
    if cli.no_container {
        config.write_container = false;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn print_summary(report: &BatchReport) {
    println!(
        "modulus n={} e={} backend={} workers={}",
        report.modulus, report.public_exponent, report.backend, report.workers
    );
    for outcome in &report.outcomes {
        match (&outcome.status, &outcome.output) {
            (ItemStatus::Encrypted, Some(output)) => {
                println!("  {} -> {}", outcome.input.display(), output.display())
            }
            (ItemStatus::Decrypted, _) => {
                if let Some(output) = &outcome.decrypted {
                    println!("  {} -> {}", outcome.input.display(), output.display())
                }
            }
            (status, _) => {
                if let Some(reason) = status.reason() {
                    println!("  {} !! {}", outcome.input.display(), reason);
                }
            }
        }
    }
    println!(
        "{} succeeded, {} skipped, {} failed in {:.2?}",
        report.succeeded(),
        report.skipped(),
        report.failed(),
        report.telemetry.elapsed
    );
}

fn save_json<T: ?Sized + serde::Serialize>(path: &Path, label: &str, value: &T) -> Result<()> {
    let serialized = serde_json::to_string_pretty(value)?;
    fs::write(path, serialized)
        .with_context(|| format!("writing {} to {}", label, path.display()))?;
    Ok(())
}
