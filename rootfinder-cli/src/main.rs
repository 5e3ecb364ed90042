//! rootfinder CLI - root model detector for generated Python data models.
//!
//! Features:
//! - dataclass, pydantic, and attrs convention support
//! - Recursive directory scanning with cache-directory pruning
//! - Rayon-powered parallel analysis with per-file timeout and retry
//! - Plain and JSON output
//! - rootfinder.toml configuration pickup

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use rootfinder_core::{
    analyze, init_structured_logging, load_config, print_json, print_plain, Convention,
    ParallelSettings, PySource, RootFinderConfig, ScanOptions,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Root model detector for generated Python data models")]
pub struct Cli {
    /// Python file or directory of generated models to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Additional files or directories analyzed as part of the same corpus
    #[arg(long, num_args = 1..)]
    also: Vec<PathBuf>,

    /// Model convention: dataclass, pydantic, or attrs
    #[arg(long)]
    convention: Option<String>,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Do not descend into subdirectories
    #[arg(long)]
    no_recursive: bool,

    /// Skip __init__.py files when scanning directories
    #[arg(long)]
    skip_init_files: bool,

    /// Fan files out across a worker pool
    #[arg(long)]
    parallel: bool,

    /// Worker pool size (default: one worker per core)
    #[arg(long)]
    max_workers: Option<usize>,

    /// Per-file attempt budget in milliseconds (parallel runs only)
    #[arg(long)]
    timeout_ms: Option<u64>,
}

fn config_root(path: &Path) -> &Path {
    if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(Path::new("."))
    }
}

/// Command-line flags win over rootfinder.toml, which wins over defaults.
fn effective_settings(
    cli: &Cli,
    config: Option<&RootFinderConfig>,
) -> Result<(Convention, ScanOptions, ParallelSettings, bool)> {
    let convention = match cli.convention.as_deref() {
        Some(selector) => selector.parse::<Convention>()?,
        None => match config.and_then(|c| c.convention.as_deref()) {
            Some(selector) => selector.parse::<Convention>()?,
            None => Convention::default(),
        },
    };

    let config_scan = config.and_then(|c| c.scan.as_ref());
    let scan = ScanOptions {
        recursive: if cli.no_recursive {
            false
        } else {
            config_scan.and_then(|s| s.recursive).unwrap_or(true)
        },
        skip_init_files: cli.skip_init_files
            || config_scan.and_then(|s| s.skip_init_files).unwrap_or(false),
    };

    let config_parallel = config.and_then(|c| c.parallel.as_ref());
    let parallel = ParallelSettings {
        enabled: cli.parallel || config_parallel.and_then(|p| p.enabled).unwrap_or(false),
        max_workers: cli
            .max_workers
            .or_else(|| config_parallel.and_then(|p| p.max_workers)),
        timeout: cli
            .timeout_ms
            .or_else(|| config_parallel.and_then(|p| p.timeout_ms))
            .map(Duration::from_millis),
    };

    let json = cli.json
        || config
            .and_then(|c| c.output.as_ref())
            .and_then(|o| o.format.as_deref())
            == Some("json");

    Ok((convention, scan, parallel, json))
}

fn main() -> Result<()> {
    init_structured_logging();
    let cli = Cli::parse();

    let config = load_config(config_root(&cli.path))
        .context("failed to load rootfinder.toml")?;
    let (convention, scan, parallel, json) = effective_settings(&cli, config.as_ref())?;

    let mut sources = vec![PySource::Path(cli.path.clone())];
    sources.extend(cli.also.iter().map(|p| PySource::Path(p.clone())));

    let roots = analyze(sources, convention, scan, parallel)
        .with_context(|| format!("analysis of {} failed", cli.path.display()))?;

    if json {
        print_json(roots.as_deref());
    } else {
        print_plain(roots.as_deref());
    }

    Ok(())
}
