//! Analysis orchestration: source expansion, per-file work, and the
//! sequential and pooled execution strategies.
//!
//! A timed-out attempt leaves its worker thread running detached; the
//! retry starts fresh rather than waiting on the straggler. That keeps a
//! hung parse from wedging the whole run at the cost of a leaked thread.

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::convention::Convention;
use crate::error::{RootFinderError, RootFinderResult};
use crate::finder::find_roots;
use crate::model::RootModel;
use crate::parse::PySource;
use crate::scan::{gather_py_files, ScanOptions};
use crate::visit::{visit_source, FileVisit};

/// Total attempts per file under a timeout (one initial try plus retries).
pub const MAX_ATTEMPTS: usize = 3;

/// Controls for the pooled execution strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelSettings {
    /// Fan files out across a worker pool instead of a sequential loop.
    pub enabled: bool,
    /// Pool size; `None` uses the runtime default (one worker per core).
    pub max_workers: Option<usize>,
    /// Per-file wall-clock budget for a single attempt. Only meaningful
    /// when `enabled` is set.
    pub timeout: Option<Duration>,
}

/// Analyze a single unit of input and return its roots.
pub fn analyze_source(
    source: impl Into<PySource>,
    convention: Convention,
) -> RootFinderResult<Option<Vec<RootModel>>> {
    analyze(
        vec![source.into()],
        convention,
        ScanOptions::default(),
        ParallelSettings::default(),
    )
}

/// Analyze an explicit collection of file paths as one corpus.
pub fn analyze_paths(
    paths: Vec<PathBuf>,
    convention: Convention,
    parallel: ParallelSettings,
) -> RootFinderResult<Option<Vec<RootModel>>> {
    analyze(
        paths.into_iter().map(PySource::Path).collect(),
        convention,
        ScanOptions::default(),
        parallel,
    )
}

/// Analyze a set of inputs as one corpus.
///
/// Directory paths are expanded to their `.py` files first; every file and
/// text unit is then visited, results merged, and root selection performed
/// once over the union. A class defined in one input and referenced from
/// another is therefore not a root.
pub fn analyze(
    sources: Vec<PySource>,
    convention: Convention,
    scan: ScanOptions,
    parallel: ParallelSettings,
) -> RootFinderResult<Option<Vec<RootModel>>> {
    let units = expand_sources(sources, scan)?;
    info!(units = units.len(), ?convention, "starting analysis");

    let visits = if parallel.enabled && units.len() > 1 {
        visit_pooled(&units, convention, parallel)?
    } else {
        visit_sequential(&units, convention)?
    };

    let mut merged = FileVisit::default();
    for visit in visits {
        merged.absorb(visit);
    }
    debug!(
        defined = merged.defined.len(),
        referenced = merged.referenced.len(),
        "merged per-file results"
    );
    Ok(find_roots(merged.defined, &merged.referenced))
}

/// Replace directory sources with the files they contain; files and text
/// pass through unchanged.
fn expand_sources(
    sources: Vec<PySource>,
    scan: ScanOptions,
) -> RootFinderResult<Vec<PySource>> {
    let mut units = Vec::with_capacity(sources.len());
    for source in sources {
        match source {
            PySource::Path(path) if path.is_dir() => {
                let files = gather_py_files(&path, scan)?;
                debug!(dir = %path.display(), files = files.len(), "expanded directory");
                units.extend(files.into_iter().map(PySource::Path));
            }
            other => units.push(other),
        }
    }
    Ok(units)
}

fn visit_unit(unit: &PySource, convention: Convention) -> RootFinderResult<FileVisit> {
    let (content, file) = unit.load()?;
    visit_source(&content, file.as_deref(), convention)
}

fn visit_sequential(
    units: &[PySource],
    convention: Convention,
) -> RootFinderResult<Vec<FileVisit>> {
    units
        .iter()
        .map(|unit| visit_unit(unit, convention))
        .collect()
}

fn visit_pooled(
    units: &[PySource],
    convention: Convention,
    parallel: ParallelSettings,
) -> RootFinderResult<Vec<FileVisit>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallel.max_workers.unwrap_or(0))
        .build()
        .map_err(|e| RootFinderError::config(format!("worker pool: {e}")))?;

    pool.install(|| {
        units
            .par_iter()
            .map(|unit| {
                let result = match parallel.timeout {
                    Some(budget) => {
                        let task_unit = unit.clone();
                        run_with_retry(
                            move || visit_unit(&task_unit, convention),
                            budget,
                            unit_label(unit),
                        )
                    }
                    None => visit_unit(unit, convention),
                };
                // Fail-fast: the first task error aborts the run; non-timeout
                // failures are tagged with the task that produced them.
                result.map_err(|e| match e {
                    timeout @ RootFinderError::Timeout { .. } => timeout,
                    other => RootFinderError::task(unit_label(unit), other.to_string()),
                })
            })
            .collect()
    })
}

fn unit_label(unit: &PySource) -> PathBuf {
    match unit {
        PySource::Path(path) => path.clone(),
        PySource::Text(_) => PathBuf::from("<text>"),
    }
}

/// Run `task` with a per-attempt wall-clock budget, retrying on timeout
/// up to [`MAX_ATTEMPTS`] total attempts.
///
/// Non-timeout failures are returned immediately; retrying a deterministic
/// parse failure would only repeat it. An attempt whose worker disappears
/// without reporting (a panic) is surfaced as a task failure.
pub(crate) fn run_with_retry<T, F>(
    task: F,
    budget: Duration,
    label: PathBuf,
) -> RootFinderResult<T>
where
    T: Send + 'static,
    F: Fn() -> RootFinderResult<T> + Send + Clone + 'static,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let (tx, rx) = mpsc::channel();
        let task = task.clone();
        std::thread::spawn(move || {
            // Receiver may be gone after a timeout; send failure is fine.
            let _ = tx.send(task());
        });

        match rx.recv_timeout(budget) {
            Ok(result) => return result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!(
                    file = %label.display(),
                    attempt,
                    max_attempts = MAX_ATTEMPTS,
                    "attempt timed out"
                );
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                return Err(RootFinderError::task(
                    label,
                    "worker terminated without a result",
                ));
            }
        }
    }
    Err(RootFinderError::timeout(label, MAX_ATTEMPTS))
}
