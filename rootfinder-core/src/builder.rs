//! Builder pattern API for root-model analysis.
//!
//! Provides a fluent interface for configuring and running a search:
//!
//! ```rust,ignore
//! use rootfinder_core::prelude::*;
//!
//! let roots = RootFinder::new("generated/models")
//!     .convention(Convention::Pydantic)
//!     .recursive(true)
//!     .parallel(true)
//!     .analyze()?;
//! ```

use std::time::Duration;

use crate::convention::Convention;
use crate::error::RootFinderResult;
use crate::model::RootModel;
use crate::parse::PySource;
use crate::run::{analyze, ParallelSettings};
use crate::scan::ScanOptions;

/// Builder for configuring a root-model search.
#[derive(Debug, Clone)]
pub struct RootFinder {
    sources: Vec<PySource>,
    convention: Convention,
    scan: ScanOptions,
    parallel: ParallelSettings,
}

impl RootFinder {
    /// Create a builder over a single input: a file path, a directory
    /// path, or literal Python source.
    pub fn new(source: impl Into<PySource>) -> Self {
        Self {
            sources: vec![source.into()],
            convention: Convention::default(),
            scan: ScanOptions::default(),
            parallel: ParallelSettings::default(),
        }
    }

    /// Add another input analyzed as part of the same corpus.
    pub fn source(mut self, source: impl Into<PySource>) -> Self {
        self.sources.push(source.into());
        self
    }

    /// Select the model convention (dataclass, pydantic, attrs).
    pub fn convention(mut self, convention: Convention) -> Self {
        self.convention = convention;
        self
    }

    /// Descend into subdirectories of directory inputs (default true).
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.scan.recursive = recursive;
        self
    }

    /// Skip `__init__.py` files in directory inputs (default false).
    pub fn skip_init_files(mut self, skip: bool) -> Self {
        self.scan.skip_init_files = skip;
        self
    }

    /// Fan files out across a worker pool (default off).
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel.enabled = enabled;
        self
    }

    /// Pool size for parallel runs; `None` uses one worker per core.
    pub fn max_workers(mut self, workers: Option<usize>) -> Self {
        self.parallel.max_workers = workers;
        self
    }

    /// Per-file attempt budget for parallel runs; timed-out files are
    /// retried up to the attempt limit before the run fails.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.parallel.timeout = timeout;
        self
    }

    /// Run the analysis. `Ok(None)` means no roots were found.
    pub fn analyze(self) -> RootFinderResult<Option<Vec<RootModel>>> {
        analyze(self.sources, self.convention, self.scan, self.parallel)
    }
}
