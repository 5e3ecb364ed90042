//! Deterministic `.py` file discovery with efficient directory pruning.
//!
//! - Early subtree skipping via `WalkDir::filter_entry` (O(1) per pruned dir)
//! - Parallel extension filtering via Rayon's `par_bridge`
//! - Results sorted before return, so discovery order never leaks into output

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::{RootFinderError, RootFinderResult};

/// Directories that never contain hand-routed generated models.
const EXCLUDED_DIRS: &[&str] = &[
    "__pycache__",
    ".git",
    ".venv",
    "venv",
    "node_modules",
    "site-packages",
    ".mypy_cache",
    ".pytest_cache",
];

/// Options controlling directory traversal.
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Descend into subdirectories. When false only the top level is read.
    pub recursive: bool,
    /// Drop `__init__.py` files from the result.
    pub skip_init_files: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            skip_init_files: false,
        }
    }
}

#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

fn wanted(path: &Path, options: ScanOptions) -> bool {
    if !path.is_file() || !path.extension().is_some_and(|ext| ext == "py") {
        return false;
    }
    if options.skip_init_files
        && path
            .file_name()
            .is_some_and(|name| name == "__init__.py")
    {
        return false;
    }
    true
}

/// Gathers `.py` files under `root`, pruning vendored and cache directories.
pub fn gather_py_files(root: &Path, options: ScanOptions) -> RootFinderResult<Vec<PathBuf>> {
    let excludes: HashSet<&str> = EXCLUDED_DIRS.iter().copied().collect();

    let mut walker = WalkDir::new(root);
    if !options.recursive {
        walker = walker.max_depth(1);
    }

    let mut files = walker
        .into_iter()
        // filter_entry prunes entire subtrees before they are iterated
        .filter_entry(|e| !is_excluded_dir(e, &excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if wanted(path, options) {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(RootFinderError::Io {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf()),
                message: format!("directory walk failed: {e}"),
                source: e.into_io_error(),
            })),
        })
        .collect::<RootFinderResult<Vec<_>>>()?;

    // par_bridge yields in nondeterministic order
    files.sort();
    Ok(files)
}
