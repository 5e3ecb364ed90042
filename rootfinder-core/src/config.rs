//! Configuration loading from rootfinder.toml.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{IoResultExt, RootFinderError, RootFinderResult};

/// Main configuration structure for rootfinder.toml.
#[derive(Debug, Deserialize, Default)]
pub struct RootFinderConfig {
    /// Model convention selector: "dataclass", "pydantic", or "attrs".
    pub convention: Option<String>,
    /// Scan configuration.
    pub scan: Option<ScanConfig>,
    /// Worker pool configuration.
    pub parallel: Option<ParallelConfig>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Directory traversal configuration.
#[derive(Debug, Deserialize, Default)]
pub struct ScanConfig {
    /// Descend into subdirectories.
    pub recursive: Option<bool>,
    /// Drop `__init__.py` files.
    pub skip_init_files: Option<bool>,
}

/// Worker pool configuration.
#[derive(Debug, Deserialize, Default)]
pub struct ParallelConfig {
    /// Fan files out across a worker pool.
    pub enabled: Option<bool>,
    /// Pool size; absent means one worker per core.
    pub max_workers: Option<usize>,
    /// Per-file attempt budget in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

/// Loads configuration from rootfinder.toml if it exists.
pub fn load_config(root: &Path) -> RootFinderResult<Option<RootFinderConfig>> {
    let path = root.join("rootfinder.toml");
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).with_path(&path)?;
    let cfg = toml::from_str(&content)
        .map_err(|e| RootFinderError::config(format!("invalid rootfinder.toml: {e}")))?;
    Ok(Some(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn fixture_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!("rootfinder_config_{name}_{id}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = fixture_dir("missing");
        assert!(load_config(&dir).unwrap().is_none());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_loads_full_config() {
        let dir = fixture_dir("full");
        fs::write(
            dir.join("rootfinder.toml"),
            "\
convention = \"pydantic\"

[scan]
recursive = false

[parallel]
enabled = true
max_workers = 4
timeout_ms = 300

[output]
format = \"json\"
",
        )
        .unwrap();
        let cfg = load_config(&dir).unwrap().unwrap();
        assert_eq!(cfg.convention.as_deref(), Some("pydantic"));
        assert_eq!(cfg.scan.unwrap().recursive, Some(false));
        assert_eq!(cfg.parallel.as_ref().unwrap().max_workers, Some(4));
        assert_eq!(cfg.output.unwrap().format.as_deref(), Some("json"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = fixture_dir("invalid");
        fs::write(dir.join("rootfinder.toml"), "convention = [not toml").unwrap();
        let err = load_config(&dir).unwrap_err();
        assert!(matches!(err, RootFinderError::Config { .. }));
        fs::remove_dir_all(&dir).ok();
    }
}
