//! Typed error handling for rootfinder.
//!
//! Provides structured errors that library consumers can match on,
//! with full context about what went wrong and which file was involved.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rootfinder operations.
///
/// This provides typed errors that library consumers can match on,
/// unlike opaque `anyhow::Error` types.
#[derive(Error, Debug)]
pub enum RootFinderError {
    /// I/O error when reading files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Supplied source path does not point to an existing file
    #[error("Source file not found: {path}")]
    NotFound { path: PathBuf },

    /// The parser could not build a syntax tree from the file content
    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Invalid configuration (e.g. unrecognized convention selector)
    #[error("Config error: {message}")]
    Config { message: String },

    /// A per-file task exceeded its timeout past the retry budget
    #[error("Task timed out for {path} after {attempts} attempts")]
    Timeout { path: PathBuf, attempts: usize },

    /// A per-file task failed for a non-timeout reason
    #[error("Task failed for {path}: {message}")]
    Task { path: PathBuf, message: String },
}

impl RootFinderError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a not-found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a parse error tagged with the offending file.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a timeout error for a task that exhausted its retry budget.
    pub fn timeout(path: impl Into<PathBuf>, attempts: usize) -> Self {
        Self::Timeout {
            path: path.into(),
            attempts,
        }
    }

    /// Wrap a per-task failure with the offending file path.
    pub fn task(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Task {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::NotFound { path } => Some(path),
            Self::Parse { path, .. } => Some(path),
            Self::Timeout { path, .. } => Some(path),
            Self::Task { path, .. } => Some(path),
            Self::Config { .. } => None,
        }
    }
}

/// Convenience type alias for rootfinder results.
pub type RootFinderResult<T> = Result<T, RootFinderError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> RootFinderResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> RootFinderResult<T> {
        self.map_err(|e| RootFinderError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = RootFinderError::io(
            PathBuf::from("/test/models.py"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, RootFinderError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/test/models.py")));
        assert!(err.to_string().contains("/test/models.py"));
    }

    #[test]
    fn test_timeout_error_message() {
        let err = RootFinderError::timeout("/corpus/models.py", 3);
        assert!(err.to_string().contains("3 attempts"));
        assert_eq!(err.path(), Some(&PathBuf::from("/corpus/models.py")));
    }

    #[test]
    fn test_config_error_has_no_path() {
        let err = RootFinderError::config("unknown convention 'protobuf'");
        assert!(err.path().is_none());
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let tagged = result.with_path("/missing/models.py");
        assert!(tagged.is_err());
    }
}
