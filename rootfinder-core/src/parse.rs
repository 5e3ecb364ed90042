//! Python source loading and syntax-tree construction.
//!
//! The syntax tree itself comes from tree-sitter with the Python grammar;
//! this module owns parser setup, the source-vs-path disambiguation of the
//! public entry points, and the file-size guard.

use std::path::{Path, PathBuf};

use crate::error::{IoResultExt, RootFinderError, RootFinderResult};

/// Maximum file size to parse (10 MB).
/// Larger files are rejected to prevent pathological memory use.
const MAX_FILE_SIZE: usize = 10_000_000;

/// A unit of Python input: literal source text, or a path to read.
#[derive(Debug, Clone)]
pub enum PySource {
    /// Literal source code with no backing file.
    Text(String),
    /// Path to a `.py` file.
    Path(PathBuf),
}

impl PySource {
    /// Disambiguate a string argument the way the public API documents it:
    /// an existing file path is read as a file, anything else is treated as
    /// literal source (a missing-but-path-looking string is caught later by
    /// [`load`](PySource::load)).
    pub fn detect(s: &str) -> Self {
        if Path::new(s).is_file() {
            Self::Path(PathBuf::from(s))
        } else {
            Self::Text(s.to_string())
        }
    }

    /// Read the source content, returning `(content, defining_file)`.
    ///
    /// The defining file is canonicalized so reference keys built from
    /// resolver output compare equal to definition keys; it is `None` for
    /// literal text. A single-line `.py`-suffixed string that is not an
    /// existing file is rejected as a dangling path rather than silently
    /// parsed as source.
    pub fn load(&self) -> RootFinderResult<(String, Option<PathBuf>)> {
        match self {
            Self::Path(path) => {
                if !path.is_file() {
                    return Err(RootFinderError::not_found(path));
                }
                let content = std::fs::read_to_string(path).with_path(path)?;
                if content.len() > MAX_FILE_SIZE {
                    return Err(RootFinderError::parse(
                        path,
                        format!("file too large ({} bytes, max {})", content.len(), MAX_FILE_SIZE),
                    ));
                }
                let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
                Ok((content, Some(canonical)))
            }
            Self::Text(text) => {
                if looks_like_dangling_path(text) {
                    return Err(RootFinderError::not_found(text));
                }
                Ok((text.clone(), None))
            }
        }
    }
}

impl From<PathBuf> for PySource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for PySource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for PySource {
    fn from(s: &str) -> Self {
        Self::detect(s)
    }
}

/// A string that names a `.py` file (single line, no statements) but does
/// not exist should be reported as not-found, not parsed as code.
fn looks_like_dangling_path(text: &str) -> bool {
    !text.contains('\n') && !text.contains(' ') && text.trim_end().ends_with(".py")
}

/// Parse Python source into a tree-sitter syntax tree.
///
/// `path` is used only to tag parse errors with the offending file.
pub fn parse_python(content: &str, path: Option<&Path>) -> RootFinderResult<tree_sitter::Tree> {
    let error_path = || path.map(Path::to_path_buf).unwrap_or_else(|| "<source>".into());

    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| RootFinderError::parse(error_path(), format!("grammar error: {e}")))?;

    let tree = parser
        .parse(content.as_bytes(), None)
        .ok_or_else(|| RootFinderError::parse(error_path(), "parser produced no tree"))?;

    if tree.root_node().has_error() {
        return Err(RootFinderError::parse(error_path(), "invalid Python syntax"));
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir()
            .join("rootfinder_parse_test")
            .join(format!("{}_{}", name, id));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_valid_source() {
        let tree = parse_python("class Foo:\n    pass\n", None).unwrap();
        assert_eq!(tree.root_node().kind(), "module");
    }

    #[test]
    fn test_parse_invalid_source() {
        let result = parse_python("class (:\n", None);
        assert!(matches!(result, Err(RootFinderError::Parse { .. })));
    }

    #[test]
    fn test_detect_literal_text() {
        let source = PySource::detect("class Foo:\n    pass\n");
        assert!(matches!(source, PySource::Text(_)));
    }

    #[test]
    fn test_detect_existing_file() {
        let dir = create_temp_dir("detect");
        let file = dir.join("models.py");
        fs::write(&file, "class Foo:\n    pass\n").unwrap();

        let source = PySource::detect(file.to_str().unwrap());
        assert!(matches!(source, PySource::Path(_)));
        let (content, defining) = source.load().unwrap();
        assert!(content.contains("class Foo"));
        assert_eq!(defining, Some(file.canonicalize().unwrap()));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_path_is_not_found() {
        let source = PySource::Path(PathBuf::from("/nonexistent/models.py"));
        assert!(matches!(source.load(), Err(RootFinderError::NotFound { .. })));
    }

    #[test]
    fn test_dangling_path_string_is_not_found() {
        let source = PySource::detect("missing_models.py");
        assert!(matches!(source.load(), Err(RootFinderError::NotFound { .. })));
    }

    #[test]
    fn test_literal_text_has_no_defining_file() {
        let source = PySource::Text("x = 1\n".to_string());
        let (_, defining) = source.load().unwrap();
        assert!(defining.is_none());
    }
}
