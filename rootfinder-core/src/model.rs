//! Core data model: class definitions and reference identities.

use serde::Serialize;
use std::path::PathBuf;

/// A top-level class definition found in an analyzed source file.
///
/// Two `RootModel`s sharing a name are distinct entities unless all four
/// fields match. Instances are immutable once created and carry the source
/// span of the `class` statement (1-indexed, decorators excluded).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RootModel {
    /// File the class was defined in; `None` for literal source text.
    pub file: Option<PathBuf>,
    /// Class name.
    pub name: String,
    /// First line of the `class` statement.
    pub start_line: usize,
    /// Last line of the class body.
    pub end_line: usize,
}

impl RootModel {
    pub fn new(
        file: Option<PathBuf>,
        name: impl Into<String>,
        start_line: usize,
        end_line: usize,
    ) -> Self {
        Self {
            file,
            name: name.into(),
            start_line,
            end_line,
        }
    }

    /// The identity used to test whether this definition is referenced.
    ///
    /// Drops the line span: a class is "the same" for reference purposes
    /// whenever file and name agree.
    pub fn key(&self) -> ReferenceKey {
        ReferenceKey {
            file: self.file.clone(),
            name: self.name.clone(),
        }
    }
}

impl std::fmt::Display for RootModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(
                f,
                "{} ({}:{}-{})",
                self.name,
                file.display(),
                self.start_line,
                self.end_line
            ),
            None => write!(f, "{} ({}-{})", self.name, self.start_line, self.end_line),
        }
    }
}

/// The `(defining file, name)` identity of a referenced class.
///
/// A reference resolved through the import subsystem carries the file that
/// actually declares the class; an unresolved reference falls back to the
/// file it was seen in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ReferenceKey {
    pub file: Option<PathBuf>,
    pub name: String,
}

impl ReferenceKey {
    pub fn new(file: Option<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            file,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_drops_line_span() {
        let a = RootModel::new(Some(PathBuf::from("/m.py")), "Catalog", 10, 20);
        let b = RootModel::new(Some(PathBuf::from("/m.py")), "Catalog", 30, 44);
        assert_ne!(a, b);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_distinct_files_distinct_keys() {
        let a = RootModel::new(Some(PathBuf::from("/one.py")), "Widget", 1, 5);
        let b = RootModel::new(Some(PathBuf::from("/two.py")), "Widget", 1, 5);
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_set_deduplication() {
        let mut defs = HashSet::new();
        defs.insert(RootModel::new(None, "Order", 3, 9));
        defs.insert(RootModel::new(None, "Order", 3, 9));
        assert_eq!(defs.len(), 1);
    }

    #[test]
    fn test_display_with_file() {
        let model = RootModel::new(Some(PathBuf::from("/corpus/m.py")), "Catalog", 119, 135);
        let shown = model.to_string();
        assert!(shown.contains("Catalog"));
        assert!(shown.contains("119-135"));
    }
}
