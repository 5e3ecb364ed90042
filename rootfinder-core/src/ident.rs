//! Dotted-path identifier value type.
//!
//! An [`Identifier`] represents a Python dotted path such as
//! `xsdata.models.datatype.XmlDateTime`, split into its final segment
//! (`leaf`) and the optional dotted prefix (`qualifier`). Identifiers are
//! immutable and structurally compared; they are the common currency between
//! the import registry, the convention classifier, and the module resolver.

/// A dotted module/attribute path: `qualifier.leaf` or a bare `leaf`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// Final segment of the dotted path (a class, function, or module name).
    pub leaf: String,
    /// Dotted prefix, if any (e.g. `xsdata.models` for `xsdata.models.Foo`).
    pub qualifier: Option<String>,
}

impl Identifier {
    /// Create an identifier from a bare name.
    pub fn new(leaf: impl Into<String>) -> Self {
        Self {
            leaf: leaf.into(),
            qualifier: None,
        }
    }

    /// Create an identifier with an explicit qualifier.
    pub fn qualified(qualifier: impl Into<String>, leaf: impl Into<String>) -> Self {
        Self {
            leaf: leaf.into(),
            qualifier: Some(qualifier.into()),
        }
    }

    /// Build an identifier from ordered path segments.
    ///
    /// The last segment becomes the leaf, everything before it the qualifier.
    /// Empty input yields an identifier with an empty leaf; callers are
    /// expected to pass at least one segment.
    pub fn from_parts(parts: &[String]) -> Self {
        match parts {
            [] => Self::new(""),
            [single] => Self::new(single.clone()),
            [init @ .., last] => Self::qualified(init.join("."), last.clone()),
        }
    }

    /// Parse a dotted string (`a.b.c`) into an identifier.
    pub fn from_dotted(dotted: &str) -> Self {
        match dotted.rsplit_once('.') {
            Some((qualifier, leaf)) => Self::qualified(qualifier, leaf),
            None => Self::new(dotted),
        }
    }

    /// All path segments, qualifier first, leaf last.
    pub fn parts(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self
            .qualifier
            .as_deref()
            .map(|q| q.split('.').collect())
            .unwrap_or_default();
        out.push(&self.leaf);
        out
    }

    /// Qualifier segments only (empty when the identifier is a bare name).
    pub fn qualifier_parts(&self) -> Vec<&str> {
        self.qualifier
            .as_deref()
            .map(|q| q.split('.').collect())
            .unwrap_or_default()
    }

    /// The full dotted form: `qualifier.leaf`, or just `leaf`.
    pub fn dotted(&self) -> String {
        match &self.qualifier {
            Some(q) => format!("{}.{}", q, self.leaf),
            None => self.leaf.clone(),
        }
    }

    /// First segment of the dotted path (the top-level module name).
    pub fn root(&self) -> &str {
        self.qualifier
            .as_deref()
            .and_then(|q| q.split('.').next())
            .unwrap_or(&self.leaf)
    }

    /// Append further segments, producing a longer identifier.
    pub fn join(&self, segments: &[&str]) -> Identifier {
        let mut parts: Vec<String> = self.parts().iter().map(|s| s.to_string()).collect();
        parts.extend(segments.iter().map(|s| s.to_string()));
        Identifier::from_parts(&parts)
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dotted())
    }
}
