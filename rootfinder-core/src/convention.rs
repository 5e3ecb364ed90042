//! Model-generation convention classification.
//!
//! A class is a "relevant model" (eligible for reference scanning) when it
//! carries the marker of the configured generation convention: the
//! `dataclasses.dataclass` decorator, a `pydantic.BaseModel` base class, or
//! the `attrs.s` decorator. Marker names are verified against the file's
//! import registry rather than taken at face value, so `@dc` after
//! `from dataclasses import dataclass as dc` matches while an unrelated
//! local `dataclass` helper does not.

use std::str::FromStr;

use crate::error::RootFinderError;
use crate::ident::Identifier;
use crate::imports::ImportRegistry;

/// The three recognized model-generation styles.
///
/// Exactly one is active per analysis run; each variant implements the same
/// matching contract over a class's decorators and bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Convention {
    /// Plain dataclass output (`@dataclass`).
    #[default]
    Dataclass,
    /// Validating base-model output (`class Foo(BaseModel)`).
    Pydantic,
    /// Attribute-registry output (`@attr.s` / `@attrs.s`).
    Attrs,
}

impl Convention {
    /// Canonical dotted origin of this convention's marker.
    pub fn canonical_origin(&self) -> Identifier {
        match self {
            Self::Dataclass => Identifier::qualified("dataclasses", "dataclass"),
            Self::Pydantic => Identifier::qualified("pydantic", "BaseModel"),
            Self::Attrs => Identifier::qualified("attrs", "s"),
        }
    }

    /// The selector string accepted in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dataclass => "dataclass",
            Self::Pydantic => "pydantic",
            Self::Attrs => "attrs",
        }
    }

    /// Does a class with these decorators and direct bases match?
    ///
    /// Dataclass and attrs inspect the decorator list; pydantic inspects the
    /// base-class list. A marker matches when its registry-expanded dotted
    /// path equals the canonical origin, with a wildcard-import fallback for
    /// unqualified markers brought in by `from <origin module> import *`.
    pub fn matches(
        &self,
        decorators: &[Identifier],
        bases: &[Identifier],
        registry: &ImportRegistry,
    ) -> bool {
        let markers = match self {
            Self::Dataclass | Self::Attrs => decorators,
            Self::Pydantic => bases,
        };
        let canonical = self.canonical_origin();
        markers
            .iter()
            .any(|marker| marker_matches(marker, &canonical, registry))
    }
}

fn marker_matches(
    marker: &Identifier,
    canonical: &Identifier,
    registry: &ImportRegistry,
) -> bool {
    if let Some(expanded) = registry.expand(marker) {
        return expanded == *canonical;
    }

    // Wildcard fallback: an unqualified marker matching the canonical leaf
    // is accepted when the canonical module was imported via `import *`.
    marker.qualifier.is_none()
        && marker.leaf == canonical.leaf
        && canonical
            .qualifier
            .as_deref()
            .is_some_and(|module| registry.has_wildcard(module))
}

impl FromStr for Convention {
    type Err = RootFinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dataclass" => Ok(Self::Dataclass),
            "pydantic" => Ok(Self::Pydantic),
            "attrs" => Ok(Self::Attrs),
            other => Err(RootFinderError::config(format!(
                "unknown convention '{other}': expected one of 'dataclass', 'pydantic', 'attrs'"
            ))),
        }
    }
}

impl std::fmt::Display for Convention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
