//! Per-file import registry.
//!
//! Built while visiting a file's import statements in textual order, then
//! read-only. Maps local aliases to the module paths they were imported
//! from, and records wildcard-imported modules separately (they bind names
//! without an alias).

use crate::ident::Identifier;
use std::collections::{HashMap, HashSet};

/// Alias table and wildcard set for a single source file.
#[derive(Debug, Clone, Default)]
pub struct ImportRegistry {
    aliases: HashMap<String, Identifier>,
    wildcard_modules: HashSet<String>,
}

impl ImportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias` as bound to `identifier`.
    ///
    /// Covers `import pkg.sub` (alias `"pkg.sub"`), `import pkg as p`
    /// (alias `"p"`), and `from pkg import Name [as n]` (alias `"Name"` or
    /// `"n"` bound to `pkg.Name`).
    pub fn add_import(&mut self, alias: impl Into<String>, identifier: Identifier) {
        self.aliases.insert(alias.into(), identifier);
    }

    /// Record a `from module import *` statement.
    pub fn add_wildcard(&mut self, module: &Identifier) {
        self.wildcard_modules.insert(module.dotted());
    }

    /// Look up the identifier bound to an exact alias.
    pub fn get(&self, alias: &str) -> Option<&Identifier> {
        self.aliases.get(alias)
    }

    /// Wildcard-imported module paths, in no particular order.
    pub fn wildcard_modules(&self) -> impl Iterator<Item = &str> {
        self.wildcard_modules.iter().map(|s| s.as_str())
    }

    pub fn has_wildcard(&self, module: &str) -> bool {
        self.wildcard_modules.contains(module)
    }

    /// Find the registered alias that encloses `target`.
    ///
    /// Tests successively shorter dotted prefixes of the target, most
    /// specific first, so a reference to `pkg.sub.Type` resolves through an
    /// import of `pkg.sub` even if `Type` was never separately imported.
    pub fn find_enclosing_import(&self, target: &Identifier) -> Option<&str> {
        let parts = target.parts();
        for end in (1..=parts.len()).rev() {
            let prefix = parts[..end].join(".");
            if let Some((alias, _)) = self.aliases.get_key_value(&prefix) {
                return Some(alias.as_str());
            }
        }
        None
    }

    /// Rewrite `target` through its enclosing import, if one is registered.
    ///
    /// The matched alias prefix is replaced by the imported module path and
    /// the remaining segments are re-appended: with `from pkg import sub`,
    /// `sub.Type` expands to `pkg.sub.Type`.
    pub fn expand(&self, target: &Identifier) -> Option<Identifier> {
        let alias = self.find_enclosing_import(target)?;
        let imported = &self.aliases[alias];
        let alias_len = alias.split('.').count();
        let parts = target.parts();
        let remainder = &parts[alias_len..];
        Some(imported.join(remainder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_alias_lookup() {
        let mut registry = ImportRegistry::new();
        registry.add_import("dc", Identifier::qualified("dataclasses", "dataclass"));
        assert_eq!(
            registry.get("dc"),
            Some(&Identifier::qualified("dataclasses", "dataclass"))
        );
        assert!(registry.get("dataclass").is_none());
    }

    #[test]
    fn test_enclosing_import_prefers_longest_prefix() {
        let mut registry = ImportRegistry::new();
        registry.add_import("pkg", Identifier::new("pkg"));
        registry.add_import("pkg.sub", Identifier::qualified("pkg", "sub"));

        let target = Identifier::qualified("pkg.sub", "Type");
        assert_eq!(registry.find_enclosing_import(&target), Some("pkg.sub"));
    }

    #[test]
    fn test_enclosing_import_falls_back_to_shorter_prefix() {
        let mut registry = ImportRegistry::new();
        registry.add_import("pkg", Identifier::new("pkg"));

        let target = Identifier::qualified("pkg.sub", "Type");
        assert_eq!(registry.find_enclosing_import(&target), Some("pkg"));
        assert!(registry
            .find_enclosing_import(&Identifier::new("Unrelated"))
            .is_none());
    }

    #[test]
    fn test_expand_from_import() {
        let mut registry = ImportRegistry::new();
        registry.add_import("Item", Identifier::qualified("models_one", "Item"));

        let expanded = registry.expand(&Identifier::new("Item")).unwrap();
        assert_eq!(expanded.dotted(), "models_one.Item");
    }

    #[test]
    fn test_expand_through_renamed_module() {
        let mut registry = ImportRegistry::new();
        registry.add_import("dt", Identifier::qualified("xsdata.models", "datatype"));

        let expanded = registry
            .expand(&Identifier::qualified("dt", "XmlDateTime"))
            .unwrap();
        assert_eq!(expanded.dotted(), "xsdata.models.datatype.XmlDateTime");
    }

    #[test]
    fn test_wildcards_tracked_separately() {
        let mut registry = ImportRegistry::new();
        registry.add_wildcard(&Identifier::new("dataclasses"));

        assert!(registry.has_wildcard("dataclasses"));
        assert!(registry.expand(&Identifier::new("dataclass")).is_none());
        assert_eq!(registry.wildcard_modules().count(), 1);
    }
}
