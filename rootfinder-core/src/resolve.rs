//! Path-based module resolution with verified candidates.
//!
//! Maps a dotted import path back to the file that defines a referenced
//! class. Candidates are produced by layered heuristics and accepted only
//! when the candidate file actually declares a class of the referenced name;
//! resolution is verified, never assumed.
//!
//! Both the per-file declared-class tables and the resolution outcomes are
//! memoized in process-wide caches. The checks are pure functions of
//! immutable file content, so the caches are safe to keep for the process
//! lifetime; [`clear_caches`] invalidates them explicitly (e.g. between runs
//! over a mutated corpus, and between test fixtures).

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::ident::Identifier;
use crate::imports::ImportRegistry;
use crate::model::ReferenceKey;
use crate::stdlib::{is_stdlib_module, is_stdlib_name};

/// Matches top-level and nested `class Name` declarations.
static CLASS_DECL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*class[ \t]+([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// Per-file table of declared class names. `None` records a read failure so
/// unreadable candidates are not re-read on every probe.
static DECLARED_CLASSES: Lazy<RwLock<HashMap<PathBuf, Option<Arc<HashSet<String>>>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Memoized resolution outcomes keyed by `(dotted identifier, from_file)`.
static RESOLUTIONS: Lazy<RwLock<HashMap<(String, PathBuf), Option<PathBuf>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Drop all memoized resolution state.
pub fn clear_caches() {
    DECLARED_CLASSES.write().unwrap().clear();
    RESOLUTIONS.write().unwrap().clear();
}

/// The set of class names declared in `path`, memoized.
fn declared_classes(path: &Path) -> Option<Arc<HashSet<String>>> {
    if let Some(cached) = DECLARED_CLASSES.read().unwrap().get(path) {
        return cached.clone();
    }

    let table = std::fs::read_to_string(path).ok().map(|content| {
        let names: HashSet<String> = CLASS_DECL_RE
            .captures_iter(&content)
            .map(|cap| cap[1].to_string())
            .collect();
        Arc::new(names)
    });

    DECLARED_CLASSES
        .write()
        .unwrap()
        .insert(path.to_path_buf(), table.clone());
    table
}

/// Does `path` declare a class named `name`?
pub fn declares_class(path: &Path, name: &str) -> bool {
    declared_classes(path).is_some_and(|classes| classes.contains(name))
}

/// Resolve a referenced identifier to the file that defines its leaf class.
///
/// The identifier carries the full dotted path including the class leaf
/// (e.g. `models_one.Item`); the qualifier segments describe the module.
/// Candidates, in order:
///
/// 1. `from_file`'s directory, filename = last qualifier segment.
/// 2. `from_file`'s directory, all qualifier segments as a nested path.
/// 3. Common-ancestor splice: the first qualifier segment found as a literal
///    component of `from_file`'s path anchors the candidate there.
///
/// Each candidate is accepted only if it declares a class of the leaf name.
/// Standard-library identifiers never resolve.
pub fn resolve(identifier: &Identifier, from_file: &Path) -> Option<PathBuf> {
    if is_stdlib_module(identifier.root()) {
        return None;
    }

    let cache_key = (identifier.dotted(), from_file.to_path_buf());
    if let Some(cached) = RESOLUTIONS.read().unwrap().get(&cache_key) {
        return cached.clone();
    }

    let resolved = resolve_uncached(identifier, from_file);
    if resolved.is_none() {
        debug!(identifier = %identifier, from = %from_file.display(), "module resolution miss");
    }
    RESOLUTIONS
        .write()
        .unwrap()
        .insert(cache_key, resolved.clone());
    resolved
}

fn resolve_uncached(identifier: &Identifier, from_file: &Path) -> Option<PathBuf> {
    let qualifier = identifier.qualifier_parts();
    if qualifier.is_empty() {
        return None;
    }

    for candidate in candidate_paths(&qualifier, from_file) {
        if candidate.is_file() && declares_class(&candidate, &identifier.leaf) {
            let verified = candidate.canonicalize().unwrap_or(candidate);
            return Some(verified);
        }
    }
    None
}

fn candidate_paths(qualifier: &[&str], from_file: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    let dir = from_file.parent().unwrap_or_else(|| Path::new("."));

    // 1. Sibling module: from .models_one import Item -> <dir>/models_one.py
    if let Some(last) = qualifier.last() {
        candidates.push(dir.join(format!("{last}.py")));
    }

    // 2. Nested package path below the current directory.
    if qualifier.len() > 1 {
        let mut nested = dir.to_path_buf();
        for segment in qualifier {
            nested.push(segment);
        }
        nested.set_extension("py");
        candidates.push(nested);
    }

    // 3. Common-ancestor splice: anchor at the first qualifier segment that
    //    appears verbatim in from_file's own path.
    'outer: for (seg_idx, segment) in qualifier.iter().enumerate() {
        let components: Vec<Component> = from_file.components().collect();
        for (comp_idx, component) in components.iter().enumerate() {
            if component.as_os_str() == std::ffi::OsStr::new(segment) {
                let mut spliced: PathBuf = components[..=comp_idx].iter().collect();
                for rest in &qualifier[seg_idx + 1..] {
                    spliced.push(rest);
                }
                spliced.set_extension("py");
                candidates.push(spliced);
                break 'outer;
            }
        }
    }

    candidates
}

/// Build the reference key for an extracted annotation or base-class name.
///
/// Standard-library names are dropped outright (`None`). Otherwise the
/// identifier is expanded through the file's import registry (wildcard
/// modules tried when no alias matches) and resolved; on success the key
/// names the defining file, on any miss it falls back to the current file.
pub fn reference_key(
    identifier: &Identifier,
    registry: &ImportRegistry,
    current_file: Option<&Path>,
) -> Option<ReferenceKey> {
    if is_stdlib_name(&identifier.leaf) {
        return None;
    }

    if let Some(expanded) = registry.expand(identifier) {
        if is_stdlib_module(expanded.root()) {
            return None;
        }
        if let Some(file) = current_file {
            if let Some(defining) = resolve(&expanded, file) {
                return Some(ReferenceKey::new(Some(defining), &identifier.leaf));
            }
        }
    } else if is_stdlib_module(identifier.root()) {
        return None;
    } else if let Some(file) = current_file {
        // No alias matched: a wildcard import may still supply the module.
        for module in registry.wildcard_modules() {
            let candidate = Identifier::from_dotted(module).join(&[&identifier.leaf]);
            if let Some(defining) = resolve(&candidate, file) {
                return Some(ReferenceKey::new(Some(defining), &identifier.leaf));
            }
        }
    }

    // Resolution could not prove otherwise: assume "defined in this file".
    Some(ReferenceKey::new(
        current_file.map(Path::to_path_buf),
        &identifier.leaf,
    ))
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
            .join("rootfinder_resolve_test")
            .join(format!("{}_{}", name, id));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_declares_class() {
        let dir = create_temp_dir("declares");
        let file = dir.join("models.py");
        fs::write(&file, "class Item:\n    pass\n\nclass Order:\n    pass\n").unwrap();

        assert!(declares_class(&file, "Item"));
        assert!(declares_class(&file, "Order"));
        assert!(!declares_class(&file, "Missing"));
        assert!(!declares_class(&dir.join("absent.py"), "Item"));

        clear_caches();
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_resolve_sibling_module() {
        let dir = create_temp_dir("sibling");
        fs::write(dir.join("models_one.py"), "class Item:\n    pass\n").unwrap();
        let from_file = dir.join("models_two.py");
        fs::write(&from_file, "").unwrap();

        let ident = Identifier::qualified("models_one", "Item");
        let resolved = resolve(&ident, &from_file).unwrap();
        assert_eq!(
            resolved,
            dir.join("models_one.py").canonicalize().unwrap()
        );

        clear_caches();
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_resolve_requires_declared_class() {
        let dir = create_temp_dir("verified");
        // File exists but does not declare the class; resolution must fail.
        fs::write(dir.join("models_one.py"), "VALUE = 1\n").unwrap();
        let from_file = dir.join("models_two.py");
        fs::write(&from_file, "").unwrap();

        let ident = Identifier::qualified("models_one", "Item");
        assert!(resolve(&ident, &from_file).is_none());

        clear_caches();
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_resolve_nested_package_path() {
        let dir = create_temp_dir("nested");
        let pkg = dir.join("pkg").join("sub");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("models.py"), "class Widget:\n    pass\n").unwrap();
        let from_file = dir.join("consumer.py");
        fs::write(&from_file, "").unwrap();

        let ident = Identifier::qualified("pkg.sub.models", "Widget");
        let resolved = resolve(&ident, &from_file).unwrap();
        assert_eq!(
            resolved,
            pkg.join("models.py").canonicalize().unwrap()
        );

        clear_caches();
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_resolve_common_ancestor_splice() {
        let dir = create_temp_dir("splice");
        let pkg = dir.join("pkg");
        fs::create_dir_all(pkg.join("a")).unwrap();
        fs::create_dir_all(pkg.join("b")).unwrap();
        fs::write(pkg.join("b").join("models.py"), "class Thing:\n    pass\n").unwrap();
        let from_file = pkg.join("a").join("consumer.py");
        fs::write(&from_file, "").unwrap();

        // `pkg` appears as a literal component of from_file's path; the
        // sibling-package file is found by splicing at that anchor.
        let ident = Identifier::qualified("pkg.b.models", "Thing");
        let resolved = resolve(&ident, &from_file).unwrap();
        assert_eq!(
            resolved,
            pkg.join("b").join("models.py").canonicalize().unwrap()
        );

        clear_caches();
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_stdlib_never_resolves() {
        let dir = create_temp_dir("stdlib");
        let from_file = dir.join("models.py");
        fs::write(&from_file, "").unwrap();

        let ident = Identifier::qualified("typing", "Optional");
        assert!(resolve(&ident, &from_file).is_none());

        clear_caches();
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_reference_key_stdlib_dropped() {
        let registry = ImportRegistry::new();
        assert!(reference_key(&Identifier::new("str"), &registry, None).is_none());
        assert!(reference_key(&Identifier::new("Optional"), &registry, None).is_none());
    }

    #[test]
    fn test_reference_key_stdlib_import_dropped() {
        let mut registry = ImportRegistry::new();
        registry.add_import("XmlDate", Identifier::qualified("datetime", "XmlDate"));
        // Expanded origin module is stdlib, so the name carries no signal.
        assert!(reference_key(&Identifier::new("XmlDate"), &registry, None).is_none());
    }

    #[test]
    fn test_reference_key_fallback_same_file() {
        let registry = ImportRegistry::new();
        let current = PathBuf::from("/corpus/models.py");
        let key =
            reference_key(&Identifier::new("Product"), &registry, Some(&current)).unwrap();
        assert_eq!(key, ReferenceKey::new(Some(current), "Product"));
    }

    #[test]
    fn test_reference_key_resolves_cross_file() {
        let dir = create_temp_dir("crossfile");
        fs::write(dir.join("models_one.py"), "class Widget:\n    pass\n").unwrap();
        let current = dir.join("models_two.py");
        fs::write(&current, "").unwrap();

        let mut registry = ImportRegistry::new();
        registry.add_import("Widget", Identifier::qualified("models_one", "Widget"));

        let key =
            reference_key(&Identifier::new("Widget"), &registry, Some(&current)).unwrap();
        assert_eq!(
            key.file,
            Some(dir.join("models_one.py").canonicalize().unwrap())
        );
        assert_eq!(key.name, "Widget");

        clear_caches();
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_reference_key_wildcard_module() {
        let dir = create_temp_dir("wildcard");
        fs::write(dir.join("shared.py"), "class Token:\n    pass\n").unwrap();
        let current = dir.join("models.py");
        fs::write(&current, "").unwrap();

        let mut registry = ImportRegistry::new();
        registry.add_wildcard(&Identifier::new("shared"));

        let key = reference_key(&Identifier::new("Token"), &registry, Some(&current)).unwrap();
        assert_eq!(
            key.file,
            Some(dir.join("shared.py").canonicalize().unwrap())
        );

        clear_caches();
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_resolution_is_cached() {
        let dir = create_temp_dir("cached");
        fs::write(dir.join("models_one.py"), "class Item:\n    pass\n").unwrap();
        let from_file = dir.join("models_two.py");
        fs::write(&from_file, "").unwrap();

        let ident = Identifier::qualified("models_one", "Item");
        assert!(resolve(&ident, &from_file).is_some());

        // After explicit invalidation the removed file no longer resolves.
        fs::remove_file(dir.join("models_one.py")).unwrap();
        clear_caches();
        assert!(resolve(&ident, &from_file).is_none());
        fs::remove_dir_all(&dir).ok();
    }
}
