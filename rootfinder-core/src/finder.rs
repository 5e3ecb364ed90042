//! Root selection: definitions minus consumed references.

use std::collections::HashSet;

use crate::model::{ReferenceKey, RootModel};

/// Select the root models from the merged definitions and references.
///
/// A top-level class is a root when its identity key never appears in the
/// reference set. Results are ordered by defining file then class name so
/// repeated runs over the same input produce identical output. Returns
/// `None` when nothing qualifies, distinguishing "no roots" from an empty
/// collection a caller might otherwise extend.
pub fn find_roots(
    defined: HashSet<RootModel>,
    referenced: &HashSet<ReferenceKey>,
) -> Option<Vec<RootModel>> {
    let mut roots: Vec<RootModel> = defined
        .into_iter()
        .filter(|model| !referenced.contains(&model.key()))
        .collect();
    if roots.is_empty() {
        return None;
    }
    roots.sort_by(|a, b| a.file.cmp(&b.file).then_with(|| a.name.cmp(&b.name)));
    Some(roots)
}
