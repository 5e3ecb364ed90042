//! Single-file syntax-tree visitor.
//!
//! Walks one parsed module in source order, maintaining an explicit stack of
//! enclosing classes. Produces the file's top-level class definitions, the
//! reference keys harvested from relevant-model field annotations and from
//! base classes, and the file's import registry.
//!
//! Imports must textually precede their use for aliases to be visible to
//! later annotations in the same file; generated corpora satisfy this.

use std::collections::HashSet;
use std::path::Path;

use tree_sitter::Node;

use crate::annotate::{dotted_identifier, extract_annotation_refs, node_text};
use crate::convention::Convention;
use crate::error::RootFinderResult;
use crate::ident::Identifier;
use crate::imports::ImportRegistry;
use crate::model::{ReferenceKey, RootModel};
use crate::parse::parse_python;
use crate::resolve::reference_key;

/// Accumulated output of visiting one file.
#[derive(Debug, Default)]
pub struct FileVisit {
    /// Every class defined at module top level.
    pub defined: HashSet<RootModel>,
    /// Every reference harvested from relevant-model fields and bases.
    pub referenced: HashSet<ReferenceKey>,
    /// The file's alias and wildcard tables (read-only after the visit).
    pub registry: ImportRegistry,
}

impl FileVisit {
    /// Merge another file's results into this accumulation.
    ///
    /// Set union: commutative and idempotent, so merge order (and task
    /// completion order under a worker pool) cannot affect the outcome.
    /// The per-file registry is not merged; it has no cross-file meaning.
    pub fn absorb(&mut self, other: FileVisit) {
        self.defined.extend(other.defined);
        self.referenced.extend(other.referenced);
    }
}

/// Parse and visit one unit of Python source.
///
/// `file` is the canonicalized defining file, or `None` for literal text.
pub fn visit_source(
    content: &str,
    file: Option<&Path>,
    convention: Convention,
) -> RootFinderResult<FileVisit> {
    let tree = parse_python(content, file)?;
    let mut visitor = Visitor {
        source: content,
        file,
        convention,
        registry: ImportRegistry::new(),
        class_stack: Vec::new(),
        defined: HashSet::new(),
        referenced: HashSet::new(),
    };
    visitor.walk(tree.root_node());
    Ok(FileVisit {
        defined: visitor.defined,
        referenced: visitor.referenced,
        registry: visitor.registry,
    })
}

struct Visitor<'a> {
    source: &'a str,
    file: Option<&'a Path>,
    convention: Convention,
    registry: ImportRegistry,
    /// One entry per enclosing class; the flag records whether that class
    /// satisfies the active convention (computed once on entry).
    class_stack: Vec<bool>,
    defined: HashSet<RootModel>,
    referenced: HashSet<ReferenceKey>,
}

impl Visitor<'_> {
    fn walk(&mut self, node: Node) {
        match node.kind() {
            "import_statement" => self.visit_import(node),
            "import_from_statement" => self.visit_import_from(node),
            "future_import_statement" => {}
            "decorated_definition" => self.visit_decorated(node),
            "class_definition" => self.visit_class(node, Vec::new()),
            "assignment" => {
                if let Some(type_node) = node.child_by_field_name("type") {
                    // Field annotations carry a reference signal only when
                    // the innermost class is a relevant model.
                    if self.class_stack.last() == Some(&true) {
                        for ident in extract_annotation_refs(type_node, self.source) {
                            self.add_reference(&ident);
                        }
                    }
                }
            }
            _ => {
                let mut cursor = node.walk();
                let children: Vec<Node> = node.named_children(&mut cursor).collect();
                for child in children {
                    self.walk(child);
                }
            }
        }
    }

    /// `import a.b` / `import a.b as m`: the full dotted path (or the alias)
    /// binds the module.
    fn visit_import(&mut self, node: Node) {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            match child.kind() {
                "dotted_name" => {
                    let dotted = node_text(child, self.source);
                    self.registry
                        .add_import(dotted.clone(), Identifier::from_dotted(&dotted));
                }
                "aliased_import" => {
                    if let (Some(name), Some(alias)) = (
                        child.child_by_field_name("name"),
                        child.child_by_field_name("alias"),
                    ) {
                        let dotted = node_text(name, self.source);
                        self.registry.add_import(
                            node_text(alias, self.source),
                            Identifier::from_dotted(&dotted),
                        );
                    }
                }
                _ => {}
            }
        }
    }

    /// `from pkg.mod import Name [as n], ...` / `from pkg import *`.
    ///
    /// Relative imports lose their leading dots here; the path-based
    /// resolver heuristics recover the file (same-directory rule first).
    fn visit_import_from(&mut self, node: Node) {
        let module = node
            .child_by_field_name("module_name")
            .and_then(|module_node| match module_node.kind() {
                "dotted_name" => Some(node_text(module_node, self.source)),
                "relative_import" => {
                    let mut cursor = module_node.walk();
                    let dotted = module_node
                        .named_children(&mut cursor)
                        .find(|child| child.kind() == "dotted_name")
                        .map(|dotted| node_text(dotted, self.source));
                    dotted
                }
                _ => None,
            })
            .filter(|text| !text.is_empty());

        let mut cursor = node.walk();
        let has_wildcard = node
            .named_children(&mut cursor)
            .any(|child| child.kind() == "wildcard_import");
        if has_wildcard {
            if let Some(module) = module {
                self.registry.add_wildcard(&Identifier::from_dotted(&module));
            }
            return;
        }

        let mut cursor = node.walk();
        let names: Vec<Node> = node.children_by_field_name("name", &mut cursor).collect();
        for name_node in names {
            let (imported, alias) = match name_node.kind() {
                "aliased_import" => {
                    match (
                        name_node.child_by_field_name("name"),
                        name_node.child_by_field_name("alias"),
                    ) {
                        (Some(name), Some(alias)) => (
                            node_text(name, self.source),
                            node_text(alias, self.source),
                        ),
                        _ => continue,
                    }
                }
                "dotted_name" => {
                    let text = node_text(name_node, self.source);
                    (text.clone(), text)
                }
                _ => continue,
            };
            let identifier = match &module {
                Some(module) => Identifier::from_dotted(module)
                    .join(&imported.split('.').collect::<Vec<_>>()),
                None => Identifier::from_dotted(&imported),
            };
            self.registry.add_import(alias, identifier);
        }
    }

    fn visit_decorated(&mut self, node: Node) {
        let mut cursor = node.walk();
        let decorators: Vec<Identifier> = node
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "decorator")
            .filter_map(|decorator| {
                decorator
                    .named_child(0)
                    .and_then(|expr| dotted_identifier(expr, self.source))
            })
            .collect();

        if let Some(definition) = node.child_by_field_name("definition") {
            if definition.kind() == "class_definition" {
                self.visit_class(definition, decorators);
            } else {
                self.walk(definition);
            }
        }
    }

    fn visit_class(&mut self, node: Node, decorators: Vec<Identifier>) {
        let name = node
            .child_by_field_name("name")
            .map(|n| node_text(n, self.source))
            .unwrap_or_default();
        let bases = self.base_classes(node);

        if self.class_stack.is_empty() {
            // Span of the `class` statement itself, decorators excluded.
            let start_line = node.start_position().row + 1;
            let end_line = node.end_position().row + 1;
            self.defined.insert(RootModel::new(
                self.file.map(Path::to_path_buf),
                &name,
                start_line,
                end_line,
            ));

            // A base used for inheritance is a consumed reference: the base
            // must never itself be flagged a root.
            for base in &bases {
                self.add_reference(base);
            }
        }

        let is_relevant = self
            .convention
            .matches(&decorators, &bases, &self.registry);
        self.class_stack.push(is_relevant);
        if let Some(body) = node.child_by_field_name("body") {
            self.walk(body);
        }
        self.class_stack.pop();
    }

    fn base_classes(&self, node: Node) -> Vec<Identifier> {
        let Some(superclasses) = node.child_by_field_name("superclasses") else {
            return Vec::new();
        };
        let mut cursor = superclasses.walk();
        superclasses
            .named_children(&mut cursor)
            .filter(|child| child.kind() != "keyword_argument")
            .filter_map(|child| {
                // Generic[...] bases contribute their head.
                let target = if child.kind() == "subscript" {
                    child.child_by_field_name("value")?
                } else {
                    child
                };
                dotted_identifier(target, self.source)
            })
            .collect()
    }

    fn add_reference(&mut self, identifier: &Identifier) {
        if let Some(key) = reference_key(identifier, &self.registry, self.file) {
            self.referenced.insert(key);
        }
    }
}
