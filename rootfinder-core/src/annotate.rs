//! Type-annotation decomposition.
//!
//! Recursively takes a field annotation apart into the identifiers it
//! references: simple names, qualified names, quoted forward references,
//! and subscripted/generic types to unbounded depth (nested containers,
//! unions, PEP-604 `A | B`). Container heads (`List`, `Dict`, `Optional`)
//! are not themselves references; only the type arguments are.
//!
//! The grammar exposes annotations in two shapes depending on context
//! (`generic_type`/`union_type`/`member_type` inside `type` nodes, plain
//! `subscript`/`binary_operator`/`attribute` expressions elsewhere); both
//! are handled uniformly.

use tree_sitter::Node;

use crate::ident::Identifier;

/// Extract every referenced identifier from an annotation node.
pub fn extract_annotation_refs(node: Node, source: &str) -> Vec<Identifier> {
    let mut found = Vec::new();
    collect(node, source, &mut found);
    found
}

fn collect(node: Node, source: &str, found: &mut Vec<Identifier>) {
    match node.kind() {
        "identifier" => {
            found.push(Identifier::new(node_text(node, source)));
        }
        "attribute" | "member_type" => {
            if let Some(ident) = dotted_identifier(node, source) {
                found.push(ident);
            }
        }
        "string" => {
            // Forward reference under TYPE_CHECKING: strip the quotes; the
            // content may itself be dotted ("models.Item").
            let stripped = node_text(node, source)
                .trim_matches(|c| c == '"' || c == '\'')
                .to_string();
            if !stripped.is_empty() {
                found.push(Identifier::from_dotted(&stripped));
            }
        }
        "subscript" => {
            // Recurse into the type arguments only, skipping the container.
            let mut cursor = node.walk();
            for argument in node.children_by_field_name("subscript", &mut cursor) {
                collect(argument, source, found);
            }
        }
        "generic_type" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if child.kind() == "type_parameter" {
                    collect(child, source, found);
                }
            }
        }
        "binary_operator" => {
            // PEP-604 union: X | Y.
            if let Some(left) = node.child_by_field_name("left") {
                collect(left, source, found);
            }
            if let Some(right) = node.child_by_field_name("right") {
                collect(right, source, found);
            }
        }
        "none" | "ellipsis" | "integer" | "comment" => {}
        // type / type_parameter / union_type wrappers, tuples, lists, and
        // parenthesized annotations: descend into every named child.
        _ => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect(child, source, found);
            }
        }
    }
}

/// Read a dotted path out of an identifier/attribute/call node.
///
/// Used for annotations, decorators, base classes, and import targets.
/// Calls yield their callee (`@attr.s(auto_attribs=True)` is `attr.s`).
pub(crate) fn dotted_identifier(node: Node, source: &str) -> Option<Identifier> {
    let mut segments: Vec<String> = Vec::new();
    if push_segments(node, source, &mut segments) && !segments.is_empty() {
        Some(Identifier::from_parts(&segments))
    } else {
        None
    }
}

fn push_segments(node: Node, source: &str, segments: &mut Vec<String>) -> bool {
    match node.kind() {
        "identifier" | "dotted_name" => {
            for part in node_text(node, source).split('.') {
                segments.push(part.to_string());
            }
            true
        }
        "attribute" => {
            let object = match node.child_by_field_name("object") {
                Some(object) => object,
                None => return false,
            };
            if !push_segments(object, source, segments) {
                return false;
            }
            match node.child_by_field_name("attribute") {
                Some(attr) => {
                    segments.push(node_text(attr, source));
                    true
                }
                None => false,
            }
        }
        "member_type" => {
            let mut cursor = node.walk();
            let children: Vec<Node> = node.named_children(&mut cursor).collect();
            match children.as_slice() {
                [inner, leaf] => {
                    push_segments(*inner, source, segments)
                        && push_segments(*leaf, source, segments)
                }
                _ => false,
            }
        }
        "call" => match node.child_by_field_name("function") {
            Some(function) => push_segments(function, source, segments),
            None => false,
        },
        // `type` wrapper around the real node.
        "type" => match node.named_child(0) {
            Some(inner) => push_segments(inner, source, segments),
            None => false,
        },
        _ => false,
    }
}

pub(crate) fn node_text(node: Node, source: &str) -> String {
    node.utf8_text(source.as_bytes()).unwrap_or_default().to_string()
}
