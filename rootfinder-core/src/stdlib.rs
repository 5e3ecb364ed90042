//! Python standard-library exclusion tables.
//!
//! Standard-library types cannot be generated models, so names that come
//! from the stdlib are excluded from the reference graph outright: never
//! resolved to a file, never recorded as a reference. Three tables cover the
//! signal sources: top-level stdlib module names (for qualified references
//! and import origins), builtin type names, and the `typing` vocabulary
//! (both appear unqualified in annotations).

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Top-level standard-library module names relevant to generated models.
///
/// Not an exhaustive mirror of `sys.stdlib_module_names`; it covers the
/// modules that plausibly appear in generated data-model code.
static STDLIB_MODULES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "__future__",
        "abc",
        "array",
        "base64",
        "binascii",
        "builtins",
        "collections",
        "copy",
        "dataclasses",
        "datetime",
        "decimal",
        "enum",
        "fractions",
        "functools",
        "hashlib",
        "io",
        "itertools",
        "json",
        "logging",
        "math",
        "numbers",
        "os",
        "pathlib",
        "pickle",
        "re",
        "string",
        "struct",
        "sys",
        "time",
        "types",
        "typing",
        "uuid",
        "warnings",
        "weakref",
        "xml",
        "zoneinfo",
    ]
    .into_iter()
    .collect()
});

/// Builtin names that appear as bare annotation leaves.
static BUILTIN_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bool",
        "bytearray",
        "bytes",
        "complex",
        "dict",
        "float",
        "frozenset",
        "int",
        "list",
        "memoryview",
        "None",
        "object",
        "set",
        "str",
        "tuple",
        "type",
    ]
    .into_iter()
    .collect()
});

/// `typing` vocabulary commonly emitted by model generators.
static TYPING_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "Annotated",
        "Any",
        "AnyStr",
        "Awaitable",
        "Callable",
        "ClassVar",
        "Coroutine",
        "DefaultDict",
        "Deque",
        "Dict",
        "Final",
        "FrozenSet",
        "Generator",
        "Generic",
        "Hashable",
        "Iterable",
        "Iterator",
        "List",
        "Literal",
        "Mapping",
        "MutableMapping",
        "MutableSequence",
        "MutableSet",
        "NamedTuple",
        "NoReturn",
        "Optional",
        "OrderedDict",
        "Protocol",
        "Self",
        "Sequence",
        "Set",
        "Text",
        "Tuple",
        "Type",
        "TypedDict",
        "Union",
    ]
    .into_iter()
    .collect()
});

/// Is `module` (a top-level dotted-path root) part of the stdlib?
pub fn is_stdlib_module(module: &str) -> bool {
    STDLIB_MODULES.contains(module)
}

/// Is `name` a builtin or `typing` type that carries no model signal?
pub fn is_stdlib_name(name: &str) -> bool {
    BUILTIN_NAMES.contains(name) || TYPING_NAMES.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdlib_modules() {
        assert!(is_stdlib_module("typing"));
        assert!(is_stdlib_module("dataclasses"));
        assert!(is_stdlib_module("enum"));
        assert!(!is_stdlib_module("xsdata"));
        assert!(!is_stdlib_module("pydantic"));
    }

    #[test]
    fn test_stdlib_names() {
        assert!(is_stdlib_name("str"));
        assert!(is_stdlib_name("Optional"));
        assert!(is_stdlib_name("List"));
        assert!(!is_stdlib_name("XmlDateTime"));
        assert!(!is_stdlib_name("Product"));
    }
}
