//! rootfinder-core: root model detection library for generated Python code.
//!
//! Code generators that turn schemas (XSD, JSON Schema, protobuf) into Python
//! data models emit one class per schema type. Most of those classes exist
//! only to be nested inside others; a handful sit at the top of the
//! containment hierarchy and are the types callers actually instantiate.
//! This library finds that handful: the **root models** - top-level classes
//! never referenced as a field type or base class anywhere in the corpus.
//!
//! # Features
//!
//! - **Convention-aware**: dataclass, pydantic, and attrs model styles
//! - **Import tracking**: aliases, `from` imports, and wildcard imports
//! - **Cross-file resolution**: references keyed to their defining file
//! - **Parallel analysis**: Rayon worker pool with per-file timeout and retry
//! - **Deterministic output**: results ordered by file then class name
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use rootfinder_core::prelude::*;
//!
//! let roots = RootFinder::new("generated/models")
//!     .convention(Convention::Dataclass)
//!     .analyze()?;
//!
//! for root in roots.unwrap_or_default() {
//!     println!("Root model: {root}");
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`parse`]: source loading and syntax-tree construction
//! - [`visit`]: per-file syntax-tree walk (definitions, references, imports)
//! - [`annotate`]: reference extraction from type annotations
//! - [`imports`]: per-file alias and wildcard tables
//! - [`resolve`]: identifier-to-file resolution with verification
//! - [`finder`]: root selection over the merged corpus
//! - [`run`]: orchestration, worker pool, timeout and retry
//! - [`builder`]: fluent builder API for configuration
//! - [`error`]: typed error handling

pub mod annotate;
pub mod builder;
pub mod config;
pub mod convention;
pub mod error;
pub mod finder;
pub mod ident;
pub mod imports;
pub mod logging;
pub mod model;
pub mod parse;
pub mod prelude;
pub mod report;
pub mod resolve;
pub mod run;
pub mod scan;
pub mod stdlib;
pub mod visit;

pub use error::{IoResultExt, RootFinderError, RootFinderResult};

pub use builder::RootFinder;

pub use config::{load_config, OutputConfig, ParallelConfig, RootFinderConfig, ScanConfig};

pub use convention::Convention;

pub use finder::find_roots;

pub use ident::Identifier;

pub use imports::ImportRegistry;

pub use logging::init_structured_logging;

pub use model::{ReferenceKey, RootModel};

pub use parse::{parse_python, PySource};

pub use report::{print_json, print_plain};

pub use run::{analyze, analyze_paths, analyze_source, ParallelSettings, MAX_ATTEMPTS};

pub use scan::{gather_py_files, ScanOptions};

pub use visit::{visit_source, FileVisit};
