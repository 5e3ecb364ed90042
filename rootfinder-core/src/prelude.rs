//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use rootfinder_core::prelude::*;
//! ```
//!
//! This provides the most commonly needed types for root-model analysis
//! without polluting the namespace with rarely-used items.

// Core analysis types
pub use crate::error::{RootFinderError, RootFinderResult};
pub use crate::model::{ReferenceKey, RootModel};

// Input handling
pub use crate::parse::PySource;

// Convention selection
pub use crate::convention::Convention;

// Analysis entry points
pub use crate::run::{analyze, analyze_paths, analyze_source, ParallelSettings};

// File scanning
pub use crate::scan::{gather_py_files, ScanOptions};

// Configuration
pub use crate::config::{load_config, RootFinderConfig};

// Builder API
pub use crate::builder::RootFinder;
