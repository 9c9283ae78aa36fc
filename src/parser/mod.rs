//! Parser module for dependency declaration text.
//!
//! Turns line-oriented declarations into a closed [`DependencyGraph`].
//!
//! # Format
//!
//! - `PKG: A, B` or `PKG -> A, B`, with the list optionally wrapped in `[...]`
//! - `PKG` on its own, handled per [`BareLinePolicy`]
//! - `#` starts a comment line
//!
//! Package names are uppercase ASCII letters only.
//!
//! # Example
//!
//! ```
//! use loadorder::parser::{parse_str_with, ParseOptions};
//!
//! let outcome = parse_str_with("A: [B, c]", &ParseOptions::default());
//!
//! assert_eq!(outcome.graph.dependencies("A"), &["B".to_string()]);
//! assert_eq!(outcome.diagnostics.len(), 1);
//! ```
//!
//! [`DependencyGraph`]: crate::graph::DependencyGraph

pub mod declaration;
pub mod types;

// Re-export commonly used types for convenience
pub use declaration::{
    parse_file, parse_file_with, parse_str, parse_str_with, ParseError, ParseResult,
};

pub use types::{
    is_valid_package_name, BareLinePolicy, DiagnosticKind, LineDiagnostic, ParseOptions,
    ParseOutcome,
};
