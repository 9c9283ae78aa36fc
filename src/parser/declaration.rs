//! Parser for line-oriented dependency declaration files.
//!
//! Each non-comment line declares one package and its dependencies:
//!
//! ```text
//! # comment
//! APP: HTTP, LOG
//! HTTP -> [NET, LOG]
//! LOG
//! ```
//!
//! Malformed lines and tokens are skipped with a warning; only a failure to
//! read the whole source is an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::types::{
    is_valid_package_name, BareLinePolicy, DiagnosticKind, LineDiagnostic, ParseOptions,
    ParseOutcome,
};
use crate::graph::DependencyGraph;

/// Errors that can occur while reading a declaration source.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The declaration file does not exist.
    #[error("Declaration file not found: {}", .path.display())]
    NotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// The file exists but its content could not be decoded.
    #[error("Failed to decode {}: {source}", .path.display())]
    Format {
        /// Path of the undecodable file
        path: PathBuf,
        /// Underlying decode error
        #[source]
        source: io::Error,
    },

    /// Any other failure to read the file.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Path of the unreadable file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ParseError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => ParseError::NotFound { path },
            io::ErrorKind::InvalidData => ParseError::Format { path, source },
            _ => ParseError::Io { path, source },
        }
    }

    /// Returns true if the source was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ParseError::NotFound { .. })
    }
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Builds a dependency graph from a declaration file with default options.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use loadorder::parser::parse_file;
///
/// let graph = parse_file(Path::new("deps.txt")).unwrap();
/// println!("{} packages", graph.node_count());
/// ```
pub fn parse_file(path: &Path) -> ParseResult<DependencyGraph> {
    parse_file_with(path, &ParseOptions::default()).map(|outcome| outcome.graph)
}

/// Builds a dependency graph from a declaration file.
///
/// Returns the graph together with every line diagnostic.
pub fn parse_file_with(path: &Path, options: &ParseOptions) -> ParseResult<ParseOutcome> {
    let content = fs::read_to_string(path).map_err(|e| ParseError::from_io(path, e))?;
    info!(path = %path.display(), "building dependency graph");
    Ok(parse_str_with(&content, options))
}

/// Builds a dependency graph from declaration text with default options.
///
/// # Example
///
/// ```
/// use loadorder::parser::parse_str;
///
/// let graph = parse_str("A: B, C\nB: C\nC:");
/// assert_eq!(graph.dependencies("A"), &["B".to_string(), "C".to_string()]);
/// assert!(graph.dependencies("C").is_empty());
/// ```
pub fn parse_str(content: &str) -> DependencyGraph {
    parse_str_with(content, &ParseOptions::default()).graph
}

/// Builds a dependency graph from declaration text.
///
/// The returned graph is closed: every referenced package has an edge entry.
pub fn parse_str_with(content: &str, options: &ParseOptions) -> ParseOutcome {
    let mut graph = DependencyGraph::new();
    let mut diagnostics = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        parse_line(index + 1, raw, options, &mut graph, &mut diagnostics);
    }

    graph.close();
    info!(
        packages = graph.node_count(),
        edges = graph.edge_count(),
        skipped = diagnostics.len(),
        "dependency graph built"
    );

    ParseOutcome { graph, diagnostics }
}

fn parse_line(
    line_no: usize,
    raw: &str,
    options: &ParseOptions,
    graph: &mut DependencyGraph,
    diagnostics: &mut Vec<LineDiagnostic>,
) {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return;
    }

    let split = line.split_once(':').or_else(|| line.split_once("->"));

    let Some((package, deps_str)) = split else {
        match options.bare_lines {
            BareLinePolicy::Declare => {
                if is_valid_package_name(line) {
                    declare(line_no, graph, line, Vec::new());
                } else {
                    reject_package(line_no, line, diagnostics);
                }
            }
            BareLinePolicy::Ignore => debug!(line = line_no, "skipping line without separator"),
        }
        return;
    };

    let package = package.trim();
    if !is_valid_package_name(package) {
        reject_package(line_no, package, diagnostics);
        return;
    }

    let dependencies = parse_dependency_list(line_no, deps_str, diagnostics);
    declare(line_no, graph, package, dependencies);
}

fn parse_dependency_list(
    line_no: usize,
    deps_str: &str,
    diagnostics: &mut Vec<LineDiagnostic>,
) -> Vec<String> {
    let mut list = deps_str.trim();
    if let Some(inner) = list.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        list = inner;
    }

    let mut dependencies = Vec::new();
    for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if is_valid_package_name(token) {
            dependencies.push(token.to_string());
        } else {
            warn!(line = line_no, token, "dropping invalid dependency name");
            diagnostics.push(LineDiagnostic::new(
                line_no,
                DiagnosticKind::InvalidDependency(token.to_string()),
            ));
        }
    }
    dependencies
}

fn declare(line_no: usize, graph: &mut DependencyGraph, package: &str, deps: Vec<String>) {
    if graph.declare(package, deps) {
        debug!(line = line_no, package, "package redeclared, previous dependencies replaced");
    }
}

fn reject_package(line_no: usize, token: &str, diagnostics: &mut Vec<LineDiagnostic>) {
    warn!(line = line_no, token, "skipping line with invalid package name");
    diagnostics.push(LineDiagnostic::new(
        line_no,
        DiagnosticKind::InvalidPackageName(token.to_string()),
    ));
}
