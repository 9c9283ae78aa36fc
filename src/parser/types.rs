//! Shared types for declaration parsing.
//!
//! Defines the package-name rule, parser options, and the per-line
//! diagnostics produced while building a graph.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::graph::DependencyGraph;

/// Returns true if `name` is a valid package name.
///
/// Package names are non-empty and consist solely of uppercase ASCII
/// letters `A`-`Z`.
///
/// # Example
///
/// ```
/// use loadorder::parser::is_valid_package_name;
///
/// assert!(is_valid_package_name("CORE"));
/// assert!(!is_valid_package_name("core"));
/// assert!(!is_valid_package_name("LIB2"));
/// assert!(!is_valid_package_name(""));
/// ```
pub fn is_valid_package_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_uppercase())
}

/// How to treat a line that has neither a `:` nor a `->` separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BareLinePolicy {
    /// The line declares a package with no dependencies.
    #[default]
    Declare,
    /// The line is skipped.
    Ignore,
}

impl FromStr for BareLinePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "declare" => Ok(BareLinePolicy::Declare),
            "ignore" => Ok(BareLinePolicy::Ignore),
            _ => Err(format!(
                "Unknown bare line policy: '{}'. Valid policies: declare, ignore",
                s
            )),
        }
    }
}

impl fmt::Display for BareLinePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BareLinePolicy::Declare => write!(f, "declare"),
            BareLinePolicy::Ignore => write!(f, "ignore"),
        }
    }
}

/// Options controlling how declaration text is parsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Treatment of lines without a separator
    pub bare_lines: BareLinePolicy,
}

impl ParseOptions {
    /// Creates options with the given bare line policy.
    pub fn with_bare_lines(bare_lines: BareLinePolicy) -> Self {
        Self { bare_lines }
    }
}

/// The kind of problem found on a declaration line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "token", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The declaring package name is not valid; the line was skipped.
    InvalidPackageName(String),
    /// A dependency token is not valid; only that token was dropped.
    InvalidDependency(String),
}

/// An advisory message about one line of declaration text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDiagnostic {
    /// 1-based line number
    pub line: usize,
    /// What was wrong with it
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl LineDiagnostic {
    /// Creates a new diagnostic for the given line.
    pub fn new(line: usize, kind: DiagnosticKind) -> Self {
        Self { line, kind }
    }
}

impl fmt::Display for LineDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::InvalidPackageName(token) => {
                write!(f, "line {}: invalid package name '{}'", self.line, token)
            }
            DiagnosticKind::InvalidDependency(token) => {
                write!(f, "line {}: invalid dependency '{}'", self.line, token)
            }
        }
    }
}

/// A built graph together with the diagnostics collected while parsing.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// The closed dependency graph
    pub graph: DependencyGraph,
    /// Advisory per-line messages, in line order
    pub diagnostics: Vec<LineDiagnostic>,
}
