//! Export functionality for dependency analysis results.
//!
//! This module assembles analysis results into [`ExportData`] and writes
//! them out in one of several formats: plain text, JSON, and Markdown.

pub mod json;
pub mod markdown;
pub mod text;

use crate::analysis::{find_all_cycles, load_order, traverse, LoadOrderError};
use crate::graph::{CycleInfo, DependencyGraph};
use serde::Serialize;
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Plain text - terminal output
    #[default]
    Text,
    /// JSON format - machine-readable, full data
    Json,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// A package and its declared dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageEntry {
    /// Package name
    pub name: String,
    /// Declared dependencies, in declaration order
    pub dependencies: Vec<String>,
    /// Whether the package takes part in a cycle
    pub in_cycle: bool,
}

/// Summary statistics of a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of known packages
    pub packages: usize,
    /// Packages declaring at least one dependency
    pub declared: usize,
    /// Number of dependency edges
    pub edges: usize,
    /// Packages with no dependencies
    pub leaves: usize,
    /// Number of distinct cycles
    pub cycles: usize,
    /// Number of packages taking part in a cycle
    pub packages_in_cycles: usize,
}

/// Depth-bounded traversal from one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraversalEntry {
    /// Start package
    pub start: String,
    /// Visited packages, in visitation order
    pub order: Vec<String>,
}

/// Outcome of a load-order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOrderOutcome {
    /// The reachable subgraph was ordered.
    Ordered {
        /// Requested root
        root: String,
        /// Packages in load order
        order: Vec<String>,
    },
    /// The reachable subgraph has a cycle.
    Cyclic {
        /// Requested root
        root: String,
        /// Packages that could not be ordered
        unresolved: Vec<String>,
    },
    /// The root package is unknown.
    NotFound {
        /// Requested root
        root: String,
    },
}

impl LoadOrderOutcome {
    /// Computes the load order of `root` and captures its outcome.
    pub fn compute(graph: &DependencyGraph, root: &str) -> Self {
        match load_order(graph, root) {
            Ok(order) => LoadOrderOutcome::Ordered {
                root: root.to_string(),
                order,
            },
            Err(LoadOrderError::Cycle { root, unresolved }) => {
                LoadOrderOutcome::Cyclic { root, unresolved }
            }
            Err(LoadOrderError::NotFound { package }) => {
                LoadOrderOutcome::NotFound { root: package }
            }
        }
    }

    /// Returns true if an order was produced.
    pub fn is_ordered(&self) -> bool {
        matches!(self, LoadOrderOutcome::Ordered { .. })
    }
}

/// Data container for export operations.
///
/// Holds all the analysis results that can be exported.
#[derive(Debug, Clone, Serialize)]
pub struct ExportData {
    /// Where the graph came from (file path or label)
    pub source: String,
    /// Depth bound used for the traversals
    pub max_depth: usize,
    /// Summary statistics
    pub summary: Summary,
    /// Every package, sorted by name
    pub packages: Vec<PackageEntry>,
    /// Detected circular dependencies
    pub cycles: Vec<CycleInfo>,
    /// Depth-bounded traversal from every package, sorted by start
    pub traversals: Vec<TraversalEntry>,
    /// Load order of a selected root, if requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_order: Option<LoadOrderOutcome>,
}

impl ExportData {
    /// Runs the full analysis of `graph`.
    ///
    /// # Example
    ///
    /// ```
    /// use loadorder::export::ExportData;
    /// use loadorder::parser::parse_str;
    ///
    /// let graph = parse_str("A: B\nB: A\nC:");
    /// let data = ExportData::analyze("inline", &graph, 3);
    ///
    /// assert_eq!(data.summary.packages, 3);
    /// assert_eq!(data.summary.cycles, 1);
    /// assert_eq!(data.traversals.len(), 3);
    /// ```
    pub fn analyze(source: impl Into<String>, graph: &DependencyGraph, max_depth: usize) -> Self {
        let in_cycles = graph.packages_in_cycles();
        let cycles = find_all_cycles(graph);

        let packages: Vec<PackageEntry> = graph
            .iter()
            .map(|(name, deps)| PackageEntry {
                name: name.to_string(),
                dependencies: deps.to_vec(),
                in_cycle: in_cycles.contains(name),
            })
            .collect();

        let traversals = graph
            .iter()
            .map(|(name, _)| TraversalEntry {
                start: name.to_string(),
                order: traverse(graph, name, max_depth).order,
            })
            .collect();

        Self {
            source: source.into(),
            max_depth,
            summary: Summary {
                packages: graph.node_count(),
                declared: graph.declared_count(),
                edges: graph.edge_count(),
                leaves: graph.leaves().len(),
                cycles: cycles.len(),
                packages_in_cycles: in_cycles.len(),
            },
            packages,
            cycles,
            traversals,
            load_order: None,
        }
    }

    /// Adds the load order of `root` to the report.
    pub fn with_load_order(mut self, graph: &DependencyGraph, root: &str) -> Self {
        self.load_order = Some(LoadOrderOutcome::compute(graph, root));
        self
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(format: ExportFormat, data: &ExportData, writer: &mut W) -> io::Result<()> {
    match format {
        ExportFormat::Text => text::TextExporter.export(data, writer),
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!(
            "markdown".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert!("csv".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(format!("{}", ExportFormat::Text), "text");
        assert_eq!(format!("{}", ExportFormat::Json), "json");
        assert_eq!(format!("{}", ExportFormat::Markdown), "markdown");
    }

    #[test]
    fn test_analyze_summary() {
        let graph = parse_str("A: B, C\nB: C\nC:\nX: Y\nY: X");
        let data = ExportData::analyze("deps.txt", &graph, 3);

        assert_eq!(
            data.summary,
            Summary {
                packages: 5,
                declared: 4,
                edges: 5,
                leaves: 1,
                cycles: 1,
                packages_in_cycles: 2,
            }
        );
        assert!(data.packages.iter().any(|p| p.name == "X" && p.in_cycle));
        assert!(data.packages.iter().any(|p| p.name == "A" && !p.in_cycle));
        assert!(data.load_order.is_none());
    }

    #[test]
    fn test_analyze_traversals_sorted() {
        let graph = parse_str("B: A\nA:");
        let data = ExportData::analyze("inline", &graph, 2);

        let starts: Vec<_> = data.traversals.iter().map(|t| t.start.as_str()).collect();
        assert_eq!(starts, vec!["A", "B"]);
        assert_eq!(data.traversals[1].order, vec!["B", "A"]);
    }

    #[test]
    fn test_load_order_outcome() {
        let graph = parse_str("A: B\nB:\nX: Y\nY: X");

        assert_eq!(
            LoadOrderOutcome::compute(&graph, "A"),
            LoadOrderOutcome::Ordered {
                root: "A".into(),
                order: vec!["B".into(), "A".into()],
            }
        );
        assert_eq!(
            LoadOrderOutcome::compute(&graph, "X"),
            LoadOrderOutcome::Cyclic {
                root: "X".into(),
                unresolved: vec!["X".into(), "Y".into()],
            }
        );
        assert_eq!(
            LoadOrderOutcome::compute(&graph, "Q"),
            LoadOrderOutcome::NotFound { root: "Q".into() }
        );
    }
}
