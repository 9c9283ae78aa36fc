//! Graph module for dependency relationship modeling.
//!
//! This module provides the [`DependencyGraph`] struct holding name-only
//! dependency edges, and [`CycleInfo`] for reporting circular dependencies.
//!
//! # Example
//!
//! ```rust
//! use loadorder::graph::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! graph.declare("WEB", vec!["HTTP".to_string()]);
//! graph.close();
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

mod dependency_graph;

pub use dependency_graph::{CycleInfo, DependencyGraph};
