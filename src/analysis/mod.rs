//! Graph analysis module.
//!
//! Read-only algorithms over a built [`DependencyGraph`]:
//!
//! - [`traverse`]: depth-bounded depth-first walk with cycle detection
//! - [`find_all_cycles`]: every distinct cycle in the graph
//! - [`reachable`]: all packages a root depends on, transitively
//! - [`load_order`]: Kahn's topological order of a root's reachable subgraph
//!
//! # Example
//!
//! ```
//! use loadorder::analysis::{find_all_cycles, load_order, traverse};
//! use loadorder::parser::parse_str;
//!
//! let graph = parse_str("APP: HTTP, LOG\nHTTP: LOG\nLOG:");
//!
//! assert_eq!(traverse(&graph, "APP", 3).order, vec!["APP", "HTTP", "LOG"]);
//! assert!(find_all_cycles(&graph).is_empty());
//! assert_eq!(load_order(&graph, "APP").unwrap(), vec!["LOG", "HTTP", "APP"]);
//! ```
//!
//! [`DependencyGraph`]: crate::graph::DependencyGraph

pub mod load_order;
pub mod traversal;

// Re-export main types for convenience
pub use load_order::{load_order, reachable, LoadOrderError};
pub use traversal::{find_all_cycles, traverse, traverse_into, CycleCollector, Traversal};
