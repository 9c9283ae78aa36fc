//! loadorder - dependency graph analyzer
//!
//! This crate builds dependency graphs from plain-text declarations, detects
//! circular dependencies, and computes deterministic load orders by
//! topological sort.

pub mod analysis;
pub mod config;
pub mod export;
pub mod graph;
pub mod parser;
