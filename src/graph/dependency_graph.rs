//! Dependency graph data model.
//!
//! Stores name-only dependency edges as an ordered adjacency map, with a
//! petgraph projection for whole-graph cycle checks.

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// A directed graph of package dependencies.
///
/// Every package is a key of the edge map, including packages that were only
/// ever referenced as a dependency (those map to an empty list). Edges point
/// from the dependent package to its dependency.
///
/// Both collections are ordered, so whole-graph iteration is always sorted
/// by package name.
///
/// # Example
///
/// ```rust
/// use loadorder::graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
/// graph.declare("APP", vec!["CORE".to_string(), "LOG".to_string()]);
/// graph.declare("LOG", vec!["CORE".to_string()]);
/// graph.close();
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 3);
/// assert_eq!(graph.dependencies("CORE"), &[] as &[String]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    /// package -> ordered, duplicate-free dependency names
    edges: BTreeMap<String, Vec<String>>,
    /// Every package seen, as declarer or as dependency
    all_packages: BTreeSet<String>,
}

impl DependencyGraph {
    /// Creates a new empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the dependency list of `package`, replacing any earlier
    /// declaration of the same package.
    ///
    /// Repeated names in `dependencies` are collapsed to their first
    /// occurrence. Returns `true` if the package had already been declared.
    ///
    /// The graph is not closed until [`close`](Self::close) is called.
    pub fn declare(&mut self, package: &str, dependencies: Vec<String>) -> bool {
        let mut unique: Vec<String> = Vec::with_capacity(dependencies.len());
        for dep in dependencies {
            if !unique.contains(&dep) {
                unique.push(dep);
            }
        }

        self.all_packages.insert(package.to_string());
        self.all_packages.extend(unique.iter().cloned());
        self.edges.insert(package.to_string(), unique).is_some()
    }

    /// Gives every known package without a declaration an empty dependency list.
    pub fn close(&mut self) {
        for package in &self.all_packages {
            if !self.edges.contains_key(package) {
                self.edges.insert(package.clone(), Vec::new());
            }
        }
    }

    /// Returns the declared dependencies of a package, in declaration order.
    ///
    /// Unknown packages yield an empty slice.
    pub fn dependencies(&self, name: &str) -> &[String] {
        self.edges.get(name).map_or(&[], Vec::as_slice)
    }

    /// Returns the packages that declare `name` as a dependency, sorted.
    pub fn dependents(&self, name: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(_, deps)| deps.iter().any(|d| d == name))
            .map(|(package, _)| package.as_str())
            .collect()
    }

    /// Iterates over `(package, dependencies)` pairs in package-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.edges
            .iter()
            .map(|(package, deps)| (package.as_str(), deps.as_slice()))
    }

    /// Returns the set of every known package name.
    pub fn packages(&self) -> &BTreeSet<String> {
        &self.all_packages
    }

    /// Checks if a package is known to the graph.
    pub fn contains(&self, name: &str) -> bool {
        self.all_packages.contains(name)
    }

    /// Returns true if the edge map has an entry for `name`.
    pub fn has_edges_for(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    /// Returns the number of packages in the graph.
    pub fn node_count(&self) -> usize {
        self.all_packages.len()
    }

    /// Returns the number of dependency edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Returns the number of packages with at least one dependency.
    pub fn declared_count(&self) -> usize {
        self.edges.values().filter(|deps| !deps.is_empty()).count()
    }

    /// Returns the packages that have no dependencies, sorted.
    pub fn leaves(&self) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(package, _)| package.as_str())
            .collect()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.all_packages.is_empty()
    }

    /// Projects the graph onto a petgraph `DiGraph`.
    ///
    /// Node weights are package names; nodes are added in sorted order.
    pub fn to_petgraph(&self) -> DiGraph<String, ()> {
        let mut graph = DiGraph::with_capacity(self.edges.len(), self.edge_count());
        let mut indices: HashMap<&str, NodeIndex> = HashMap::with_capacity(self.edges.len());

        for package in self.edges.keys() {
            indices.insert(package.as_str(), graph.add_node(package.clone()));
        }
        for (package, deps) in &self.edges {
            for dep in deps {
                if let (Some(&from), Some(&to)) =
                    (indices.get(package.as_str()), indices.get(dep.as_str()))
                {
                    graph.add_edge(from, to, ());
                }
            }
        }

        graph
    }

    /// Checks if the graph contains at least one cycle.
    ///
    /// # Example
    ///
    /// ```rust
    /// use loadorder::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.declare("A", vec!["B".to_string()]);
    /// graph.declare("B", vec!["A".to_string()]);
    /// graph.close();
    ///
    /// assert!(graph.has_cycles());
    /// ```
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.to_petgraph())
    }

    /// Returns the strongly connected components that contain a cycle.
    ///
    /// A component qualifies when it has more than one member, or when its
    /// single member depends on itself. Components are sorted by their
    /// smallest package name. Every cycle lies entirely inside one of them.
    pub fn cycle_components(&self) -> Vec<BTreeSet<String>> {
        let graph = self.to_petgraph();
        let mut components: Vec<BTreeSet<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| match scc.as_slice() {
                [idx] => graph.contains_edge(*idx, *idx),
                _ => true,
            })
            .map(|scc| scc.iter().map(|&idx| graph[idx].clone()).collect())
            .collect();

        components.sort();
        components
    }

    /// Returns the packages that take part in any cycle.
    pub fn packages_in_cycles(&self) -> BTreeSet<String> {
        self.cycle_components().into_iter().flatten().collect()
    }
}

/// A detected circular dependency.
///
/// Holds the packages of the cycle in walk order; the last one depends on
/// the first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CycleInfo {
    /// The package names in the cycle (the last connects back to the first)
    pub nodes: Vec<String>,
}

impl CycleInfo {
    /// Creates a cycle from its open walk.
    pub fn new(nodes: Vec<String>) -> Self {
        Self { nodes }
    }

    /// Returns the cycle rotated so that its smallest package name comes first.
    pub fn canonical(&self) -> Self {
        let start = self
            .nodes
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.cmp(b.1))
            .map_or(0, |(i, _)| i);

        let mut nodes = Vec::with_capacity(self.nodes.len());
        nodes.extend_from_slice(&self.nodes[start..]);
        nodes.extend_from_slice(&self.nodes[..start]);
        Self { nodes }
    }

    /// Returns the closed walk: the nodes with the first one repeated at the end.
    pub fn closed_walk(&self) -> Vec<String> {
        let mut walk = self.nodes.clone();
        if let Some(first) = self.nodes.first() {
            walk.push(first.clone());
        }
        walk
    }

    /// Returns a formatted string representation of the cycle path.
    ///
    /// For example: "A -> B -> C -> A"
    pub fn cycle_path(&self) -> String {
        self.closed_walk().join(" -> ")
    }

    /// Returns true if `name` is part of the cycle.
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n == name)
    }

    /// Returns the number of packages in the cycle.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the cycle is empty (should not happen in practice).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl fmt::Display for CycleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cycle_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample_graph() -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        graph.declare("A", names(&["B", "C"]));
        graph.declare("B", names(&["C"]));
        graph.close();
        graph
    }

    #[test]
    fn test_create_empty_graph() {
        let graph = DependencyGraph::new();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
        assert!(!graph.has_cycles());
    }

    #[test]
    fn test_close_adds_referenced_packages() {
        let graph = sample_graph();

        assert!(graph.has_edges_for("C"));
        assert!(graph.dependencies("C").is_empty());
        for package in graph.packages() {
            assert!(graph.has_edges_for(package), "{package} has no edge entry");
        }
    }

    #[test]
    fn test_declare_collapses_duplicates() {
        let mut graph = DependencyGraph::new();
        graph.declare("A", names(&["B", "C", "B"]));
        graph.close();

        assert_eq!(graph.dependencies("A"), names(&["B", "C"]).as_slice());
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_declare_overwrites() {
        let mut graph = DependencyGraph::new();
        assert!(!graph.declare("A", names(&["B"])));
        assert!(graph.declare("A", names(&["C"])));
        graph.close();

        assert_eq!(graph.dependencies("A"), names(&["C"]).as_slice());
        // B was seen once, so it stays a known package
        assert!(graph.contains("B"));
        assert!(graph.dependencies("B").is_empty());
    }

    #[test]
    fn test_dependents_and_leaves() {
        let graph = sample_graph();

        assert_eq!(graph.dependents("C"), vec!["A", "B"]);
        assert!(graph.dependents("A").is_empty());
        assert_eq!(graph.leaves(), vec!["C"]);
        assert_eq!(graph.declared_count(), 2);
    }

    #[test]
    fn test_unknown_package_has_no_dependencies() {
        let graph = sample_graph();
        assert!(graph.dependencies("Z").is_empty());
        assert!(!graph.contains("Z"));
    }

    #[test]
    fn test_to_petgraph_counts() {
        let graph = sample_graph();
        let pg = graph.to_petgraph();

        assert_eq!(pg.node_count(), 3);
        assert_eq!(pg.edge_count(), 3);
    }

    #[test]
    fn test_packages_in_cycles() {
        let mut graph = DependencyGraph::new();
        graph.declare("A", names(&["B"]));
        graph.declare("B", names(&["C"]));
        graph.declare("C", names(&["A"]));
        graph.declare("D", names(&["A"]));
        graph.declare("E", names(&["E"]));
        graph.close();

        let members = graph.packages_in_cycles();
        assert!(graph.has_cycles());
        assert!(members.contains("A"));
        assert!(members.contains("B"));
        assert!(members.contains("C"));
        assert!(members.contains("E"));
        assert!(!members.contains("D"));
    }

    #[test]
    fn test_cycle_components() {
        let mut graph = DependencyGraph::new();
        graph.declare("A", names(&["B"]));
        graph.declare("B", names(&["A", "C"]));
        graph.declare("C", names(&["D"]));
        graph.declare("D", names(&["C", "E"]));
        graph.declare("F", names(&["F"]));
        graph.close();

        let components = graph.cycle_components();
        let expected: Vec<BTreeSet<String>> = vec![
            names(&["A", "B"]).into_iter().collect(),
            names(&["C", "D"]).into_iter().collect(),
            names(&["F"]).into_iter().collect(),
        ];
        assert_eq!(components, expected);
    }

    #[test]
    fn test_cycle_path_and_closed_walk() {
        let cycle = CycleInfo::new(names(&["A", "B", "C"]));

        assert_eq!(cycle.cycle_path(), "A -> B -> C -> A");
        assert_eq!(cycle.closed_walk(), names(&["A", "B", "C", "A"]));
        assert_eq!(cycle.to_string(), "A -> B -> C -> A");
        assert_eq!(cycle.len(), 3);
        assert!(cycle.contains("B"));
    }

    #[test]
    fn test_cycle_canonical_rotation() {
        let cycle = CycleInfo::new(names(&["C", "A", "B"]));
        assert_eq!(cycle.canonical().nodes, names(&["A", "B", "C"]));

        let empty = CycleInfo::new(Vec::new());
        assert!(empty.canonical().is_empty());
        assert_eq!(empty.cycle_path(), "");
    }
}
