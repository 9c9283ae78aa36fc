//! Topological load ordering restricted to a root's reachable subgraph.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::graph::DependencyGraph;

/// Errors returned when a load order cannot be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadOrderError {
    /// The requested root package is not in the graph.
    #[error("Package '{package}' not found in the dependency graph")]
    NotFound {
        /// The missing package
        package: String,
    },

    /// The subgraph reachable from the root is not acyclic.
    #[error(
        "Circular dependencies reachable from '{root}': cannot order {}",
        .unresolved.join(", ")
    )]
    Cycle {
        /// The requested root package
        root: String,
        /// Reachable packages that could not be ordered, sorted
        unresolved: Vec<String>,
    },
}

impl LoadOrderError {
    /// Returns true if the failure is a dependency cycle.
    pub fn is_cycle(&self) -> bool {
        matches!(self, LoadOrderError::Cycle { .. })
    }

    /// Returns true if the root package was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadOrderError::NotFound { .. })
    }
}

/// Returns every package reachable from `root`, `root` included.
///
/// Packages are listed in depth-first preorder following declaration order,
/// each exactly once. There is no depth limit. An unknown root yields an
/// empty list.
pub fn reachable<'g>(graph: &'g DependencyGraph, root: &str) -> Vec<&'g str> {
    let Some(root) = graph.packages().get(root) else {
        return Vec::new();
    };

    let mut seen: HashSet<&str> = HashSet::new();
    let mut order = Vec::new();
    let mut stack = vec![root.as_str()];

    while let Some(node) = stack.pop() {
        if !seen.insert(node) {
            continue;
        }
        order.push(node);
        for dep in graph.dependencies(node).iter().rev() {
            if !seen.contains(dep.as_str()) {
                stack.push(dep.as_str());
            }
        }
    }

    order
}

/// Computes the order in which the packages needed by `root` must be loaded.
///
/// Every dependency appears strictly before the packages that depend on it;
/// `root` itself comes last among its dependents. Only packages reachable
/// from `root` take part. Ties are broken first-in first-out, seeded in
/// [`reachable`] order, so the result is fully deterministic.
///
/// # Errors
///
/// - [`LoadOrderError::NotFound`] if `root` is unknown.
/// - [`LoadOrderError::Cycle`] if the reachable subgraph has a cycle; no
///   partial order is returned.
///
/// # Example
///
/// ```
/// use loadorder::analysis::load_order;
/// use loadorder::parser::parse_str;
///
/// let graph = parse_str("A: B, C\nB: C\nC:");
/// assert_eq!(load_order(&graph, "A").unwrap(), vec!["C", "B", "A"]);
///
/// let cyclic = parse_str("A: B\nB: A");
/// assert!(load_order(&cyclic, "A").unwrap_err().is_cycle());
/// ```
pub fn load_order(graph: &DependencyGraph, root: &str) -> Result<Vec<String>, LoadOrderError> {
    if !graph.contains(root) {
        return Err(LoadOrderError::NotFound {
            package: root.to_string(),
        });
    }

    let nodes = reachable(graph, root);

    // dependency -> packages that depend on it
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::with_capacity(nodes.len());
    // package -> dependencies not yet loaded
    let mut pending: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());

    for &node in &nodes {
        let deps = graph.dependencies(node);
        pending.insert(node, deps.len());
        for dep in deps {
            dependents.entry(dep.as_str()).or_default().push(node);
        }
    }

    let mut queue: VecDeque<&str> = nodes
        .iter()
        .copied()
        .filter(|node| pending.get(node) == Some(&0))
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(node) = queue.pop_front() {
        order.push(node.to_string());
        for &dependent in dependents.get(node).map_or(&[][..], Vec::as_slice) {
            if let Some(count) = pending.get_mut(dependent) {
                *count -= 1;
                if *count == 0 {
                    queue.push_back(dependent);
                }
            }
        }
    }

    if order.len() < nodes.len() {
        let mut unresolved: Vec<String> = pending
            .into_iter()
            .filter(|&(_, count)| count > 0)
            .map(|(node, _)| node.to_string())
            .collect();
        unresolved.sort();
        debug!(root, unresolved = unresolved.len(), "load order blocked by cycle");
        return Err(LoadOrderError::Cycle {
            root: root.to_string(),
            unresolved,
        });
    }

    debug!(root, packages = order.len(), "load order computed");
    Ok(order)
}
