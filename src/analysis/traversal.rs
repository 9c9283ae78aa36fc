//! Depth-bounded traversal and cycle enumeration.
//!
//! Both walks keep a per-branch path of ancestors so that sibling subtrees
//! never see each other's nodes. The path is a persistent linked list shared
//! between frames, so extending it for a child is O(1).

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::debug;

use crate::graph::{CycleInfo, DependencyGraph};

/// Ancestor chain of the node currently being expanded.
struct PathLink<'g> {
    name: &'g str,
    parent: Option<Rc<PathLink<'g>>>,
}

type Path<'g> = Option<Rc<PathLink<'g>>>;

fn extend<'g>(path: &Path<'g>, name: &'g str) -> Path<'g> {
    Some(Rc::new(PathLink {
        name,
        parent: path.clone(),
    }))
}

fn on_path(path: &Path<'_>, name: &str) -> bool {
    let mut cursor = path.as_deref();
    while let Some(link) = cursor {
        if link.name == name {
            return true;
        }
        cursor = link.parent.as_deref();
    }
    false
}

/// Returns the open walk from the first occurrence of `name` on the path
/// down to the most recent ancestor.
fn cycle_from(path: &Path<'_>, name: &str) -> Vec<String> {
    let mut walk = Vec::new();
    let mut cursor = path.as_deref();
    while let Some(link) = cursor {
        walk.push(link.name.to_string());
        if link.name == name {
            break;
        }
        cursor = link.parent.as_deref();
    }
    walk.reverse();
    walk
}

/// Accumulates distinct cycles, deduplicated by their rendered path.
///
/// A fresh collector is used per call by [`traverse`] and
/// [`find_all_cycles`]; pass one explicitly to [`traverse_into`] to
/// deduplicate across several traversals.
#[derive(Debug, Clone, Default)]
pub struct CycleCollector {
    seen: HashSet<String>,
    cycles: Vec<CycleInfo>,
}

impl CycleCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a cycle unless an identical rendering was already recorded.
    ///
    /// Returns `true` if the cycle was new.
    pub fn record(&mut self, cycle: CycleInfo) -> bool {
        if cycle.is_empty() || !self.seen.insert(cycle.cycle_path()) {
            return false;
        }
        debug!(cycle = %cycle, "cycle detected");
        self.cycles.push(cycle);
        true
    }

    /// Returns the cycles recorded so far, in discovery order.
    pub fn cycles(&self) -> &[CycleInfo] {
        &self.cycles
    }

    /// Consumes the collector, returning its cycles.
    pub fn into_cycles(self) -> Vec<CycleInfo> {
        self.cycles
    }

    /// Returns the number of distinct cycles recorded.
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    /// Returns true if no cycle was recorded.
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}

/// Result of a depth-bounded traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Traversal {
    /// Packages in visitation order, starting with the start package
    pub order: Vec<String>,
    /// Cycles met while walking, each closed at its first repeated node
    pub cycles: Vec<CycleInfo>,
}

/// Walks the graph depth-first from `start`, at most `max_depth` edges deep.
///
/// Each package is emitted once, the first time it is reached. A dependency
/// that is already an ancestor on the current branch is a cycle: it is
/// recorded and not descended into. Dependencies are followed in declaration
/// order.
///
/// An unknown `start` yields an empty traversal.
///
/// # Example
///
/// ```
/// use loadorder::analysis::traverse;
/// use loadorder::parser::parse_str;
///
/// let graph = parse_str("A: B, C\nB: C\nC: A");
/// let result = traverse(&graph, "A", 5);
///
/// assert_eq!(result.order, vec!["A", "B", "C"]);
/// assert_eq!(result.cycles[0].cycle_path(), "A -> B -> C -> A");
/// ```
pub fn traverse(graph: &DependencyGraph, start: &str, max_depth: usize) -> Traversal {
    let mut collector = CycleCollector::new();
    let order = traverse_into(graph, start, max_depth, &mut collector);
    Traversal {
        order,
        cycles: collector.into_cycles(),
    }
}

/// Same walk as [`traverse`], recording cycles into `collector`.
///
/// Returns the visitation order.
pub fn traverse_into(
    graph: &DependencyGraph,
    start: &str,
    max_depth: usize,
    collector: &mut CycleCollector,
) -> Vec<String> {
    if !graph.has_edges_for(start) {
        debug!(start, "traversal start not in graph");
        return Vec::new();
    }

    let mut order = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    // (node, depth, ancestors of node)
    let mut stack: Vec<(&str, usize, Path<'_>)> = vec![(start, 0, None)];

    while let Some((node, depth, path)) = stack.pop() {
        if depth > max_depth {
            continue;
        }
        if on_path(&path, node) {
            collector.record(CycleInfo::new(cycle_from(&path, node)));
            continue;
        }
        if !visited.insert(node) {
            continue;
        }

        order.push(node.to_string());
        let child_path = extend(&path, node);
        // reversed so the first dependency is expanded first
        for dep in graph.dependencies(node).iter().rev() {
            stack.push((dep.as_str(), depth + 1, child_path.clone()));
        }
    }

    order
}

/// Enumerates the cycles of the whole graph.
///
/// Every cycle lies inside one strongly connected component, so walks start
/// only from packages of a cyclic component and never leave it. Within a
/// component each walk keeps its own ancestor path with no pruning across
/// branches, so every cycle is found. Each cycle is reported once, rotated
/// to start at its smallest package name. Results are sorted by that
/// rendering.
///
/// Acyclic parts of the graph cost one component pass. Inside a component
/// the walk explores simple paths, so its cost grows with the number of
/// distinct paths there.
///
/// # Example
///
/// ```
/// use loadorder::analysis::find_all_cycles;
/// use loadorder::parser::parse_str;
///
/// let graph = parse_str("A: B\nB: A");
/// let cycles = find_all_cycles(&graph);
///
/// assert_eq!(cycles.len(), 1);
/// assert_eq!(cycles[0].cycle_path(), "A -> B -> A");
/// ```
pub fn find_all_cycles(graph: &DependencyGraph) -> Vec<CycleInfo> {
    let components = graph.cycle_components();
    let component_of: HashMap<&str, usize> = components
        .iter()
        .enumerate()
        .flat_map(|(id, members)| members.iter().map(move |name| (name.as_str(), id)))
        .collect();

    let mut collector = CycleCollector::new();

    for (id, members) in components.iter().enumerate() {
        for start in members {
            let mut stack: Vec<(&str, Path<'_>)> = vec![(start.as_str(), None)];

            while let Some((node, path)) = stack.pop() {
                if on_path(&path, node) {
                    collector.record(CycleInfo::new(cycle_from(&path, node)).canonical());
                    continue;
                }

                let child_path = extend(&path, node);
                for dep in graph.dependencies(node).iter().rev() {
                    if component_of.get(dep.as_str()) == Some(&id) {
                        stack.push((dep.as_str(), child_path.clone()));
                    }
                }
            }
        }
    }

    let mut cycles = collector.into_cycles();
    cycles.sort_by_cached_key(CycleInfo::cycle_path);
    debug!(
        components = components.len(),
        cycles = cycles.len(),
        "cycle enumeration finished"
    );
    cycles
}
