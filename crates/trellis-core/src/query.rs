//! # Graph Query
//!
//! Read-only traversal and structure checks over the node and edge stores.
//!
//! Queries never mutate and may run at any time. All of them are
//! computationally bounded: traversal depth is clamped and the acyclicity
//! check is linear in nodes plus edges.

use std::collections::{BTreeSet, VecDeque};

use crate::edges::EdgeStore;
use crate::nodes::NodeStore;
use crate::primitives::MAX_TRAVERSAL_DEPTH;
use crate::types::{Direction, NodeId};

/// Check that the edge set admits a topological order covering every node.
///
/// Kahn's algorithm over the whole graph. Self-loops are already rejected at
/// edge insertion, so this check exists to catch longer cycles (A→B→A and
/// beyond); it returns `true` for the empty graph, isolated nodes, and any
/// forest.
#[must_use]
pub fn verify_acyclic(nodes: &NodeStore, edges: &EdgeStore) -> bool {
    let count = nodes.len();
    if count == 0 {
        return true;
    }

    // Dense ids double as indices, so adjacency is a plain vector of vectors.
    let mut indegree = vec![0usize; count];
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); count];
    for edge in edges.iter() {
        let from = edge.from.0 as usize;
        let to = edge.to.0 as usize;
        adjacency[from].push(to);
        indegree[to] = indegree[to].saturating_add(1);
    }

    let mut ready: VecDeque<usize> = (0..count).filter(|&index| indegree[index] == 0).collect();
    let mut ordered = 0usize;

    while let Some(index) = ready.pop_front() {
        ordered += 1;
        for &next in &adjacency[index] {
            indegree[next] -= 1;
            if indegree[next] == 0 {
                ready.push_back(next);
            }
        }
    }

    ordered == count
}

/// Breadth-first traversal from `start` along outgoing edges, up to `depth`
/// hops (clamped to `MAX_TRAVERSAL_DEPTH`).
///
/// Returns visited node ids in deterministic visit order, or `None` if
/// `start` does not exist. Each node appears at most once.
#[must_use]
pub fn traverse(
    nodes: &NodeStore,
    edges: &EdgeStore,
    start: NodeId,
    depth: usize,
) -> Option<Vec<NodeId>> {
    if !nodes.contains(start) {
        return None;
    }
    let depth = depth.min(MAX_TRAVERSAL_DEPTH);

    let mut visited = BTreeSet::new();
    let mut order = Vec::new();
    let mut frontier = VecDeque::new();

    frontier.push_back((start, 0usize));
    visited.insert(start);

    while let Some((current, current_depth)) = frontier.pop_front() {
        order.push(current);

        if current_depth >= depth {
            continue;
        }

        for neighbor in edges.neighbors(current, Direction::Outgoing) {
            if visited.insert(neighbor) {
                frontier.push_back((neighbor, current_depth.saturating_add(1)));
            }
        }
    }

    Some(order)
}

// =============================================================================
// TESTS
// =============================================================================
