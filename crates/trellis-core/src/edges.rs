//! # Edge Store
//!
//! Append-only storage for directed edges between existing nodes.
//!
//! Edges are immutable once accepted and are never removed; the only
//! side effect of acceptance is a single increment of each endpoint's
//! counter (`child_count` of the source, `parent_count` of the target).
//! Queries return edges in insertion order.

use crate::nodes::NodeStore;
use crate::types::{Capacities, Direction, Edge, EdgeKind, EdgeWeight, NodeId, TrellisError};

/// Append-only edge arena.
#[derive(Debug)]
pub struct EdgeStore {
    edges: Vec<Edge>,
    max_edges: usize,
}

impl EdgeStore {
    /// Create an empty store with its arena pre-allocated to capacity.
    #[must_use]
    pub fn new(caps: &Capacities) -> Self {
        Self {
            edges: Vec::with_capacity(caps.max_edges),
            max_edges: caps.max_edges,
        }
    }

    /// Declare a directed relationship between two existing nodes.
    ///
    /// On success the edge is appended, `child_count(from)` and
    /// `parent_count(to)` each increase by exactly one, and the edge can
    /// never be altered or removed.
    ///
    /// # Errors
    ///
    /// - `InvalidReference` if either endpoint does not exist
    /// - `SelfLoop` if `from == to`
    /// - `CapacityExceeded` if the arena is full
    ///
    /// All checks run before any mutation: a failed call changes nothing.
    pub fn add_edge(
        &mut self,
        nodes: &mut NodeStore,
        from: NodeId,
        to: NodeId,
        kind: EdgeKind,
        weight: EdgeWeight,
    ) -> Result<(), TrellisError> {
        if !nodes.contains(from) {
            return Err(TrellisError::InvalidReference(from));
        }
        if !nodes.contains(to) {
            return Err(TrellisError::InvalidReference(to));
        }
        if from == to {
            return Err(TrellisError::SelfLoop(from));
        }
        if self.edges.len() >= self.max_edges {
            return Err(TrellisError::CapacityExceeded {
                arena: "edge",
                capacity: self.max_edges,
            });
        }

        self.edges.push(Edge {
            from,
            to,
            kind,
            weight,
        });
        nodes.bump_child_count(from);
        nodes.bump_parent_count(to);
        Ok(())
    }

    /// All edges touching `node` in the given direction, in insertion order.
    ///
    /// A linear scan bounded by the current edge count.
    #[must_use]
    pub fn get_edges(&self, node: NodeId, direction: Direction) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|edge| match direction {
                Direction::Outgoing => edge.from == node,
                Direction::Incoming => edge.to == node,
            })
            .collect()
    }

    /// The far endpoints of `node`'s edges in the given direction, in
    /// insertion order.
    #[must_use]
    pub fn neighbors(&self, node: NodeId, direction: Direction) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter_map(|edge| match direction {
                Direction::Outgoing if edge.from == node => Some(edge.to),
                Direction::Incoming if edge.to == node => Some(edge.from),
                _ => None,
            })
            .collect()
    }

    /// Number of edges currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the store holds no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The fixed edge capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_edges
    }

    /// All edges in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Rebuild a store from snapshot records. Endpoints must reference
    /// existing nodes and counts must fit within capacity.
    pub(crate) fn from_records(
        caps: &Capacities,
        nodes: &NodeStore,
        records: Vec<Edge>,
    ) -> Result<Self, TrellisError> {
        if records.len() > caps.max_edges {
            return Err(TrellisError::CapacityExceeded {
                arena: "edge",
                capacity: caps.max_edges,
            });
        }
        for edge in &records {
            if !nodes.contains(edge.from) {
                return Err(TrellisError::InvalidReference(edge.from));
            }
            if !nodes.contains(edge.to) {
                return Err(TrellisError::InvalidReference(edge.to));
            }
            if edge.from == edge.to {
                return Err(TrellisError::SelfLoop(edge.from));
            }
        }
        let mut store = Self::new(caps);
        store.edges.extend(records);
        Ok(store)
    }
}

// =============================================================================
// TESTS
// =============================================================================
