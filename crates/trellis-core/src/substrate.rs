//! # Substrate
//!
//! The single owner composing the node store, edge store, event queue, and
//! mutation table behind one mutable handle.
//!
//! The substrate is single-threaded by design: no locking, no atomics, no
//! background work. Every operation is synchronous and runs to completion;
//! sharing a substrate across tasks requires external serialization by the
//! caller. Cross-store validation (edge endpoints, event targets) happens
//! here, which is what lets the component stores stay decoupled.

use crate::edges::EdgeStore;
use crate::metrics::SubstrateMetrics;
use crate::nodes::NodeStore;
use crate::primitives::DEFAULT_EDGE_WEIGHT;
use crate::processor::{EventProcessor, MutationTable};
use crate::query;
use crate::queue::EventQueue;
use crate::types::{
    Capacities, Direction, Edge, EdgeKind, EdgeWeight, Event, EventId, EventKind, Node,
    NodeAttributes, NodeId, NodeKind, TrellisError,
};

/// A bounded, append-only graph-and-event store.
///
/// Heterogeneous producers publish typed nodes and causally-ordered events
/// into one shared structure and query it deterministically, without knowing
/// about each other.
///
/// The pending event queue is a working buffer, NOT a durable log: once
/// [`Substrate::process_events`] drains it, drained events are gone.
/// Collaborators needing an audit trail (the ledger, for instance) must
/// persist events themselves — see [`Substrate::pending_events`] — before
/// processing.
#[derive(Debug)]
pub struct Substrate {
    capacities: Capacities,
    nodes: NodeStore,
    edges: EdgeStore,
    queue: EventQueue,
    mutations: MutationTable,
}

impl Default for Substrate {
    fn default() -> Self {
        Self::new()
    }
}

impl Substrate {
    /// Create a substrate with the default capacities.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacities(Capacities::default())
    }

    /// Create a substrate with explicit capacities. All arenas are allocated
    /// here, once; the limits are fixed for the substrate's lifetime.
    #[must_use]
    pub fn with_capacities(capacities: Capacities) -> Self {
        Self::with_mutations(capacities, MutationTable::default())
    }

    /// Create a substrate with explicit capacities and an injected mutation
    /// table. Handlers must satisfy the determinism contract documented on
    /// [`MutationTable`].
    #[must_use]
    pub fn with_mutations(capacities: Capacities, mutations: MutationTable) -> Self {
        Self {
            capacities,
            nodes: NodeStore::new(&capacities),
            edges: EdgeStore::new(&capacities),
            queue: EventQueue::new(&capacities),
            mutations,
        }
    }

    /// The capacities this substrate was built with.
    #[must_use]
    pub fn capacities(&self) -> &Capacities {
        &self.capacities
    }

    // =========================================================================
    // NODES
    // =========================================================================

    /// Register a typed node. See [`NodeStore::add_node`].
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        payload: &[u8],
        attributes: &NodeAttributes,
    ) -> Result<NodeId, TrellisError> {
        self.nodes.add_node(kind, payload, attributes)
    }

    /// Read-only view of a node; `None` for out-of-range ids.
    ///
    /// The view borrows core-owned storage and must not be assumed to
    /// outlive subsequent mutating calls.
    #[must_use]
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Number of nodes currently stored.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    // =========================================================================
    // EDGES
    // =========================================================================

    /// Declare a relationship with the default weight.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        kind: EdgeKind,
    ) -> Result<(), TrellisError> {
        self.add_edge_weighted(from, to, kind, EdgeWeight::new(DEFAULT_EDGE_WEIGHT))
    }

    /// Declare a relationship with an explicit weight. See
    /// [`EdgeStore::add_edge`].
    pub fn add_edge_weighted(
        &mut self,
        from: NodeId,
        to: NodeId,
        kind: EdgeKind,
        weight: EdgeWeight,
    ) -> Result<(), TrellisError> {
        self.edges.add_edge(&mut self.nodes, from, to, kind, weight)
    }

    /// All edges touching `node` in the given direction, insertion-ordered.
    #[must_use]
    pub fn get_edges(&self, node: NodeId, direction: Direction) -> Vec<&Edge> {
        self.edges.get_edges(node, direction)
    }

    /// The far endpoints of `node`'s edges in the given direction.
    #[must_use]
    pub fn neighbors(&self, node: NodeId, direction: Direction) -> Vec<NodeId> {
        self.edges.neighbors(node, direction)
    }

    /// Number of edges currently stored.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Record an occurrence targeting an existing node. See
    /// [`EventQueue::add_event`].
    pub fn add_event(
        &mut self,
        kind: EventKind,
        target: NodeId,
        payload: &[u8],
        causal_parents: &[EventId],
        timestamp: i64,
    ) -> Result<EventId, TrellisError> {
        self.queue
            .add_event(&self.nodes, kind, target, payload, causal_parents, timestamp)
    }

    /// Pending events in FIFO order. This is the hook for collaborators that
    /// need durability: persist these BEFORE calling
    /// [`Substrate::process_events`], because a drain does not keep them.
    pub fn pending_events(&self) -> impl Iterator<Item = &Event> {
        self.queue.iter()
    }

    /// Number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// The next event id the substrate would issue.
    #[must_use]
    pub fn next_event_id(&self) -> u64 {
        self.queue.next_event_id()
    }

    /// Drain the pending queue, applying every event in FIFO order. See
    /// [`EventProcessor::process`]. On success the queue is empty; on
    /// failure nothing changed.
    pub fn process_events(&mut self) -> Result<usize, TrellisError> {
        EventProcessor::process(&self.mutations, &mut self.queue, &mut self.nodes)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Whether the edge set admits a topological order covering every node.
    /// See [`query::verify_acyclic`].
    #[must_use]
    pub fn verify_acyclic(&self) -> bool {
        query::verify_acyclic(&self.nodes, &self.edges)
    }

    /// Bounded breadth-first traversal. See [`query::traverse`].
    #[must_use]
    pub fn traverse(&self, start: NodeId, depth: usize) -> Option<Vec<NodeId>> {
        query::traverse(&self.nodes, &self.edges, start, depth)
    }

    /// Counts and utilization for status reporting.
    #[must_use]
    pub fn metrics(&self) -> SubstrateMetrics {
        SubstrateMetrics::from_substrate(self)
    }

    // =========================================================================
    // SNAPSHOT SUPPORT
    // =========================================================================

    /// Rebuild a substrate from snapshot parts. Used by the formats module;
    /// validates density, endpoint existence, capacity fit, and counter
    /// consistency.
    pub(crate) fn from_parts(
        capacities: Capacities,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        next_event_id: u64,
    ) -> Result<Self, TrellisError> {
        let nodes = NodeStore::from_records(&capacities, nodes)?;
        let edges = EdgeStore::from_records(&capacities, &nodes, edges)?;

        // Serialized counters must agree with the serialized edge set.
        let mut parent_counts = vec![0u64; nodes.len()];
        let mut child_counts = vec![0u64; nodes.len()];
        for edge in edges.iter() {
            child_counts[edge.from.0 as usize] += 1;
            parent_counts[edge.to.0 as usize] += 1;
        }
        for node in nodes.iter() {
            let index = node.id.0 as usize;
            if node.parent_count != parent_counts[index]
                || node.child_count != child_counts[index]
            {
                return Err(TrellisError::DeserializationError(format!(
                    "edge counters of node {:?} disagree with the edge set",
                    node.id
                )));
            }
        }

        Ok(Self {
            capacities,
            nodes,
            edges,
            queue: EventQueue::from_watermark(&capacities, next_event_id),
            mutations: MutationTable::default(),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_scenario() {
        let mut substrate = Substrate::new();

        let a = substrate
            .add_node(NodeKind::SyntaxTreeNode, b"a", &NodeAttributes::default())
            .expect("add a");
        let b = substrate
            .add_node(NodeKind::SyntaxTreeNode, b"b", &NodeAttributes::default())
            .expect("add b");
        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(1));

        substrate
            .add_edge(a, b, EdgeKind::Dependency)
            .expect("add edge");
        assert_eq!(substrate.get_node(a).expect("a").child_count, 1);
        assert_eq!(substrate.get_node(b).expect("b").parent_count, 1);

        let event = substrate
            .add_event(EventKind::CodeEdit, b, b"insert:x", &[], 0)
            .expect("add event");
        assert_eq!(event, EventId(0));

        substrate.process_events().expect("process");
        assert_eq!(substrate.pending_count(), 0);
        assert_eq!(substrate.get_node(b).expect("b").payload, b"binsert:x");
    }

    #[test]
    fn views_reflect_mutations() {
        let mut substrate = Substrate::new();
        let node = substrate
            .add_node(NodeKind::UiComponent, b"before", &NodeAttributes::default())
            .expect("add");

        substrate
            .add_event(EventKind::WebRequest, node, b"after", &[], 5)
            .expect("enqueue");
        substrate.process_events().expect("process");

        assert_eq!(substrate.get_node(node).expect("node").payload, b"after");
    }

    #[test]
    fn pending_events_expose_the_audit_hook() {
        let mut substrate = Substrate::new();
        let node = substrate
            .add_node(NodeKind::ExternalDataSource, b"", &NodeAttributes::default())
            .expect("add");

        substrate
            .add_event(EventKind::WebRequest, node, b"body", &[], 9)
            .expect("enqueue");

        let copied: Vec<Event> = substrate.pending_events().cloned().collect();
        assert_eq!(copied.len(), 1);
        assert_eq!(copied[0].timestamp, 9);

        substrate.process_events().expect("process");
        assert_eq!(substrate.pending_events().count(), 0);
    }

    #[test]
    fn default_substrate_uses_default_capacities() {
        let substrate = Substrate::new();
        assert_eq!(*substrate.capacities(), Capacities::default());
        assert_eq!(substrate.node_count(), 0);
        assert_eq!(substrate.edge_count(), 0);
        assert!(substrate.verify_acyclic());
    }
}
