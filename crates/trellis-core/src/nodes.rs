//! # Node Store
//!
//! Capacity-bounded, append-only storage for node records.
//!
//! Nodes live in a fixed arena allocated once at construction. Ids are dense:
//! a node's id equals its arena index, so the Nth node ever created has id
//! N-1 and lookup is a bounds check plus an index. Nodes are never destroyed
//! for the lifetime of the store.

use crate::types::{owned_copy, Capacities, Node, NodeAttributes, NodeId, NodeKind, TrellisError};

/// Append-only node arena.
///
/// Every fallible check runs before any mutation, so a failed `add_node`
/// leaves the arena byte-for-byte unchanged.
///
/// Deliberately not `Clone`: a derived clone would shrink the arena's
/// reserved capacity back to its length, reintroducing reallocation.
#[derive(Debug)]
pub struct NodeStore {
    nodes: Vec<Node>,
    max_nodes: usize,
    max_payload_bytes: usize,
    max_metadata_bytes: usize,
}

impl NodeStore {
    /// Create an empty store with its arena pre-allocated to capacity.
    #[must_use]
    pub fn new(caps: &Capacities) -> Self {
        Self {
            nodes: Vec::with_capacity(caps.max_nodes),
            max_nodes: caps.max_nodes,
            max_payload_bytes: caps.max_payload_bytes,
            max_metadata_bytes: caps.max_metadata_bytes,
        }
    }

    /// Register a new node, copying `payload` and `attributes.metadata` into
    /// store-owned buffers. The caller's buffers may be freed or reused as
    /// soon as this returns.
    ///
    /// Returns the dense id of the new node.
    ///
    /// # Errors
    ///
    /// - `CapacityExceeded` if the arena is full
    /// - `PayloadTooLarge` if payload or metadata exceed their ceilings
    /// - `AllocationFailure` if a buffer copy cannot be satisfied
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        payload: &[u8],
        attributes: &NodeAttributes,
    ) -> Result<NodeId, TrellisError> {
        if self.nodes.len() >= self.max_nodes {
            return Err(TrellisError::CapacityExceeded {
                arena: "node",
                capacity: self.max_nodes,
            });
        }
        if payload.len() > self.max_payload_bytes {
            return Err(TrellisError::PayloadTooLarge {
                len: payload.len(),
                max: self.max_payload_bytes,
            });
        }
        if attributes.metadata.len() > self.max_metadata_bytes {
            return Err(TrellisError::PayloadTooLarge {
                len: attributes.metadata.len(),
                max: self.max_metadata_bytes,
            });
        }

        let payload = owned_copy(payload)?;
        let metadata = owned_copy(&attributes.metadata)?;

        let id = NodeId(self.nodes.len() as u64);
        self.nodes.push(Node {
            id,
            kind,
            payload,
            parent_count: 0,
            child_count: 0,
            attributes: NodeAttributes {
                readonly: attributes.readonly,
                readonly_span: attributes.readonly_span,
                metadata,
            },
        });

        Ok(id)
    }

    /// Read-only view of a node. Returns `None` for out-of-range ids; never
    /// panics.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        usize::try_from(id.0).ok().and_then(|i| self.nodes.get(i))
    }

    /// Whether a node with this id exists.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of nodes currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the store holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The fixed node capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_nodes
    }

    /// The per-node payload ceiling.
    #[must_use]
    pub fn max_payload_bytes(&self) -> usize {
        self.max_payload_bytes
    }

    /// All nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Increment the outgoing-edge counter of `id`.
    pub(crate) fn bump_child_count(&mut self, id: NodeId) {
        if let Some(node) = self.node_mut(id) {
            node.child_count = node.child_count.saturating_add(1);
        }
    }

    /// Increment the incoming-edge counter of `id`.
    pub(crate) fn bump_parent_count(&mut self, id: NodeId) {
        if let Some(node) = self.node_mut(id) {
            node.parent_count = node.parent_count.saturating_add(1);
        }
    }

    /// Replace a node's payload with an already-validated buffer. Used by the
    /// event processor at commit time; missing ids are impossible there
    /// because targets were validated at enqueue and nodes are never removed.
    pub(crate) fn commit_payload(&mut self, id: NodeId, payload: Vec<u8>) {
        if let Some(node) = self.node_mut(id) {
            node.payload = payload;
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        usize::try_from(id.0)
            .ok()
            .and_then(|i| self.nodes.get_mut(i))
    }

    /// Rebuild a store from snapshot records. Ids must be dense and counts
    /// within capacity.
    pub(crate) fn from_records(
        caps: &Capacities,
        records: Vec<Node>,
    ) -> Result<Self, TrellisError> {
        if records.len() > caps.max_nodes {
            return Err(TrellisError::CapacityExceeded {
                arena: "node",
                capacity: caps.max_nodes,
            });
        }
        for (index, node) in records.iter().enumerate() {
            if node.id.0 != index as u64 {
                return Err(TrellisError::DeserializationError(format!(
                    "node ids are not dense: found {:?} at index {}",
                    node.id, index
                )));
            }
        }
        let mut store = Self::new(caps);
        store.nodes.extend(records);
        Ok(store)
    }
}

// =============================================================================
// TESTS
// =============================================================================
