//! # Core Type Definitions
//!
//! All core types for the Trellis substrate:
//! - Record identifiers (`NodeId`, `EventId`)
//! - Closed kind discriminators (`NodeKind`, `EdgeKind`, `EventKind`)
//! - Record types (`Node`, `Edge`, `Event`) and their attributes
//! - Capacity configuration (`Capacities`)
//! - Error types (`TrellisError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` where they are used as map/set keys
//! - Use saturating arithmetic for counters to prevent overflow

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::primitives;

// =============================================================================
// RECORD IDENTIFIERS
// =============================================================================

/// Identifier of a node in the substrate.
///
/// Node ids are dense: the Nth node ever created has id N-1, and ids double
/// as arena indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Identifier of an event.
///
/// Event ids are unique across the entire lifetime of the store: the counter
/// that issues them survives queue drains and is never reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub u64);

/// Weight of a directed edge.
///
/// Edges are immutable once created, so unlike a co-occurrence counter the
/// weight is fixed at insertion time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct EdgeWeight(pub i64);

impl EdgeWeight {
    /// Create a new edge weight with the given value.
    #[must_use]
    pub const fn new(weight: i64) -> Self {
        Self(weight)
    }

    /// Get the raw weight value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

// =============================================================================
// KIND DISCRIMINATORS
// =============================================================================

/// The closed set of node producers sharing the substrate.
///
/// Serialized names use the kebab-case tags exposed at the library boundary
/// (`syntax-tree-node`, `page-structure-node`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// A node of a source-code syntax tree.
    SyntaxTreeNode,
    /// A node of a rendered-page structure.
    PageStructureNode,
    /// A node of a UI component tree.
    UiComponent,
    /// An external data source (feed, ledger counterparty, remote document).
    ExternalDataSource,
    /// A derived computation over other nodes.
    Computation,
}

impl NodeKind {
    /// All node kinds in declaration order.
    pub const ALL: [Self; 5] = [
        Self::SyntaxTreeNode,
        Self::PageStructureNode,
        Self::UiComponent,
        Self::ExternalDataSource,
        Self::Computation,
    ];

    /// The canonical kebab-case tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SyntaxTreeNode => "syntax-tree-node",
            Self::PageStructureNode => "page-structure-node",
            Self::UiComponent => "ui-component",
            Self::ExternalDataSource => "external-data-source",
            Self::Computation => "computation",
        }
    }
}

/// The closed set of relationship kinds between nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    /// Target depends on source.
    Dependency,
    /// Data flows from source to target.
    DataFlow,
    /// Target is a transformation of source.
    Transformation,
    /// Semantic association without a structural contract.
    Semantic,
}

impl EdgeKind {
    /// All edge kinds in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Dependency,
        Self::DataFlow,
        Self::Transformation,
        Self::Semantic,
    ];

    /// The canonical kebab-case tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dependency => "dependency",
            Self::DataFlow => "data-flow",
            Self::Transformation => "transformation",
            Self::Semantic => "semantic",
        }
    }
}

/// The closed set of state-changing occurrence kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    /// An edit applied to a source buffer.
    CodeEdit,
    /// A completed web request replacing fetched content.
    WebRequest,
    /// A user interaction with a UI component.
    UiInteraction,
    /// A model completion appended to a buffer.
    AiCompletion,
    /// A version-control update replacing a tracked buffer.
    VersionControlUpdate,
}

impl EventKind {
    /// All event kinds in declaration order.
    pub const ALL: [Self; 5] = [
        Self::CodeEdit,
        Self::WebRequest,
        Self::UiInteraction,
        Self::AiCompletion,
        Self::VersionControlUpdate,
    ];

    /// The canonical kebab-case tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CodeEdit => "code-edit",
            Self::WebRequest => "web-request",
            Self::UiInteraction => "ui-interaction",
            Self::AiCompletion => "ai-completion",
            Self::VersionControlUpdate => "version-control-update",
        }
    }

    /// Dense index of this kind, used for dispatch-table lookup.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::CodeEdit => 0,
            Self::WebRequest => 1,
            Self::UiInteraction => 2,
            Self::AiCompletion => 3,
            Self::VersionControlUpdate => 4,
        }
    }
}

/// Direction selector for edge queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Edges where the queried node is the source.
    Outgoing,
    /// Edges where the queried node is the target.
    Incoming,
}

// =============================================================================
// NODE
// =============================================================================

/// A half-open byte range within a node payload.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.end <= self.start
    }
}

/// Caller-facing attributes of a node.
///
/// The substrate stores and exposes attributes but never interprets them;
/// enforcement of `readonly` is the publishing collaborator's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NodeAttributes {
    /// Whether the node's payload should be treated as read-only by callers.
    pub readonly: bool,
    /// Byte range of the payload covered by the read-only marker.
    pub readonly_span: Span,
    /// Opaque caller-owned metadata, copied on insertion.
    pub metadata: Vec<u8>,
}

/// A node record.
///
/// The substrate exclusively owns the payload and metadata buffers; callers
/// hand in borrowed bytes that are copied on insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Dense identifier, equal to this node's arena index.
    pub id: NodeId,
    /// Which producer domain this node belongs to.
    pub kind: NodeKind,
    /// Opaque domain payload. Mutated only by the event processor.
    pub payload: Vec<u8>,
    /// Number of incoming edges.
    pub parent_count: u64,
    /// Number of outgoing edges.
    pub child_count: u64,
    /// Caller-facing attributes.
    pub attributes: NodeAttributes,
}

// =============================================================================
// EDGE
// =============================================================================

/// A directed edge between two existing nodes. Immutable once created and
/// never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: EdgeKind,
    pub weight: EdgeWeight,
}

// =============================================================================
// EVENT
// =============================================================================

/// A causally-ordered occurrence targeting one node.
///
/// Events live in the pending queue until the next processing pass consumes
/// them; they are not individually retrievable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Lifetime-unique identifier.
    pub id: EventId,
    /// Which occurrence domain this event belongs to.
    pub kind: EventKind,
    /// The node whose payload this event mutates.
    pub target: NodeId,
    /// Opaque domain payload, copied on enqueue.
    pub payload: Vec<u8>,
    /// Ids of prior events this event declares as logical predecessors.
    pub causal_parents: Vec<EventId>,
    /// Caller-supplied timestamp in seconds. Opaque to the substrate: the
    /// processor never reads it, so replay stays clock-independent.
    pub timestamp: i64,
}

// =============================================================================
// CAPACITIES
// =============================================================================

/// Fixed capacities of a substrate, set once at construction.
///
/// Storage for nodes, edges, and the pending queue is allocated up front to
/// these limits; no arena ever reallocates or grows past them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacities {
    /// Maximum number of nodes.
    pub max_nodes: usize,
    /// Maximum number of edges.
    pub max_edges: usize,
    /// Maximum number of pending (unprocessed) events.
    pub max_pending_events: usize,
    /// Per-node and per-event payload size ceiling in bytes.
    pub max_payload_bytes: usize,
    /// Per-node metadata size ceiling in bytes.
    pub max_metadata_bytes: usize,
}

impl Default for Capacities {
    fn default() -> Self {
        Self {
            max_nodes: primitives::MAX_NODES,
            max_edges: primitives::MAX_EDGES,
            max_pending_events: primitives::MAX_PENDING_EVENTS,
            max_payload_bytes: primitives::MAX_PAYLOAD_BYTES,
            max_metadata_bytes: primitives::MAX_METADATA_BYTES,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by substrate operations.
///
/// Every failure is synchronous and leaves the store's observable state
/// byte-for-byte unchanged. There are no warnings and no silent truncation.
#[derive(Debug, Error)]
pub enum TrellisError {
    /// A fixed arena is full.
    #[error("capacity exceeded: {arena} arena is full at {capacity} records")]
    CapacityExceeded {
        arena: &'static str,
        capacity: usize,
    },

    /// An edge or event referenced a node id that does not exist.
    #[error("invalid reference: node {0:?} does not exist")]
    InvalidReference(NodeId),

    /// An edge's endpoints are identical.
    #[error("self loop rejected on node {0:?}")]
    SelfLoop(NodeId),

    /// The underlying allocator could not satisfy a buffer copy.
    #[error("allocation failure: could not reserve {0} bytes")]
    AllocationFailure(usize),

    /// A payload or metadata buffer exceeds its size ceiling.
    #[error("payload of {len} bytes exceeds ceiling of {max} bytes")]
    PayloadTooLarge { len: usize, max: usize },

    /// An event declared a causal parent id that was never issued.
    #[error("invalid causal parent: event {0:?} was never issued")]
    InvalidEventParent(EventId),

    /// A serialization error occurred.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred (app layer only; the core performs no I/O).
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Copy borrowed bytes into a newly owned buffer, surfacing allocator
/// exhaustion as `AllocationFailure` instead of aborting.
pub(crate) fn owned_copy(bytes: &[u8]) -> Result<Vec<u8>, TrellisError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes.len())
        .map_err(|_| TrellisError::AllocationFailure(bytes.len()))?;
    buf.extend_from_slice(bytes);
    Ok(buf)
}

// =============================================================================
// TESTS
// =============================================================================
