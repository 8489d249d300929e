//! # trellis-core
//!
//! The bounded graph-and-event substrate for Trellis - THE LOGIC.
//!
//! This crate implements the shared data substrate: heterogeneous producers
//! (a source-code syntax tree, a rendered-page structure, a ledger of
//! contract actions, UI component trees) publish typed nodes and
//! causally-ordered events into one append-only structure and query it
//! deterministically, without knowing about each other.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is single-threaded: no locking, no atomics, no background work
//! - Is bounded: every arena is allocated once, to a fixed capacity
//! - Is deterministic: no floats, no randomness, no wall clock
//! - Fails atomically: a rejected mutation changes nothing
//! - Has NO async, NO network, NO file I/O (pure Rust)
//!
//! ## Durability
//!
//! The pending event queue is a working buffer, not a log: a processing pass
//! consumes events for good. Collaborators that need an audit trail must
//! persist events (see [`Substrate::pending_events`]) before calling
//! [`Substrate::process_events`]. The snapshot format in [`formats`] covers
//! the graph state and the event-id watermark, never the queue.

// =============================================================================
// MODULES
// =============================================================================

pub mod edges;
pub mod formats;
pub mod metrics;
pub mod nodes;
pub mod primitives;
pub mod processor;
pub mod query;
pub mod queue;
pub mod substrate;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Capacities, Direction, Edge, EdgeKind, EdgeWeight, Event, EventId, EventKind, Node,
    NodeAttributes, NodeId, NodeKind, Span, TrellisError,
};

// =============================================================================
// RE-EXPORTS: Substrate Engine
// =============================================================================

pub use edges::EdgeStore;
pub use metrics::SubstrateMetrics;
pub use nodes::NodeStore;
pub use processor::{EventProcessor, MutationFn, MutationTable};
pub use query::{traverse, verify_acyclic};
pub use queue::EventQueue;
pub use substrate::Substrate;

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{substrate_from_bytes, substrate_to_bytes, SerializableSubstrate};

#[cfg(feature = "crypto-hash")]
pub use formats::snapshot_checksum;
