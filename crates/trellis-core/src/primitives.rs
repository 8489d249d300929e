//! # Innate Primitives
//!
//! Hardcoded default capacities and format constants for the Trellis
//! substrate.
//!
//! These are the compile-time defaults behind `Capacities::default()`; a
//! substrate may be constructed with different limits, but whatever limits it
//! is given are fixed for its lifetime.

/// Default maximum number of nodes.
///
/// The node arena is allocated once, to this many records, at construction.
pub const MAX_NODES: usize = 16_384;

/// Default maximum number of edges.
pub const MAX_EDGES: usize = 65_536;

/// Default maximum number of pending (unprocessed) events.
///
/// The queue is a working buffer between processing passes, not a log, so it
/// is sized for one tick's worth of occurrences.
pub const MAX_PENDING_EVENTS: usize = 4_096;

/// Per-node and per-event payload size ceiling (1 MiB).
pub const MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Per-node metadata size ceiling (64 KiB).
pub const MAX_METADATA_BYTES: usize = 64 * 1024;

/// Maximum number of causal parents a single event may declare.
pub const MAX_CAUSAL_PARENTS: usize = 64;

/// Maximum traversal depth for graph queries.
///
/// All queries must be computationally bounded; deeper requests are clamped.
pub const MAX_TRAVERSAL_DEPTH: usize = 100;

/// Default weight assigned by `add_edge` when the caller does not supply one.
pub const DEFAULT_EDGE_WEIGHT: i64 = 1;

/// Magic bytes for the Trellis snapshot format header.
///
/// Snapshot = Magic Bytes ("TRLS") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"TRLS";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the snapshot format.
pub const FORMAT_VERSION: u8 = 1;
