//! # Snapshot Format
//!
//! Binary serialization of a substrate's durable state.
//!
//! Format: Header (5 bytes) + postcard-serialized substrate data.
//! - 4 bytes: Magic ("TRLS")
//! - 1 byte: Version
//!
//! The pending event queue is deliberately excluded: it is a working buffer,
//! not a log, and events must not outlive their drain through a snapshot.
//! The event-id watermark IS included, so ids stay lifetime-unique across a
//! save/restore cycle.
//!
//! ## Validation
//!
//! Pre-deserialization checks run before payload parsing:
//! - Minimum data size (header must be present)
//! - Maximum payload size (prevents allocation-based DoS)
//! - Header magic bytes and version

use serde::{Deserialize, Serialize};

use crate::primitives;
use crate::substrate::Substrate;
use crate::types::{Capacities, Edge, Node, TrellisError};

// =============================================================================
// SIZE LIMITS
// =============================================================================

/// Maximum allowed snapshot size.
///
/// Validated BEFORE attempting deserialization to prevent memory-exhaustion
/// from corrupted or malicious data.
pub const MAX_SNAPSHOT_BYTES: usize = 512 * 1024 * 1024; // 512 MB

/// Minimum valid snapshot size (header only).
const MIN_SNAPSHOT_BYTES: usize = 5;

// =============================================================================
// HEADER
// =============================================================================

/// The snapshot header precedes all substrate data.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl SnapshotHeader {
    /// Create a new header with the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Validate magic and version.
    pub fn validate(&self) -> Result<(), TrellisError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(TrellisError::DeserializationError(
                "invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(TrellisError::DeserializationError(format!(
                "unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write the header to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 5] {
        let mut bytes = [0u8; 5];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read a header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TrellisError> {
        if bytes.len() < MIN_SNAPSHOT_BYTES {
            return Err(TrellisError::DeserializationError(
                "header too short".to_string(),
            ));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZABLE FORM
// =============================================================================

/// The durable state of a substrate: everything except the pending queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableSubstrate {
    pub capacities: Capacities,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub next_event_id: u64,
}

impl From<&Substrate> for SerializableSubstrate {
    fn from(substrate: &Substrate) -> Self {
        Self {
            capacities: *substrate.capacities(),
            nodes: substrate.nodes().cloned().collect(),
            edges: substrate.edges().copied().collect(),
            next_event_id: substrate.next_event_id(),
        }
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a substrate to bytes (header + payload).
///
/// A pure transformation; no file I/O. Pending events are not included —
/// callers needing them must persist them before a drain.
pub fn substrate_to_bytes(substrate: &Substrate) -> Result<Vec<u8>, TrellisError> {
    let header = SnapshotHeader::new();
    let serializable = SerializableSubstrate::from(substrate);

    let payload = postcard::to_stdvec(&serializable)
        .map_err(|e| TrellisError::SerializationError(e.to_string()))?;

    let mut result = Vec::new();
    result
        .try_reserve_exact(MIN_SNAPSHOT_BYTES + payload.len())
        .map_err(|_| TrellisError::AllocationFailure(MIN_SNAPSHOT_BYTES + payload.len()))?;
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);

    Ok(result)
}

/// Deserialize a substrate from bytes.
///
/// Size and header are validated before the payload is parsed; the rebuilt
/// records are validated against the snapshot's own capacities (dense ids,
/// existing endpoints) before the substrate is returned.
pub fn substrate_from_bytes(bytes: &[u8]) -> Result<Substrate, TrellisError> {
    if bytes.len() < MIN_SNAPSHOT_BYTES {
        return Err(TrellisError::DeserializationError(
            "data too short: minimum 5 bytes required".to_string(),
        ));
    }
    if bytes.len() > MAX_SNAPSHOT_BYTES {
        return Err(TrellisError::DeserializationError(format!(
            "data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_SNAPSHOT_BYTES
        )));
    }

    let header = SnapshotHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = &bytes[MIN_SNAPSHOT_BYTES..];
    let serializable: SerializableSubstrate = postcard::from_bytes(payload).map_err(|e| {
        TrellisError::DeserializationError(format!("failed to deserialize substrate data: {}", e))
    })?;

    Substrate::from_parts(
        serializable.capacities,
        serializable.nodes,
        serializable.edges,
        serializable.next_event_id,
    )
}

/// BLAKE3 checksum of snapshot bytes, for callers that verify what they
/// persisted.
#[cfg(feature = "crypto-hash")]
#[must_use]
pub fn snapshot_checksum(bytes: &[u8]) -> [u8; 32] {
    *blake3::hash(bytes).as_bytes()
}

// =============================================================================
// TESTS
// =============================================================================
