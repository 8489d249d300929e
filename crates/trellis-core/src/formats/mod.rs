//! # Formats
//!
//! Byte-level serialization formats for the substrate.
//!
//! Pure transformations only: the core never touches the filesystem. Callers
//! that want durability write these bytes wherever they persist state.

pub mod snapshot;

pub use snapshot::{
    substrate_from_bytes, substrate_to_bytes, SerializableSubstrate, SnapshotHeader,
};

#[cfg(feature = "crypto-hash")]
pub use snapshot::snapshot_checksum;
