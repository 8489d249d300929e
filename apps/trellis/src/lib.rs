//! # Trellis - THE BINARY (library surface)
//!
//! Modules backing the `trellis` CLI. Split out as a library so integration
//! tests can drive command implementations directly.

pub mod cli;
pub mod config;
pub mod scenario;
