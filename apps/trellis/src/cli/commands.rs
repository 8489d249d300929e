//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands. All
//! filesystem access in the workspace happens here; the core only ever sees
//! byte slices.

use crate::config;
use crate::scenario;
use std::path::Path;
use trellis_core::{
    snapshot_checksum, substrate_from_bytes, substrate_to_bytes, EdgeKind, EventKind,
    NodeAttributes, NodeKind, Substrate, SubstrateMetrics, TrellisError,
};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for scenario ingestion (100 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_SCENARIO_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Maximum file size for snapshot inspection (512 MB).
///
/// Matches the core's own pre-deserialization ceiling.
const MAX_SNAPSHOT_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), TrellisError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        TrellisError::IoError(format!("cannot read metadata of '{}': {}", path.display(), e))
    })?;

    if metadata.len() > max_size {
        return Err(TrellisError::IoError(format!(
            "file size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

// =============================================================================
// SHARED HELPERS
// =============================================================================

/// Build an empty substrate, applying capacity overrides from `--config`.
fn build_substrate(config_path: Option<&Path>) -> Result<Substrate, TrellisError> {
    let capacities = match config_path {
        Some(path) => {
            let config = config::load(path)?;
            tracing::info!(config = %path.display(), "applying capacity overrides");
            config.capacities.resolve()
        }
        None => trellis_core::Capacities::default(),
    };
    Ok(Substrate::with_capacities(capacities))
}

/// Read and parse a scenario file.
fn read_scenario(path: &Path) -> Result<scenario::Scenario, TrellisError> {
    validate_file_size(path, MAX_SCENARIO_FILE_SIZE)?;
    let text = std::fs::read_to_string(path).map_err(|e| {
        TrellisError::IoError(format!("cannot read '{}': {}", path.display(), e))
    })?;
    scenario::parse(&text)
}

/// Print a metrics report in the selected output mode.
fn print_metrics(metrics: &SubstrateMetrics, acyclic: bool, json_mode: bool) {
    if json_mode {
        let output = serde_json::json!({
            "metrics": metrics,
            "acyclic": acyclic,
        });
        println!("{output}");
    } else {
        println!("Substrate status:");
        println!(
            "  Nodes:          {} / {} ({}%)",
            metrics.node_count, metrics.node_capacity, metrics.node_utilization_pct
        );
        println!(
            "  Edges:          {} / {} ({}%)",
            metrics.edge_count, metrics.edge_capacity, metrics.edge_utilization_pct
        );
        println!(
            "  Pending events: {} / {}",
            metrics.pending_events, metrics.pending_capacity
        );
        println!("  Next event id:  {}", metrics.next_event_id);
        println!("  Acyclic:        {acyclic}");
    }
}

// =============================================================================
// DEMO COMMAND
// =============================================================================

/// Run the built-in end-to-end scenario: two syntax nodes, one dependency
/// edge, one code edit, one processing pass.
pub fn cmd_demo(config_path: Option<&Path>, json_mode: bool) -> Result<(), TrellisError> {
    let mut substrate = build_substrate(config_path)?;

    let a = substrate.add_node(NodeKind::SyntaxTreeNode, b"a", &NodeAttributes::default())?;
    let b = substrate.add_node(NodeKind::SyntaxTreeNode, b"b", &NodeAttributes::default())?;
    substrate.add_edge(a, b, EdgeKind::Dependency)?;
    let event = substrate.add_event(EventKind::CodeEdit, b, b"insert:x", &[], 0)?;

    tracing::info!(
        node_a = a.0,
        node_b = b.0,
        event = event.0,
        "demo scenario published"
    );

    let applied = substrate.process_events()?;
    let acyclic = substrate.verify_acyclic();

    if json_mode {
        let output = serde_json::json!({
            "nodes": [a.0, b.0],
            "event": event.0,
            "events_applied": applied,
            "pending_after": substrate.pending_count(),
            "acyclic": acyclic,
        });
        println!("{output}");
    } else {
        println!("Demo scenario:");
        println!("  add_node(syntax-tree-node, \"a\")      -> id {}", a.0);
        println!("  add_node(syntax-tree-node, \"b\")      -> id {}", b.0);
        println!("  add_edge({}, {}, dependency)           -> ok", a.0, b.0);
        println!("  add_event(code-edit, {}, \"insert:x\") -> event id {}", b.0, event.0);
        println!("  process_events()                       -> {} applied", applied);
        println!("  pending queue length                   -> {}", substrate.pending_count());
        println!("  verify_acyclic()                       -> {acyclic}");
    }

    Ok(())
}

// =============================================================================
// LOAD COMMAND
// =============================================================================

/// Publish a scenario file, process its events, and report the outcome.
pub fn cmd_load(
    config_path: Option<&Path>,
    json_mode: bool,
    file: &Path,
) -> Result<(), TrellisError> {
    let scenario = read_scenario(file)?;
    let mut substrate = build_substrate(config_path)?;

    let report = scenario::apply(&mut substrate, &scenario)?;
    tracing::info!(
        nodes = report.nodes_added,
        edges = report.edges_added,
        events = report.events_enqueued,
        "scenario published"
    );

    let applied = substrate.process_events()?;
    tracing::info!(applied, "events processed");

    print_metrics(&substrate.metrics(), substrate.verify_acyclic(), json_mode);
    Ok(())
}

// =============================================================================
// VERIFY COMMAND
// =============================================================================

/// Build a scenario's graph (events left pending) and check acyclicity.
pub fn cmd_verify(
    config_path: Option<&Path>,
    json_mode: bool,
    file: &Path,
) -> Result<(), TrellisError> {
    let scenario = read_scenario(file)?;
    let mut substrate = build_substrate(config_path)?;
    scenario::apply(&mut substrate, &scenario)?;

    let acyclic = substrate.verify_acyclic();
    if json_mode {
        println!("{}", serde_json::json!({ "acyclic": acyclic }));
    } else if acyclic {
        println!("Graph is acyclic: a topological order covers all {} nodes", substrate.node_count());
    } else {
        println!("Graph contains a directed cycle");
    }
    Ok(())
}

// =============================================================================
// SNAPSHOT COMMAND
// =============================================================================

/// Publish + process a scenario, then write the snapshot bytes to a file.
///
/// Pending events are never part of a snapshot; processing first makes that
/// explicit rather than surprising.
pub fn cmd_snapshot(
    config_path: Option<&Path>,
    json_mode: bool,
    file: &Path,
    output: &Path,
) -> Result<(), TrellisError> {
    let scenario = read_scenario(file)?;
    let mut substrate = build_substrate(config_path)?;
    scenario::apply(&mut substrate, &scenario)?;
    substrate.process_events()?;

    let bytes = substrate_to_bytes(&substrate)?;
    let checksum = hex(&snapshot_checksum(&bytes));
    std::fs::write(output, &bytes).map_err(|e| {
        TrellisError::IoError(format!("cannot write '{}': {}", output.display(), e))
    })?;

    if json_mode {
        let report = serde_json::json!({
            "output": output.display().to_string(),
            "bytes": bytes.len(),
            "blake3": checksum,
        });
        println!("{report}");
    } else {
        println!("Snapshot written:");
        println!("  Path:   {}", output.display());
        println!("  Size:   {} bytes", bytes.len());
        println!("  BLAKE3: {checksum}");
    }
    Ok(())
}

// =============================================================================
// INSPECT COMMAND
// =============================================================================

/// Read a snapshot file and report the rebuilt substrate's contents.
pub fn cmd_inspect(json_mode: bool, input: &Path) -> Result<(), TrellisError> {
    validate_file_size(input, MAX_SNAPSHOT_FILE_SIZE)?;
    let bytes = std::fs::read(input).map_err(|e| {
        TrellisError::IoError(format!("cannot read '{}': {}", input.display(), e))
    })?;

    let substrate = substrate_from_bytes(&bytes)?;
    tracing::info!(
        nodes = substrate.node_count(),
        edges = substrate.edge_count(),
        "snapshot restored"
    );

    if !json_mode {
        println!("Snapshot: {} ({} bytes)", input.display(), bytes.len());
        println!("  BLAKE3: {}", hex(&snapshot_checksum(&bytes)));
    }
    print_metrics(&substrate.metrics(), substrate.verify_acyclic(), json_mode);
    Ok(())
}

/// Lowercase hex rendering of a digest.
fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_renders_lowercase_pairs() {
        assert_eq!(hex(&[0x00, 0xAB, 0x10]), "00ab10");
    }

    #[test]
    fn build_substrate_without_config_uses_defaults() {
        let substrate = build_substrate(None).expect("build");
        assert_eq!(
            *substrate.capacities(),
            trellis_core::Capacities::default()
        );
    }

    #[test]
    fn missing_scenario_file_is_an_io_error() {
        let result = cmd_load(None, false, Path::new("/nonexistent/scenario.json"));
        assert!(matches!(result, Err(TrellisError::IoError(_))));
    }
}
