//! # CLI Integration Tests
//!
//! Drive the command implementations end to end through real files.

use std::io::Write;
use tempfile::NamedTempFile;
use trellis::cli::{cmd_inspect, cmd_load, cmd_snapshot, cmd_verify};
use trellis_core::TrellisError;

fn scenario_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write scenario");
    file
}

const ACYCLIC_SCENARIO: &str = r#"{
    "nodes": [
        {"kind": "syntax-tree-node", "payload": "a"},
        {"kind": "syntax-tree-node", "payload": "b"}
    ],
    "edges": [
        {"from": 0, "to": 1, "kind": "dependency"}
    ],
    "events": [
        {"kind": "code-edit", "target": 1, "payload": "insert:x"}
    ]
}"#;

const CYCLIC_SCENARIO: &str = r#"{
    "nodes": [
        {"kind": "computation", "payload": "a"},
        {"kind": "computation", "payload": "b"}
    ],
    "edges": [
        {"from": 0, "to": 1, "kind": "data-flow"},
        {"from": 1, "to": 0, "kind": "data-flow"}
    ]
}"#;

#[test]
fn load_processes_a_scenario_file() {
    let file = scenario_file(ACYCLIC_SCENARIO);
    cmd_load(None, true, file.path()).expect("load succeeds");
}

#[test]
fn verify_accepts_both_outcomes() {
    let acyclic = scenario_file(ACYCLIC_SCENARIO);
    cmd_verify(None, true, acyclic.path()).expect("verify acyclic");

    let cyclic = scenario_file(CYCLIC_SCENARIO);
    cmd_verify(None, true, cyclic.path()).expect("verify cyclic still reports, not errors");
}

#[test]
fn snapshot_then_inspect_roundtrip() {
    let file = scenario_file(ACYCLIC_SCENARIO);
    let output = NamedTempFile::new().expect("temp output");

    cmd_snapshot(None, true, file.path(), output.path()).expect("snapshot");
    cmd_inspect(true, output.path()).expect("inspect");
}

#[test]
fn inspect_rejects_garbage() {
    let garbage = scenario_file("definitely not a snapshot");
    let result = cmd_inspect(true, garbage.path());
    assert!(matches!(
        result,
        Err(TrellisError::DeserializationError(_))
    ));
}

#[test]
fn config_overrides_capacities() {
    let mut config = NamedTempFile::new().expect("temp config");
    config
        .write_all(b"[capacities]\nmax_nodes = 1\n")
        .expect("write config");

    let file = scenario_file(ACYCLIC_SCENARIO);
    let result = cmd_load(Some(config.path()), true, file.path());
    assert!(matches!(
        result,
        Err(TrellisError::CapacityExceeded { arena: "node", .. })
    ));
}
