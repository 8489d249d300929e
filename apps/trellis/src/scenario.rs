//! # Scenario Files
//!
//! JSON descriptions of nodes, edges, and events to publish into a
//! substrate. Scenarios are the CLI's stand-in for real collaborators: each
//! record becomes one `add_node`/`add_edge`/`add_event` call, in file order.
//!
//! Node and event records rely on the substrate's dense/monotonic id
//! assignment: the Nth node record gets id N-1, so `from`/`to`/`target`
//! fields refer to record positions, and event `parents` refer to prior
//! event records the same way.

use serde::Deserialize;
use trellis_core::{
    EdgeKind, EdgeWeight, EventId, EventKind, NodeAttributes, NodeId, NodeKind, Span, Substrate,
    TrellisError,
};

/// A batch of publications for one substrate.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
    #[serde(default)]
    pub events: Vec<EventSpec>,
}

/// One node publication. Kind tags are the substrate's kebab-case names
/// (`syntax-tree-node`, `ui-component`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct NodeSpec {
    pub kind: NodeKind,
    #[serde(default)]
    pub payload: String,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub readonly_span: Option<(usize, usize)>,
    #[serde(default)]
    pub metadata: String,
}

/// One edge publication; `from`/`to` are node ids.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeSpec {
    pub from: u64,
    pub to: u64,
    pub kind: EdgeKind,
    #[serde(default)]
    pub weight: Option<i64>,
}

/// One event publication; `target` is a node id, `parents` are event ids.
#[derive(Debug, Clone, Deserialize)]
pub struct EventSpec {
    pub kind: EventKind,
    pub target: u64,
    #[serde(default)]
    pub payload: String,
    #[serde(default)]
    pub parents: Vec<u64>,
    #[serde(default)]
    pub timestamp: i64,
}

/// What a scenario application did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioReport {
    pub nodes_added: usize,
    pub edges_added: usize,
    pub events_enqueued: usize,
}

/// Parse a scenario from JSON text.
pub fn parse(json: &str) -> Result<Scenario, TrellisError> {
    serde_json::from_str(json).map_err(|e| TrellisError::DeserializationError(e.to_string()))
}

/// Publish a scenario into a substrate, in file order. Stops at the first
/// rejected record; the substrate is left exactly as the successful prefix
/// built it.
pub fn apply(substrate: &mut Substrate, scenario: &Scenario) -> Result<ScenarioReport, TrellisError> {
    for spec in &scenario.nodes {
        let attributes = NodeAttributes {
            readonly: spec.readonly,
            readonly_span: spec
                .readonly_span
                .map(|(start, end)| Span::new(start, end))
                .unwrap_or_default(),
            metadata: spec.metadata.clone().into_bytes(),
        };
        substrate.add_node(spec.kind, spec.payload.as_bytes(), &attributes)?;
    }

    for spec in &scenario.edges {
        let from = NodeId(spec.from);
        let to = NodeId(spec.to);
        match spec.weight {
            Some(weight) => {
                substrate.add_edge_weighted(from, to, spec.kind, EdgeWeight::new(weight))?;
            }
            None => substrate.add_edge(from, to, spec.kind)?,
        }
    }

    for spec in &scenario.events {
        let parents: Vec<EventId> = spec.parents.iter().map(|&id| EventId(id)).collect();
        substrate.add_event(
            spec.kind,
            NodeId(spec.target),
            spec.payload.as_bytes(),
            &parents,
            spec.timestamp,
        )?;
    }

    Ok(ScenarioReport {
        nodes_added: scenario.nodes.len(),
        edges_added: scenario.edges.len(),
        events_enqueued: scenario.events.len(),
    })
}

// =============================================================================
// TESTS
// =============================================================================
