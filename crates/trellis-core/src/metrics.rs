//! # Substrate Metrics
//!
//! Occupancy counts for status reporting. Utilization is integer percent;
//! the core performs no floating-point arithmetic.

use serde::Serialize;

use crate::substrate::Substrate;

/// A point-in-time occupancy report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubstrateMetrics {
    pub node_count: usize,
    pub node_capacity: usize,
    pub node_utilization_pct: u64,
    pub edge_count: usize,
    pub edge_capacity: usize,
    pub edge_utilization_pct: u64,
    pub pending_events: usize,
    pub pending_capacity: usize,
    pub next_event_id: u64,
}

impl SubstrateMetrics {
    /// Snapshot the current counts of a substrate.
    #[must_use]
    pub fn from_substrate(substrate: &Substrate) -> Self {
        let caps = substrate.capacities();
        Self {
            node_count: substrate.node_count(),
            node_capacity: caps.max_nodes,
            node_utilization_pct: utilization_pct(substrate.node_count(), caps.max_nodes),
            edge_count: substrate.edge_count(),
            edge_capacity: caps.max_edges,
            edge_utilization_pct: utilization_pct(substrate.edge_count(), caps.max_edges),
            pending_events: substrate.pending_count(),
            pending_capacity: caps.max_pending_events,
            next_event_id: substrate.next_event_id(),
        }
    }
}

/// Integer percentage of `count` against `capacity`; zero capacity reads as
/// fully unutilized rather than dividing by zero.
fn utilization_pct(count: usize, capacity: usize) -> u64 {
    if capacity == 0 {
        return 0;
    }
    ((count as u64).saturating_mul(100)) / capacity as u64
}

// =============================================================================
// TESTS
// =============================================================================
