//! # Property-Based Tests
//!
//! Verification of the substrate's structural invariants under arbitrary
//! inputs: dense id assignment, counter effects, replay determinism, and
//! acyclicity of forests.

use proptest::collection::vec;
use proptest::prelude::*;
use trellis_core::{
    Capacities, EdgeKind, EventKind, NodeAttributes, NodeKind, Substrate, TrellisError,
};

fn node_kind(index: usize) -> NodeKind {
    NodeKind::ALL[index % NodeKind::ALL.len()]
}

fn event_kind(index: usize) -> EventKind {
    EventKind::ALL[index % EventKind::ALL.len()]
}

proptest! {
    /// The nth successful add_node call (1-indexed) returns id n-1.
    #[test]
    fn node_ids_are_dense(payloads in vec(vec(any::<u8>(), 0..32), 1..50)) {
        let mut substrate = Substrate::new();

        for (index, payload) in payloads.iter().enumerate() {
            let id = substrate
                .add_node(node_kind(index), payload, &NodeAttributes::default())
                .expect("add node");
            prop_assert_eq!(id.0, index as u64);
        }
        prop_assert_eq!(substrate.node_count(), payloads.len());
    }

    /// Every accepted edge bumps child_count(from) and parent_count(to) by
    /// exactly one and grows the edge count by exactly one.
    #[test]
    fn edge_counters_increase_by_one(pairs in vec((0u64..20, 0u64..20), 1..60)) {
        let mut substrate = Substrate::new();
        for _ in 0..20 {
            substrate
                .add_node(NodeKind::Computation, b"n", &NodeAttributes::default())
                .expect("add node");
        }

        for (from, to) in pairs {
            let from = trellis_core::NodeId(from);
            let to = trellis_core::NodeId(to);

            let children_before = substrate.get_node(from).expect("from").child_count;
            let parents_before = substrate.get_node(to).expect("to").parent_count;
            let edges_before = substrate.edge_count();

            match substrate.add_edge(from, to, EdgeKind::Dependency) {
                Ok(()) => {
                    prop_assert_ne!(from, to);
                    prop_assert_eq!(
                        substrate.get_node(from).expect("from").child_count,
                        children_before + 1
                    );
                    prop_assert_eq!(
                        substrate.get_node(to).expect("to").parent_count,
                        parents_before + 1
                    );
                    prop_assert_eq!(substrate.edge_count(), edges_before + 1);
                }
                Err(TrellisError::SelfLoop(id)) => {
                    prop_assert_eq!(from, to);
                    prop_assert_eq!(id, from);
                    prop_assert_eq!(substrate.edge_count(), edges_before);
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }
    }

    /// A substrate at node capacity rejects every further add_node and the
    /// count stays put.
    #[test]
    fn node_capacity_failure_is_clean(extra in 1usize..5) {
        let caps = Capacities { max_nodes: 8, ..Capacities::default() };
        let mut substrate = Substrate::with_capacities(caps);
        for _ in 0..8 {
            substrate
                .add_node(NodeKind::UiComponent, b"x", &NodeAttributes::default())
                .expect("add node");
        }

        for _ in 0..extra {
            let result =
                substrate.add_node(NodeKind::UiComponent, b"x", &NodeAttributes::default());
            let is_node_capacity_error =
                matches!(result, Err(TrellisError::CapacityExceeded { arena: "node", .. }));
            prop_assert!(is_node_capacity_error);
            prop_assert_eq!(substrate.node_count(), 8);
        }
    }

    /// Identical ordered event sequences on identically seeded substrates
    /// yield byte-identical final payloads.
    #[test]
    fn replay_is_deterministic(
        script in vec((0usize..5, vec(any::<u8>(), 0..24), 0usize..3), 0..40)
    ) {
        let run = || {
            let mut substrate = Substrate::new();
            let targets: Vec<_> = (0..3)
                .map(|index| {
                    substrate
                        .add_node(node_kind(index), b"seed", &NodeAttributes::default())
                        .expect("add node")
                })
                .collect();

            for (tick, (kind, payload, target)) in script.iter().enumerate() {
                substrate
                    .add_event(event_kind(*kind), targets[*target], payload, &[], tick as i64)
                    .expect("enqueue");
            }
            substrate.process_events().expect("process");

            targets
                .iter()
                .map(|&id| substrate.get_node(id).expect("node").payload.clone())
                .collect::<Vec<_>>()
        };

        prop_assert_eq!(run(), run());
    }

    /// After a successful pass the queue is empty, whatever was enqueued.
    #[test]
    fn queue_fully_drains(count in 0usize..50) {
        let mut substrate = Substrate::new();
        let target = substrate
            .add_node(NodeKind::ExternalDataSource, b"", &NodeAttributes::default())
            .expect("add node");

        for tick in 0..count {
            substrate
                .add_event(EventKind::WebRequest, target, b"r", &[], tick as i64)
                .expect("enqueue");
        }
        let applied = substrate.process_events().expect("process");

        prop_assert_eq!(applied, count);
        prop_assert_eq!(substrate.pending_count(), 0);
    }

    /// Event ids stay strictly monotonic across arbitrary drain boundaries.
    #[test]
    fn event_ids_monotonic_across_drains(batches in vec(1usize..8, 1..6)) {
        let mut substrate = Substrate::new();
        let target = substrate
            .add_node(NodeKind::SyntaxTreeNode, b"", &NodeAttributes::default())
            .expect("add node");

        let mut expected = 0u64;
        for batch in batches {
            for tick in 0..batch {
                let id = substrate
                    .add_event(EventKind::CodeEdit, target, b"e", &[], tick as i64)
                    .expect("enqueue");
                prop_assert_eq!(id.0, expected);
                expected += 1;
            }
            substrate.process_events().expect("process");
        }
    }

    /// Linking only existing nodes to freshly created nodes builds a forest,
    /// which is always acyclic.
    #[test]
    fn forests_are_acyclic(children_per_node in vec(0usize..4, 1..20)) {
        let mut substrate = Substrate::new();
        let root = substrate
            .add_node(NodeKind::SyntaxTreeNode, b"root", &NodeAttributes::default())
            .expect("add node");

        let mut frontier = vec![root];
        for (index, &fanout) in children_per_node.iter().enumerate() {
            let parent = frontier[index % frontier.len()];
            for _ in 0..fanout {
                let child = substrate
                    .add_node(NodeKind::SyntaxTreeNode, b"c", &NodeAttributes::default())
                    .expect("add node");
                substrate
                    .add_edge(parent, child, EdgeKind::Dependency)
                    .expect("add edge");
                frontier.push(child);
            }
        }

        prop_assert!(substrate.verify_acyclic());
    }
}
