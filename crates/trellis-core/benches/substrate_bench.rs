//! # Substrate Benchmarks
//!
//! Performance benchmarks for trellis-core operations.
//!
//! Run with: `cargo bench -p trellis-core`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use trellis_core::{
    Capacities, EdgeKind, EventKind, NodeAttributes, NodeId, NodeKind, Substrate,
};

fn bench_capacities(size: usize) -> Capacities {
    Capacities {
        max_nodes: size.max(1),
        max_edges: size.saturating_mul(2).max(1),
        max_pending_events: size.max(1),
        ..Capacities::default()
    }
}

/// Create a substrate with N nodes and edges between consecutive nodes.
fn create_chain(size: usize) -> Substrate {
    let mut substrate = Substrate::with_capacities(bench_capacities(size));
    let mut prev = None;

    for _ in 0..size {
        let node = substrate
            .add_node(NodeKind::SyntaxTreeNode, b"node", &NodeAttributes::default())
            .expect("add node");
        if let Some(prev) = prev {
            substrate
                .add_edge(prev, node, EdgeKind::Dependency)
                .expect("add edge");
        }
        prev = Some(node);
    }

    substrate
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_node_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("node_insertion");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut substrate = Substrate::with_capacities(bench_capacities(size));
                for _ in 0..size {
                    let _ = substrate.add_node(
                        NodeKind::PageStructureNode,
                        b"payload",
                        &NodeAttributes::default(),
                    );
                }
                black_box(substrate)
            });
        });
    }

    group.finish();
}

fn bench_edge_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("edge_insertion");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(create_chain(size)));
        });
    }

    group.finish();
}

fn bench_event_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_processing");

    for size in [100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut substrate = Substrate::with_capacities(bench_capacities(size));
                let target = substrate
                    .add_node(NodeKind::UiComponent, b"", &NodeAttributes::default())
                    .expect("add node");
                for tick in 0..size {
                    substrate
                        .add_event(EventKind::WebRequest, target, b"body", &[], tick as i64)
                        .expect("enqueue");
                }
                black_box(substrate.process_events().expect("process"))
            });
        });
    }

    group.finish();
}

fn bench_verify_acyclic(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify_acyclic");

    for size in [100, 1000, 10000].iter() {
        let substrate = create_chain(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(substrate.verify_acyclic()));
        });
    }

    group.finish();
}

fn bench_traverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("traverse");

    for size in [100, 1000].iter() {
        let substrate = create_chain(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(substrate.traverse(NodeId(0), 50)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_node_insertion,
    bench_edge_insertion,
    bench_event_processing,
    bench_verify_acyclic,
    bench_traverse
);
criterion_main!(benches);
