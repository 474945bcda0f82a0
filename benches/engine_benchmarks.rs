//! Benchmarks for the identification rule engine's fixpoint loop, both
//! back-ends, over a small synthetic SDF graph.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use dside::engine::{run_to_fixpoint, run_to_fixpoint_parallel};
use dside::rules::standard_rule_catalogue;
use dside::vocab;
use dside_graph::{Graph, GraphBuilder, PropertyValue, ScalarValue};

fn chain_graph(actors: usize) -> Graph {
    let mut b = GraphBuilder::new();
    let mut prev = b.add_vertex("a0", [vocab::ACTOR]);
    for i in 1..actors {
        let next = b.add_vertex(&format!("a{i}"), [vocab::ACTOR]);
        let ch = b.add_edge(prev, next, [vocab::CHANNEL]);
        b.set_edge_property(ch, vocab::PRODUCTION, PropertyValue::Scalar(ScalarValue::Int(1)));
        b.set_edge_property(ch, vocab::CONSUMPTION, PropertyValue::Scalar(ScalarValue::Int(1)));
        prev = next;
    }
    b.build().expect("chain graph is well-formed")
}

fn bench_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("identify_sequential");
    for &n in &[4usize, 16, 64] {
        let g = chain_graph(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &g, |b, g| {
            b.iter(|| {
                let rules = standard_rule_catalogue();
                run_to_fixpoint(g, &rules)
            });
        });
    }
    group.finish();
}

fn bench_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("identify_parallel");
    for &n in &[4usize, 16, 64] {
        let g = chain_graph(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &g, |b, g| {
            b.iter(|| {
                let rules = standard_rule_catalogue();
                run_to_fixpoint_parallel(g, &rules, 4)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sequential, bench_parallel);
criterion_main!(benches);
