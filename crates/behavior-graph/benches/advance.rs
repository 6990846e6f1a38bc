//! Measures one `Graph::advance` over wide and deep graphs whose leaves
//! never complete, so every tick updates the whole active set.

use behavior_graph::{Action, Context, Graph, Parallel, Sequence, Status, Wait};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

#[derive(Default)]
struct Counter {
    updates: u64,
}

fn busy(ctx: &mut Context<'_, Counter>) -> Status {
    ctx.blackboard_mut().updates += 1;
    Status::Running
}

fn wide_graph(leaves: usize) -> Graph<Counter> {
    let mut builder = Graph::builder(Counter::default());
    let mut children = Vec::with_capacity(leaves);
    for i in 0..leaves {
        if i % 2 == 0 {
            children.push(builder.add(Action::new(busy)));
        } else {
            children.push(builder.add(Wait::new(f32::MAX)));
        }
    }
    let root = builder.add(Parallel::new(children));
    let mut graph = builder
        .with_root(root)
        .build()
        .expect("bench graph is well formed");
    graph.start();
    graph
}

fn deep_graph(depth: usize) -> Graph<Counter> {
    let mut builder = Graph::builder(Counter::default());
    let mut top = builder.add(Action::new(busy));
    for _ in 0..depth {
        top = builder.add(Sequence::new(vec![top]));
    }
    let mut graph = builder.build().expect("bench graph is well formed");
    graph.start();
    graph
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("behavior-graph/advance");

    for leaves in [16usize, 128, 1024] {
        let mut graph = wide_graph(leaves);
        group.bench_with_input(BenchmarkId::new("wide", leaves), &leaves, |b, _| {
            b.iter(|| black_box(graph.advance(black_box(0.016))))
        });
    }

    for depth in [8usize, 64] {
        let mut graph = deep_graph(depth);
        group.bench_with_input(BenchmarkId::new("deep", depth), &depth, |b, _| {
            b.iter(|| black_box(graph.advance(black_box(0.016))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_advance);
criterion_main!(benches);
