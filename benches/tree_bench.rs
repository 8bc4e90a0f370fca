//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use complete_tree::{BinaryTree, CompleteTree};

fn benchmark_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for n in [1_000usize, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let tree: CompleteTree<usize> = (0..n).collect();
                black_box(tree.len())
            });
        });
    }
    group.finish();
}

fn benchmark_remove(c: &mut Criterion) {
    let tree: CompleteTree<usize> = (0..10_000).collect();

    c.bench_function("remove_root_n=10000", |b| {
        b.iter_batched(
            || tree.clone(),
            |mut tree| {
                let root = *tree.root().unwrap();
                black_box(tree.remove(&root).unwrap())
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn benchmark_traversal(c: &mut Criterion) {
    let tree: CompleteTree<usize> = (0..10_000).collect();

    c.bench_function("element_at_n=10000", |b| {
        b.iter(|| black_box(tree.element_at(black_box(9_999)).unwrap()));
    });
    c.bench_function("search_miss_n=10000", |b| {
        b.iter(|| black_box(tree.search(black_box(&usize::MAX))));
    });
}

criterion_group!(benches, benchmark_insert, benchmark_remove, benchmark_traversal);
criterion_main!(benches);
