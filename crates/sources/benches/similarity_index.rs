//! Benchmarks for neighbor retrieval
//!
//! Run with: cargo bench --package sources
//!
//! Uses a synthetic population so the benchmark runs without a dataset.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{User, UserStore};
use sources::SimilarityIndex;

fn synthetic_store(users: usize, dims: usize) -> UserStore {
    let mut store = UserStore::new();
    for id in 0..users {
        // Deterministic, varied vectors without pulling in an RNG
        let embedding = (0..dims)
            .map(|d| (((id * 31 + d * 17) % 97) as f32 / 97.0) - 0.5)
            .collect();
        store.insert_user(
            User::new(id, format!("user{id}"), 30.0, 48.0, 17.0).with_embedding(embedding),
        );
    }
    store
}

fn bench_build(c: &mut Criterion) {
    let store = synthetic_store(1_000, 32);

    c.bench_function("similarity_index_build_1k", |b| {
        b.iter(|| {
            let index = SimilarityIndex::build(black_box(&store), black_box(50));
            black_box(index)
        })
    });
}

fn bench_query(c: &mut Criterion) {
    let store = synthetic_store(1_000, 32);
    let index = SimilarityIndex::build(&store, 50);

    c.bench_function("similarity_index_query", |b| {
        b.iter(|| {
            let list = index.query(black_box(500), black_box(50));
            black_box(list)
        })
    });
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);
