//! Benchmark for single diffusion trials.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use influmax::diffusion::{independent_cascade, linear_threshold};
use influmax::graph::Network;

fn ring_with_chords(n: usize) -> Network {
    let mut edges: Vec<(usize, usize)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    edges.extend((0..n).step_by(7).map(|i| (i, (i + n / 2) % n)));
    Network::undirected(n, &edges)
}

fn bench_cascade(c: &mut Criterion) {
    let net = ring_with_chords(1000);
    let seeds: Vec<usize> = (0..10).map(|i| i * 100).collect();

    c.bench_function("icm_trial_1000_nodes", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        b.iter(|| independent_cascade(black_box(&net), black_box(&seeds), 0.1, &mut rng))
    });
}

fn bench_threshold(c: &mut Criterion) {
    let net = ring_with_chords(1000);
    let seeds: Vec<usize> = (0..10).map(|i| i * 100).collect();

    c.bench_function("ltm_trial_1000_nodes", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        b.iter(|| linear_threshold(black_box(&net), black_box(&seeds), &mut rng))
    });
}

criterion_group!(benches, bench_cascade, bench_threshold);
criterion_main!(benches);
