use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use finite_automata::prelude::*;

fn params(states: usize) -> RandomParams {
    RandomParams {
        symbols: 3,
        states,
        transition_probability: 0.15,
        epsilon_probability: 0.05,
        accepting_probability: 0.3,
    }
}

fn bench_determinize(c: &mut Criterion) {
    let mut group = c.benchmark_group("determinize");
    for states in [4, 8, 12, 16] {
        let mut rng = fastrand::Rng::with_seed(states as u64);
        let nfa = random_automaton(&mut rng, &params(states));
        group.bench_with_input(BenchmarkId::from_parameter(states), &nfa, |b, nfa| {
            b.iter(|| determinize(black_box(nfa)))
        });
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let mut rng = fastrand::Rng::with_seed(42);
    let nfa = random_automaton(&mut rng, &params(12));
    let dfa = determinize(&nfa);
    let words = (0..64)
        .map(|_| random_word(&mut rng, nfa.alphabet(), 8, 32))
        .collect::<Vec<_>>();

    group.bench_function("nfa", |b| {
        b.iter(|| {
            words
                .iter()
                .filter(|w| classify_with_epsilon(black_box(&nfa), w).is_accepted())
                .count()
        })
    });
    group.bench_function("dfa", |b| {
        b.iter(|| {
            words
                .iter()
                .filter(|w| classify(black_box(&dfa), w).is_accepted())
                .count()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_determinize, bench_classify);
criterion_main!(benches);
