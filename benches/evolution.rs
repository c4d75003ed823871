//! Performance benchmarks for GALLOWS

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gallows::population::Population;
use gallows::{Activation, Agent, Config, Hangman};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn benchmark_forward_pass(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut agent =
        Agent::from_topology(&[432, 229, 26], Activation::Logistic, &mut rng).unwrap();
    let input = gallows::agent::encode_state("ha g an");

    c.bench_function("forward_432_229_26", |b| {
        b.iter(|| agent.brain.infer(black_box(&input)));
    });
}

fn benchmark_episode(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut agent =
        Agent::from_topology(&[432, 229, 26], Activation::Logistic, &mut rng).unwrap();

    c.bench_function("episode_hangman", |b| {
        b.iter(|| agent.play_episode(black_box(Hangman::with_word("hangman")), 26));
    });
}

fn benchmark_generation(c: &mut Criterion) {
    let vocab = gallows::Vocabulary::from_words([
        "cat", "dog", "bird", "fish", "lion", "wolf", "bear", "horse",
    ]);

    let mut group = c.benchmark_group("generation");
    group.sample_size(10);

    for population_size in [10, 25] {
        let mut config = Config::default();
        config.network.layer_sizes = vec![432, 32, 26];
        config.evolution.population_size = population_size;
        config.evolution.games_per_generation = 5;
        config.evolution.min_word_len = 3;
        config.evolution.max_word_len = 8;

        group.bench_function(format!("population_{}", population_size), |b| {
            b.iter(|| {
                let mut rng = ChaCha8Rng::seed_from_u64(42);
                let mut population = Population::new(&config, &mut rng).unwrap();
                population
                    .evolve(&vocab, &mut rng, "/tmp/gallows_bench_ckpt.txt", 1)
                    .unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_forward_pass,
    benchmark_episode,
    benchmark_generation
);
criterion_main!(benches);
