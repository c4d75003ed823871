//! Evolutionary trainer: a population of agents bred on episode fitness.

use crate::agent::{Agent, AgentError};
use crate::checkpoint::CheckpointError;
use crate::config::Config;
use crate::game::Hangman;
use crate::stats::{GenerationStats, StatsHistory};
use crate::vocab::Vocabulary;
use rand::Rng;
use rayon::prelude::*;
use std::path::Path;

/// Exponential fitness transform. Convex in the raw performance, so
/// small score gaps widen into strong selection pressure.
#[inline]
pub fn fitness(performance: f64) -> f64 {
    (10.0 * performance).exp2()
}

/// A fixed-size cohort of agents evolved by selection, crossover, and
/// mutation.
pub struct Population {
    pub agents: Vec<Agent>,
    pub history: StatsHistory<GenerationStats>,
    mutation_rate: f64,
    mutation_step: f64,
    games_per_generation: usize,
    min_word_len: usize,
    max_word_len: usize,
    max_misses: usize,
    checkpoint_interval: u64,
    stats_interval: u64,
}

impl Population {
    /// Create a population of freshly randomized agents.
    pub fn new<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Result<Self, AgentError> {
        let mut agents = Vec::with_capacity(config.evolution.population_size);
        for _ in 0..config.evolution.population_size {
            agents.push(Agent::from_topology(
                &config.network.layer_sizes,
                config.network.activation,
                rng,
            )?);
        }
        Ok(Self::with_agents(config, agents))
    }

    /// Seed a population from a saved network: the first agent is the
    /// checkpoint itself, the rest are mutated clones of it.
    pub fn from_checkpoint<R: Rng + ?Sized, P: AsRef<Path>>(
        config: &Config,
        path: P,
        rng: &mut R,
    ) -> Result<Self, AgentError> {
        let elite = Agent::from_checkpoint(path, config.network.activation)?;
        let mut agents = Vec::with_capacity(config.evolution.population_size);
        agents.push(elite);
        for _ in 1..config.evolution.population_size {
            let mut clone = agents[0].clone();
            clone.mutate(
                rng,
                config.evolution.mutation_rate,
                config.evolution.mutation_step,
            );
            agents.push(clone);
        }
        Ok(Self::with_agents(config, agents))
    }

    fn with_agents(config: &Config, agents: Vec<Agent>) -> Self {
        Self {
            agents,
            history: StatsHistory::new(),
            mutation_rate: config.evolution.mutation_rate,
            mutation_step: config.evolution.mutation_step,
            games_per_generation: config.evolution.games_per_generation,
            min_word_len: config.evolution.min_word_len,
            max_word_len: config.evolution.max_word_len,
            max_misses: config.game.max_misses,
            checkpoint_interval: config.evolution.checkpoint_interval,
            stats_interval: config.logging.stats_interval.max(1),
        }
    }

    pub fn size(&self) -> usize {
        self.agents.len()
    }

    /// Run the evolutionary loop for `generations` generations,
    /// checkpointing the best agent at each interval boundary.
    pub fn evolve<R: Rng + ?Sized, P: AsRef<Path>>(
        &mut self,
        vocab: &Vocabulary,
        rng: &mut R,
        checkpoint_path: P,
        generations: u64,
    ) -> Result<(), CheckpointError> {
        let checkpoint_path = checkpoint_path.as_ref();

        for gen in 0..generations {
            // Every agent faces the same words this generation.
            let games: Vec<Hangman> = (0..self.games_per_generation)
                .map(|_| Hangman::sample_bounded(vocab, rng, self.min_word_len, self.max_word_len))
                .collect();

            let scores = self.evaluate(&games);
            let fitnesses: Vec<f64> = scores.iter().map(|&p| fitness(p)).collect();
            let total: f64 = fitnesses.iter().sum();

            let best = fitnesses
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(i, _)| i)
                .unwrap_or(0);

            let stats = GenerationStats {
                generation: gen + 1,
                mean_performance: scores.iter().sum::<f64>() / scores.len() as f64,
                best_performance: scores[best],
                best_fitness: fitnesses[best],
                fitness_total: total,
            };
            if (gen + 1) % self.stats_interval == 0 {
                log::info!("{}", stats.summary());
            }
            self.history.record(stats);

            if (gen + 1) % self.checkpoint_interval == 0 {
                self.agents[best].save(checkpoint_path)?;
                log::info!(
                    "checkpointed best agent at generation {} to {}",
                    gen + 1,
                    checkpoint_path.display()
                );
            }

            self.agents = self.breed(best, total, &fitnesses, rng);
        }
        Ok(())
    }

    /// Mean episode score per agent over a shared set of games.
    ///
    /// Agents are independent, so the evaluation fans out across
    /// threads; play is deterministic given weights, which keeps seeded
    /// runs reproducible regardless of scheduling.
    fn evaluate(&mut self, games: &[Hangman]) -> Vec<f64> {
        let max_misses = self.max_misses;
        self.agents
            .par_iter_mut()
            .map(|agent| {
                games
                    .iter()
                    .map(|game| agent.play_episode(game.clone(), max_misses))
                    .sum::<f64>()
                    / games.len() as f64
            })
            .collect()
    }

    /// Produce the next generation. The best agent survives unmodified
    /// at index 0; the first half of the remainder are mutated clones of
    /// roulette-selected parents, the second half also cross over with a
    /// second selected parent before mutation.
    fn breed<R: Rng + ?Sized>(
        &self,
        best: usize,
        total: f64,
        fitnesses: &[f64],
        rng: &mut R,
    ) -> Vec<Agent> {
        let size = self.agents.len();
        let mut next = Vec::with_capacity(size);
        next.push(self.agents[best].clone());

        for i in 1..size {
            let parent = roulette(fitnesses, total, rng);
            let mut child = self.agents[parent].clone();
            if i > size / 2 {
                let partner = roulette(fitnesses, total, rng);
                child.crossover_from(&self.agents[partner], rng);
            }
            child.mutate(rng, self.mutation_rate, self.mutation_step);
            next.push(child);
        }
        next
    }
}

/// Fitness-proportional selection: a uniform draw over the fitness mass,
/// resolved by walking the prefix sum.
fn roulette<R: Rng + ?Sized>(fitnesses: &[f64], total: f64, rng: &mut R) -> usize {
    let val = rng.gen::<f64>() * total;
    let mut acc = 0.0;
    for (i, f) in fitnesses.iter().enumerate() {
        acc += f;
        if acc >= val {
            return i;
        }
    }
    // Float round-off can leave the walk just short of the last slot.
    fitnesses.len() - 1
}
