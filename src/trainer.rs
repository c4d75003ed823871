//! Supervised trainer: batched backprop against the oracle target.

use crate::agent::Agent;
use crate::checkpoint::CheckpointError;
use crate::game::Hangman;
use crate::stats::{StatsHistory, TrainingStats};
use crate::vocab::Vocabulary;
use rand::Rng;
use std::path::Path;

/// Knobs for a supervised run.
#[derive(Clone, Debug)]
pub struct TrainOptions {
    /// Batched updates to perform.
    pub epochs: u64,
    /// Episodes per update.
    pub batch_size: usize,
    /// Initial learning rate.
    pub learning_rate: f64,
    /// Episodes per plateau window.
    pub window_episodes: u64,
    /// Word length bounds for sampled games.
    pub min_word_len: usize,
    pub max_word_len: usize,
    /// Miss budget per episode.
    pub max_misses: usize,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            epochs: 25_000,
            batch_size: 100,
            learning_rate: 1.0,
            window_episodes: 100_000,
            min_word_len: 1,
            max_word_len: 16,
            max_misses: 26,
        }
    }
}

/// Tracks a moving window of batch performance and signals when a window
/// closes without improving on the previous one.
#[derive(Clone, Debug)]
pub struct PlateauSchedule {
    window: u64,
    seen: u64,
    previous_mean: f64,
    current_sum: f64,
}

/// Result of a completed window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowOutcome {
    Improved(f64),
    Plateaued(f64),
}

impl PlateauSchedule {
    pub fn new(window: u64) -> Self {
        Self {
            window: window.max(1),
            seen: 0,
            previous_mean: 0.0,
            current_sum: 0.0,
        }
    }

    /// Record one batch mean. Returns the outcome when a window closes,
    /// `None` otherwise. A plateaued window does not raise the bar: the
    /// previous best mean stays as the mark to beat.
    pub fn record(&mut self, batch_mean: f64) -> Option<WindowOutcome> {
        self.current_sum += batch_mean;
        self.seen += 1;
        if self.seen % self.window != 0 {
            return None;
        }

        let mean = self.current_sum / self.window as f64;
        self.current_sum = 0.0;
        if mean < self.previous_mean {
            Some(WindowOutcome::Plateaued(mean))
        } else {
            self.previous_mean = mean;
            Some(WindowOutcome::Improved(mean))
        }
    }
}

/// Train an agent with one gradient update per batch of episodes.
///
/// Every window of `window_episodes` episodes the agent is checkpointed
/// and the learning rate is halved if the window's mean performance fell
/// short of the previous window's.
pub fn train<R: Rng + ?Sized, P: AsRef<Path>>(
    agent: &mut Agent,
    vocab: &Vocabulary,
    rng: &mut R,
    checkpoint_path: P,
    opts: &TrainOptions,
) -> Result<StatsHistory<TrainingStats>, CheckpointError> {
    let checkpoint_path = checkpoint_path.as_ref();
    let window = (opts.window_episodes / opts.batch_size as u64).max(1);
    let mut schedule = PlateauSchedule::new(window);
    let mut alpha = opts.learning_rate;
    let mut history = StatsHistory::new();

    for epoch in 0..opts.epochs {
        let mut batch_mean = 0.0;
        for _ in 0..opts.batch_size {
            let game =
                Hangman::sample_bounded(vocab, rng, opts.min_word_len, opts.max_word_len);
            batch_mean += agent.play_episode(game, opts.max_misses) / opts.batch_size as f64;
        }
        agent.update(alpha);
        log::debug!("epoch {} lr {:.4} batch {:.4}", epoch, alpha, batch_mean);

        if let Some(outcome) = schedule.record(batch_mean) {
            agent.save(checkpoint_path)?;
            let (window_mean, improved) = match outcome {
                WindowOutcome::Improved(mean) => (mean, true),
                WindowOutcome::Plateaued(mean) => {
                    alpha /= 2.0;
                    (mean, false)
                }
            };
            let stats = TrainingStats {
                epoch: epoch + 1,
                learning_rate: alpha,
                window_mean,
                improved,
            };
            log::info!("{}", stats.summary());
            history.record(stats);
        }
    }

    Ok(history)
}

/// Play `episodes` games with a fixed network and report the mean score.
/// Gradients accumulate per ranking as always but are never applied, so
/// the weights stay untouched.
pub fn evaluate<R: Rng + ?Sized>(
    agent: &mut Agent,
    vocab: &Vocabulary,
    rng: &mut R,
    episodes: u64,
    opts: &TrainOptions,
) -> f64 {
    let mut mean = 0.0;
    for _ in 0..episodes {
        let game = Hangman::sample_bounded(vocab, rng, opts.min_word_len, opts.max_word_len);
        let secret = game.secret().to_string();
        let score = agent.play_episode(game, opts.max_misses);
        log::debug!("{} {:.3}", secret, score);
        mean += score / episodes as f64;
    }
    mean
}
