//! Progress snapshots for both trainers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Snapshot of one evolutionary generation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: u64,
    /// Mean raw performance across the population, in [0, 1].
    pub mean_performance: f64,
    /// Best agent's raw performance.
    pub best_performance: f64,
    /// Best agent's transformed fitness.
    pub best_fitness: f64,
    /// Population fitness total (the roulette denominator).
    pub fitness_total: f64,
}

impl GenerationStats {
    /// One-line summary for progress logging.
    pub fn summary(&self) -> String {
        format!(
            "Gen:{:5} | Mean:{:.3} | Best:{:.3} | Fit:{:.1}",
            self.generation, self.mean_performance, self.best_performance, self.best_fitness
        )
    }
}

/// Snapshot of one completed supervised training window.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Epoch index at the end of the window.
    pub epoch: u64,
    /// Learning rate in effect after any plateau halving.
    pub learning_rate: f64,
    /// Mean batch performance over the window.
    pub window_mean: f64,
    /// Whether the window improved on the previous one.
    pub improved: bool,
}

impl TrainingStats {
    pub fn summary(&self) -> String {
        format!(
            "Epoch:{:6} | Window:{:.4} | LR:{:.4}{}",
            self.epoch,
            self.window_mean,
            self.learning_rate,
            if self.improved { "" } else { " | plateau" }
        )
    }
}

/// An append-only series of snapshots with JSON persistence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatsHistory<T> {
    pub snapshots: Vec<T>,
}

impl<T> Default for StatsHistory<T> {
    fn default() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }
}

impl<T> StatsHistory<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, snapshot: T) {
        self.snapshots.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn last(&self) -> Option<&T> {
        self.snapshots.last()
    }
}

impl<T: Serialize> StatsHistory<T> {
    /// Save the whole series to a JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}

impl<T: DeserializeOwned> StatsHistory<T> {
    /// Load a series previously written by `save_json`.
    pub fn load_json<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_roundtrip() {
        let mut history = StatsHistory::new();
        history.record(GenerationStats {
            generation: 1,
            mean_performance: 0.25,
            best_performance: 0.5,
            best_fitness: 32.0,
            fitness_total: 96.0,
        });
        history.record(GenerationStats {
            generation: 2,
            mean_performance: 0.3,
            best_performance: 0.6,
            best_fitness: 64.0,
            fitness_total: 128.0,
        });

        let path = "/tmp/gallows_test_stats.json";
        history.save_json(path).unwrap();
        let loaded: StatsHistory<GenerationStats> = StatsHistory::load_json(path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.snapshots[1].generation, 2);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_summaries_render() {
        let gen = GenerationStats::default();
        assert!(gen.summary().contains("Gen"));
        let train = TrainingStats {
            improved: false,
            ..Default::default()
        };
        assert!(train.summary().contains("plateau"));
    }
}
