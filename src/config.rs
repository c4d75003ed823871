//! Configuration for training runs.
//!
//! YAML files with per-section defaults.

use crate::agent::{INPUT_WIDTH, OUTPUT_WIDTH};
use crate::neural::Activation;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub game: GameConfig,
    pub evolution: EvolutionConfig,
    pub training: TrainingConfig,
    pub logging: LoggingConfig,
}

/// Network topology and activation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Layer widths, input first. Endpoints must match the fixed
    /// 432-wide encoding and 26 letter scores.
    pub layer_sizes: Vec<usize>,
    /// Activation applied by every neuron
    pub activation: Activation,
}

/// Game environment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Word list file, one word per whitespace-separated token
    pub vocab_path: String,
    /// Miss budget per episode before it fails with score 0
    pub max_misses: usize,
}

/// Evolutionary trainer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of agents per generation
    pub population_size: usize,
    /// Games every agent plays per generation (shared across agents)
    pub games_per_generation: usize,
    /// Per-weight mutation probability
    pub mutation_rate: f64,
    /// Mutation step scale
    pub mutation_step: f64,
    /// Word length bounds for sampled games
    pub min_word_len: usize,
    pub max_word_len: usize,
    /// Generations between best-agent checkpoints
    pub checkpoint_interval: u64,
}

/// Supervised trainer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Episodes per gradient update
    pub batch_size: usize,
    /// Initial learning rate; halved on plateau
    pub learning_rate: f64,
    /// Episodes per plateau window (window length in epochs is
    /// `window_episodes / batch_size`)
    pub window_episodes: u64,
    /// Word length bounds for sampled games
    pub min_word_len: usize,
    pub max_word_len: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Generations between progress log lines
    pub stats_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            game: GameConfig::default(),
            evolution: EvolutionConfig::default(),
            training: TrainingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            layer_sizes: vec![INPUT_WIDTH, 229, OUTPUT_WIDTH],
            activation: Activation::Logistic,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            vocab_path: "words_alpha.txt".to_string(),
            max_misses: 26,
        }
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            games_per_generation: 10,
            mutation_rate: 0.01,
            mutation_step: 0.25,
            min_word_len: 4,
            max_word_len: 16,
            checkpoint_interval: 10,
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            learning_rate: 1.0,
            window_episodes: 100_000,
            min_word_len: 1,
            max_word_len: 16,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval: 1,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        let sizes = &self.network.layer_sizes;
        if sizes.len() < 2 {
            return Err("layer_sizes needs at least an input and an output layer".to_string());
        }
        if sizes.iter().any(|&s| s == 0) {
            return Err("layer widths must be > 0".to_string());
        }
        if sizes[0] != INPUT_WIDTH || sizes[sizes.len() - 1] != OUTPUT_WIDTH {
            return Err(format!(
                "layer_sizes endpoints must be {} and {}",
                INPUT_WIDTH, OUTPUT_WIDTH
            ));
        }
        if self.evolution.population_size == 0 {
            return Err("population_size must be > 0".to_string());
        }
        if self.evolution.games_per_generation == 0 {
            return Err("games_per_generation must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.evolution.mutation_rate) {
            return Err("mutation_rate must lie in [0, 1]".to_string());
        }
        if !self.evolution.mutation_step.is_finite() || self.evolution.mutation_step < 0.0 {
            return Err("mutation_step must be finite and non-negative".to_string());
        }
        if self.evolution.checkpoint_interval == 0 {
            return Err("checkpoint_interval must be > 0".to_string());
        }
        for (min, max) in [
            (self.evolution.min_word_len, self.evolution.max_word_len),
            (self.training.min_word_len, self.training.max_word_len),
        ] {
            if min == 0 || min > max {
                return Err("word length bounds must satisfy 1 <= min <= max".to_string());
            }
        }
        if self.training.batch_size == 0 {
            return Err("batch_size must be > 0".to_string());
        }
        if self.training.learning_rate <= 0.0 || !self.training.learning_rate.is_finite() {
            return Err("learning_rate must be positive and finite".to_string());
        }
        if self.game.max_misses == 0 {
            return Err("max_misses must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.network.layer_sizes, loaded.network.layer_sizes);
        assert_eq!(config.evolution.mutation_rate, loaded.evolution.mutation_rate);
    }

    #[test]
    fn test_bad_endpoints_rejected() {
        let mut config = Config::default();
        config.network.layer_sizes = vec![100, 26];
        assert!(config.validate().is_err());

        config.network.layer_sizes = vec![432, 10];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_rates_rejected() {
        let mut config = Config::default();
        config.evolution.mutation_rate = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.training.learning_rate = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_word_bounds_rejected() {
        let mut config = Config::default();
        config.evolution.min_word_len = 10;
        config.evolution.max_word_len = 4;
        assert!(config.validate().is_err());
    }
}
