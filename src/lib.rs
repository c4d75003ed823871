//! # GALLOWS
//!
//! Agents that learn to play the word-guessing game Hangman.
//!
//! A hand-rolled feedforward network ranks letters for each partially
//! revealed word. Two trainers shape its weights:
//!
//! - **Supervised**: every guessing round is supervised by an oracle
//!   letter-frequency target computed from the secret word, with one
//!   batched gradient update per set of episodes and a plateau-based
//!   learning rate schedule.
//! - **Evolutionary**: a population of agents plays a shared slate of
//!   games per generation; fitness-proportional selection, single-cut
//!   crossover, and weight mutation breed the next generation.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use gallows::{Config, Population, Vocabulary};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let config = Config::default();
//! let vocab = Vocabulary::from_file("words_alpha.txt").unwrap();
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//!
//! let mut population = Population::new(&config, &mut rng).unwrap();
//! population.evolve(&vocab, &mut rng, "best.txt", 100).unwrap();
//! ```
//!
//! ## Playing a single game
//!
//! ```rust
//! use gallows::game::Hangman;
//!
//! let mut game = Hangman::with_word("cat");
//! assert!(game.check_letter('a'));
//! assert_eq!(game.display(), " a ");
//! ```

pub mod agent;
pub mod checkpoint;
pub mod config;
pub mod game;
pub mod neural;
pub mod population;
pub mod stats;
pub mod trainer;
pub mod vocab;

// Re-export main types
pub use agent::Agent;
pub use config::Config;
pub use game::Hangman;
pub use neural::{Activation, Network};
pub use population::Population;
pub use vocab::Vocabulary;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
