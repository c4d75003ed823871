//! GALLOWS - CLI entry point.

use clap::{Parser, Subcommand};
use gallows::population::Population;
use gallows::trainer::{self, TrainOptions};
use gallows::{Agent, Config, Vocabulary};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "gallows")]
#[command(version)]
#[command(about = "Hangman-playing agents trained by backprop or evolution")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a single agent with supervised backprop
    Train {
        /// Where to checkpoint the network
        #[arg(short = 'o', long, default_value = "player.txt")]
        checkpoint: PathBuf,

        /// Number of batched updates
        #[arg(short, long, default_value = "25000")]
        epochs: u64,

        /// Episodes per update (overrides config)
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// Initial learning rate (overrides config)
        #[arg(short, long)]
        learning_rate: Option<f64>,

        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Word list (overrides config)
        #[arg(long)]
        vocab: Option<PathBuf>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Write window stats to this JSON file
        #[arg(long)]
        stats: Option<PathBuf>,
    },

    /// Score a checkpointed agent without learning
    Test {
        /// Network file to load
        #[arg(short = 'o', long, default_value = "player.txt")]
        checkpoint: PathBuf,

        /// Number of episodes to play
        #[arg(short, long, default_value = "10000")]
        episodes: u64,

        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Word list (overrides config)
        #[arg(long)]
        vocab: Option<PathBuf>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Evolve a population of agents
    Evolve {
        /// Where to checkpoint the best network
        #[arg(short = 'o', long, default_value = "player.txt")]
        checkpoint: PathBuf,

        /// Number of generations
        #[arg(short, long, default_value = "1000")]
        generations: u64,

        /// Seed the population from the checkpoint instead of random
        #[arg(long)]
        resume: bool,

        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Word list (overrides config)
        #[arg(long)]
        vocab: Option<PathBuf>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Write generation stats to this JSON file
        #[arg(long)]
        stats: Option<PathBuf>,
    },

    /// Generate a default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            checkpoint,
            epochs,
            batch_size,
            learning_rate,
            config,
            vocab,
            seed,
            stats,
        } => run_train(
            checkpoint,
            epochs,
            batch_size,
            learning_rate,
            config,
            vocab,
            seed,
            stats,
        ),

        Commands::Test {
            checkpoint,
            episodes,
            config,
            vocab,
            seed,
        } => run_test(checkpoint, episodes, config, vocab, seed),

        Commands::Evolve {
            checkpoint,
            generations,
            resume,
            config,
            vocab,
            seed,
            stats,
        } => run_evolve(checkpoint, generations, resume, config, vocab, seed, stats),

        Commands::Init { output } => {
            let config = Config::default();
            config.save(&output)?;
            println!("Configuration saved to: {:?}", output);
            Ok(())
        }
    }
}

fn load_config(path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
    if path.exists() {
        println!("Loading config from: {:?}", path);
        Config::from_file(path)
    } else {
        println!("Using default configuration");
        Ok(Config::default())
    }
}

fn load_vocab(
    override_path: Option<PathBuf>,
    config: &Config,
) -> Result<Vocabulary, Box<dyn std::error::Error>> {
    let path = override_path.unwrap_or_else(|| PathBuf::from(&config.game.vocab_path));
    println!("Loading vocabulary from: {:?}", path);
    let vocab = Vocabulary::from_file(&path)?;
    println!("  {} words", vocab.len());
    Ok(vocab)
}

fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    println!("Using seed: {}", seed);
    ChaCha8Rng::seed_from_u64(seed)
}

#[allow(clippy::too_many_arguments)]
fn run_train(
    checkpoint: PathBuf,
    epochs: u64,
    batch_size: Option<usize>,
    learning_rate: Option<f64>,
    config_path: PathBuf,
    vocab_path: Option<PathBuf>,
    seed: Option<u64>,
    stats_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&config_path)?;
    let vocab = load_vocab(vocab_path, &config)?;
    let mut rng = make_rng(seed);

    let mut agent = Agent::from_topology(
        &config.network.layer_sizes,
        config.network.activation,
        &mut rng,
    )?;

    let opts = TrainOptions {
        epochs,
        batch_size: batch_size.unwrap_or(config.training.batch_size),
        learning_rate: learning_rate.unwrap_or(config.training.learning_rate),
        window_episodes: config.training.window_episodes,
        min_word_len: config.training.min_word_len,
        max_word_len: config.training.max_word_len,
        max_misses: config.game.max_misses,
    };

    println!("Starting supervised training");
    println!("  Topology: {:?}", config.network.layer_sizes);
    println!("  Epochs: {}", opts.epochs);
    println!("  Batch size: {}", opts.batch_size);
    println!();

    let start = Instant::now();
    let history = trainer::train(&mut agent, &vocab, &mut rng, &checkpoint, &opts)?;
    let elapsed = start.elapsed();

    agent.save(&checkpoint)?;

    println!();
    println!("=== Training Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Windows: {}", history.len());
    if let Some(last) = history.last() {
        println!("Final window mean: {:.4}", last.window_mean);
        println!("Final learning rate: {:.4}", last.learning_rate);
    }
    println!("Checkpoint: {:?}", checkpoint);

    if let Some(path) = stats_path {
        history.save_json(&path)?;
        println!("Stats history: {:?}", path);
    }

    Ok(())
}

fn run_test(
    checkpoint: PathBuf,
    episodes: u64,
    config_path: PathBuf,
    vocab_path: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&config_path)?;
    let vocab = load_vocab(vocab_path, &config)?;
    let mut rng = make_rng(seed);

    println!("Loading checkpoint: {:?}", checkpoint);
    let mut agent = Agent::from_checkpoint(&checkpoint, config.network.activation)?;

    let opts = TrainOptions {
        min_word_len: config.training.min_word_len,
        max_word_len: config.training.max_word_len,
        max_misses: config.game.max_misses,
        ..TrainOptions::default()
    };

    let start = Instant::now();
    let mean = trainer::evaluate(&mut agent, &vocab, &mut rng, episodes, &opts);
    let elapsed = start.elapsed();

    println!();
    println!("=== Test Complete ===");
    println!("Episodes: {}", episodes);
    println!("Mean score: {:.4}", mean);
    println!("Time: {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

fn run_evolve(
    checkpoint: PathBuf,
    generations: u64,
    resume: bool,
    config_path: PathBuf,
    vocab_path: Option<PathBuf>,
    seed: Option<u64>,
    stats_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&config_path)?;
    let vocab = load_vocab(vocab_path, &config)?;
    let mut rng = make_rng(seed);

    let mut population = if resume {
        println!("Seeding population from: {:?}", checkpoint);
        Population::from_checkpoint(&config, &checkpoint, &mut rng)?
    } else {
        Population::new(&config, &mut rng)?
    };

    println!("Starting evolution");
    println!("  Population: {}", population.size());
    println!("  Games per generation: {}", config.evolution.games_per_generation);
    println!("  Generations: {}", generations);
    println!();

    let start = Instant::now();
    population.evolve(&vocab, &mut rng, &checkpoint, generations)?;
    let elapsed = start.elapsed();

    println!();
    println!("=== Evolution Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Generations: {}", generations);
    if let Some(last) = population.history.last() {
        println!("Final best score: {:.4}", last.best_performance);
        println!("Final mean score: {:.4}", last.mean_performance);
    }
    println!("Checkpoint: {:?}", checkpoint);

    if let Some(path) = stats_path {
        population.history.save_json(&path)?;
        println!("Stats history: {:?}", path);
    }

    Ok(())
}
