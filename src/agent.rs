//! The guessing agent: state encoding, letter ranking, and episode play.

use crate::checkpoint::CheckpointError;
use crate::game::{Hangman, BLANK};
use crate::neural::{Activation, Network};
use rand::Rng;
use std::cmp::Ordering;
use std::path::Path;

/// Fixed network input width the encoding produces.
pub const INPUT_WIDTH: usize = 432;
/// One output score per letter of the alphabet.
pub const OUTPUT_WIDTH: usize = 26;
/// Default miss budget for an episode.
pub const DEFAULT_MAX_MISSES: usize = 26;

/// Input slots per word position: 26 letter bits plus one
/// position-exists bit.
const SLOT: usize = 27;
/// Word positions the input can represent. Longer words are encoded
/// only through their first `POSITION_CAPACITY` positions; the input
/// width is fixed, so the tail is dropped rather than resized.
const POSITION_CAPACITY: usize = INPUT_WIDTH / SLOT;

/// Errors from constructing an agent.
#[derive(Debug)]
pub enum AgentError {
    /// The network's endpoints do not match the fixed encoding widths.
    Topology { input: usize, output: usize },
    Checkpoint(CheckpointError),
}

impl std::fmt::Display for AgentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Topology { input, output } => write!(
                f,
                "network topology {}->{} does not match the {}-wide encoding and {} letter scores",
                input, output, INPUT_WIDTH, OUTPUT_WIDTH
            ),
            Self::Checkpoint(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AgentError {}

impl From<CheckpointError> for AgentError {
    fn from(e: CheckpointError) -> Self {
        Self::Checkpoint(e)
    }
}

/// A player backed by one network. Stateless across episodes apart from
/// the network's weights and gradient accumulator.
#[derive(Clone, Debug)]
pub struct Agent {
    pub brain: Network,
}

impl Agent {
    /// Create an agent with freshly randomized weights.
    pub fn from_topology<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self, AgentError> {
        let mut brain = Network::new(layer_sizes, activation);
        check_endpoints(&brain)?;
        brain.randomize(rng);
        Ok(Self { brain })
    }

    /// Restore an agent from a saved network file.
    pub fn from_checkpoint<P: AsRef<Path>>(
        path: P,
        activation: Activation,
    ) -> Result<Self, AgentError> {
        let brain = Network::load(path, activation)?;
        check_endpoints(&brain)?;
        Ok(Self { brain })
    }

    /// Persist the network to a text file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CheckpointError> {
        self.brain.save(path)
    }

    /// Apply the gradient accumulated over recent episodes.
    pub fn update(&mut self, learning_rate: f64) {
        self.brain.apply_update(learning_rate);
    }

    /// Perturb the network weights.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R, rate: f64, step: f64) {
        self.brain.mutate(rng, rate, step);
    }

    /// Splice weights from another agent's network.
    pub fn crossover_from<R: Rng + ?Sized>(&mut self, other: &Agent, rng: &mut R) {
        self.brain.crossover_from(&other.brain, rng);
    }

    /// Rank the not-yet-guessed letters for the current display, most
    /// preferred first, and supervise the network with the oracle
    /// target. Exactly one gradient accumulation per call.
    pub fn decide(&mut self, display: &str, guessed: &[bool; 26], target: &[f64]) -> Vec<char> {
        let input = encode_state(display);
        let output = self.brain.infer(&input);
        let ranking = rank_letters(&output, guessed);
        self.brain.accumulate_gradient(target);
        ranking
    }

    /// Play one game to completion or failure.
    ///
    /// Each round asks for one fresh ranking, then walks it: every
    /// attempted letter counts as a guess, misses continue down the same
    /// ranking, and a hit ends the round. When the miss deficit reaches
    /// `max_misses` the episode fails with score 0. A solved word scores
    /// `hits / guesses`, in (0, 1].
    pub fn play_episode(&mut self, mut game: Hangman, max_misses: usize) -> f64 {
        let mut guessed = [false; 26];
        let mut hits = 0usize;
        let mut guesses = 0usize;

        while !game.is_solved() {
            let target = compute_target(game.secret(), game.display());
            let ranking = self.decide(game.display(), &guessed, &target);
            guesses += 1;

            for letter in ranking {
                let hit = game.check_letter(letter);
                guessed[letter_index(letter)] = true;
                if hit {
                    hits += 1;
                    break;
                }
                if guesses - hits == max_misses {
                    return 0.0;
                }
                guesses += 1;
            }
        }

        hits as f64 / guesses as f64
    }
}

fn check_endpoints(network: &Network) -> Result<(), AgentError> {
    if network.input_width() != INPUT_WIDTH || network.output_width() != OUTPUT_WIDTH {
        return Err(AgentError::Topology {
            input: network.input_width(),
            output: network.output_width(),
        });
    }
    Ok(())
}

#[inline]
fn letter_index(letter: char) -> usize {
    (letter as u8 - b'a') as usize
}

/// Encode a display string into the fixed-width network input.
///
/// Each of the first 16 positions gets 27 slots: a one-hot letter bit
/// when the position is revealed, and an always-on slot-exists bit.
/// Positions past the capacity are dropped.
pub fn encode_state(display: &str) -> Vec<f64> {
    let mut input = vec![0.0; INPUT_WIDTH];
    for (i, b) in display.bytes().enumerate().take(POSITION_CAPACITY) {
        let base = i * SLOT;
        if b != BLANK as u8 {
            input[base + (b - b'a') as usize] = 1.0;
        }
        input[base + 26] = 1.0;
    }
    input
}

/// Order the unguessed letters by descending network score. The sort is
/// stable over a-to-z insertion order, so equal scores keep the earlier
/// letter first.
pub fn rank_letters(scores: &[f64], guessed: &[bool; 26]) -> Vec<char> {
    debug_assert_eq!(scores.len(), OUTPUT_WIDTH);
    let mut entries: Vec<(char, f64)> = (0..26u8)
        .filter(|&i| !guessed[i as usize])
        .map(|i| ((b'a' + i) as char, scores[i as usize]))
        .collect();
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    entries.into_iter().map(|(c, _)| c).collect()
}

/// The oracle training target: for each letter, the tanh-squashed share
/// of still-hidden positions it would reveal. Computed from the secret,
/// which the input encoding never sees; it exists purely as a
/// supervision signal.
pub fn compute_target(secret: &str, display: &str) -> Vec<f64> {
    let mut remaining = [0usize; 26];
    let mut unrevealed = 0usize;
    for (s, d) in secret.bytes().zip(display.bytes()) {
        if d == BLANK as u8 {
            remaining[(s - b'a') as usize] += 1;
            unrevealed += 1;
        }
    }

    let mut target = vec![0.0; OUTPUT_WIDTH];
    if unrevealed > 0 {
        for (t, &count) in target.iter_mut().zip(remaining.iter()) {
            *t = (4.0 * count as f64 / unrevealed as f64).tanh();
        }
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(61)
    }

    /// A single-transition agent whose weights are all zero, so every
    /// letter scores the same and rankings fall back to a-to-z order.
    fn flat_agent() -> Agent {
        Agent {
            brain: Network::new(&[INPUT_WIDTH, OUTPUT_WIDTH], Activation::Logistic),
        }
    }

    #[test]
    fn test_topology_guard() {
        let err = Agent::from_topology(&[10, 26], Activation::Logistic, &mut rng()).unwrap_err();
        assert!(matches!(
            err,
            AgentError::Topology {
                input: 10,
                output: 26
            }
        ));
        assert!(Agent::from_topology(&[432, 8, 26], Activation::Logistic, &mut rng()).is_ok());
    }

    #[test]
    fn test_encode_blank_word() {
        // "cat" with nothing revealed: one slot-exists bit per position,
        // no letter bits.
        let input = encode_state("   ");
        assert_eq!(input.len(), INPUT_WIDTH);
        let ones: Vec<usize> = input
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 1.0)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(ones, vec![26, 53, 80]);
    }

    #[test]
    fn test_encode_partial_reveal() {
        // "c t" revealed from "cat".
        let input = encode_state("c t");
        let ones: Vec<usize> = input
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 1.0)
            .map(|(i, _)| i)
            .collect();
        // c at position 0 (index 2), slot bits at 26/53/80, t at
        // position 2 (index 2*27 + 19 = 73).
        assert_eq!(ones, vec![2, 26, 53, 73, 80]);
    }

    #[test]
    fn test_encode_truncates_long_words() {
        let display = " ".repeat(20);
        let input = encode_state(&display);
        let slot_bits = input.iter().filter(|&&v| v == 1.0).count();
        assert_eq!(slot_bits, POSITION_CAPACITY);
    }

    #[test]
    fn test_rank_letters_orders_and_skips() {
        let mut scores = [0.0; 26];
        scores[letter_index('d')] = 0.9;
        scores[letter_index('o')] = 0.8;
        scores[letter_index('g')] = 0.7;
        let mut guessed = [false; 26];
        guessed[letter_index('o')] = true;

        let ranking = rank_letters(&scores, &guessed);
        assert_eq!(ranking.len(), 25);
        assert_eq!(ranking[0], 'd');
        assert_eq!(ranking[1], 'g');
        assert!(!ranking.contains(&'o'));
    }

    #[test]
    fn test_rank_letters_ties_prefer_earlier() {
        let scores = [0.5; 26];
        let guessed = [false; 26];
        let ranking = rank_letters(&scores, &guessed);
        let alphabet: Vec<char> = (b'a'..=b'z').map(|b| b as char).collect();
        assert_eq!(ranking, alphabet);
    }

    #[test]
    fn test_compute_target_values() {
        let target = compute_target("cat", "   ");
        let expected = (4.0 / 3.0_f64).tanh();
        assert!((target[letter_index('c')] - expected).abs() < 1e-12);
        assert!((target[letter_index('a')] - expected).abs() < 1e-12);
        assert!((target[letter_index('t')] - expected).abs() < 1e-12);
        assert_eq!(target[letter_index('z')], 0.0);

        // After 'a' is revealed only two positions remain.
        let target = compute_target("cat", " a ");
        let expected = (4.0 / 2.0_f64).tanh();
        assert!((target[letter_index('c')] - expected).abs() < 1e-12);
        assert_eq!(target[letter_index('a')], 0.0);
    }

    #[test]
    fn test_perfect_episode_scores_one() {
        // Bias weights alone push d, o, g to the top of every ranking,
        // so "dog" resolves in three guesses with no misses.
        let mut agent = flat_agent();
        let bias = INPUT_WIDTH;
        for row in 0..OUTPUT_WIDTH {
            agent.brain.weights[0][[row, bias]] = -3.0;
        }
        agent.brain.weights[0][[letter_index('d'), bias]] = 3.0;
        agent.brain.weights[0][[letter_index('o'), bias]] = 2.0;
        agent.brain.weights[0][[letter_index('g'), bias]] = 1.0;

        let score = agent.play_episode(Hangman::with_word("dog"), DEFAULT_MAX_MISSES);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_alphabetical_walk_score() {
        // With uniform scores the agent walks a, b, c, ... For "dog":
        // round one spends 4 guesses (a, b, c, d), round two 3 (e, f, g),
        // round three 8 (h through o). 3 hits over 15 guesses.
        let mut agent = flat_agent();
        let score = agent.play_episode(Hangman::with_word("dog"), DEFAULT_MAX_MISSES);
        assert!((score - 3.0 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_miss_budget_aborts_with_zero() {
        let mut agent = flat_agent();
        // Alphabetical walk toward 'z' hits the 3-miss budget immediately.
        let score = agent.play_episode(Hangman::with_word("zoo"), 3);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_episode_accumulates_one_gradient_per_round() {
        let mut agent = flat_agent();
        agent.play_episode(Hangman::with_word("dog"), DEFAULT_MAX_MISSES);
        // Three rounds for "dog" under the alphabetical walk.
        assert_eq!(agent.brain.example_count(), 3);
    }
}
