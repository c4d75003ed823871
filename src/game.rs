//! The word-guessing game environment.

use crate::vocab::Vocabulary;
use rand::Rng;

/// Placeholder for an unrevealed position.
pub const BLANK: char = ' ';

/// One round of the word-guessing game: a secret word and the partially
/// revealed display the guesser sees.
///
/// The secret is immutable; the display only ever moves from blank to
/// revealed, letter-check by letter-check.
#[derive(Clone, Debug)]
pub struct Hangman {
    secret: String,
    display: String,
}

impl Hangman {
    /// Start a game over a fixed secret word (lowercase alphabetic,
    /// nonempty).
    pub fn with_word(word: &str) -> Self {
        debug_assert!(
            !word.is_empty() && word.bytes().all(|b| b.is_ascii_lowercase()),
            "secret words are nonempty lowercase alphabetic"
        );
        Self {
            secret: word.to_string(),
            display: BLANK.to_string().repeat(word.len()),
        }
    }

    /// Start a game over a word drawn uniformly from the vocabulary.
    pub fn sample<R: Rng + ?Sized>(vocab: &Vocabulary, rng: &mut R) -> Self {
        Self::with_word(vocab.choose(rng))
    }

    /// Start a game over a word whose length lies in
    /// `[min_len, max_len]`, drawing until one fits. The vocabulary must
    /// contain at least one word in range.
    pub fn sample_bounded<R: Rng + ?Sized>(
        vocab: &Vocabulary,
        rng: &mut R,
        min_len: usize,
        max_len: usize,
    ) -> Self {
        loop {
            let word = vocab.choose(rng);
            if (min_len..=max_len).contains(&word.len()) {
                return Self::with_word(word);
            }
        }
    }

    /// The secret word. Exposed for the oracle training target; the
    /// agent's input encoding never sees it.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// The partially revealed display, blanks for unrevealed positions.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Reveal every occurrence of `letter` and report whether any
    /// existed. Safe to repeat: re-checking a revealed letter returns
    /// true again without changing anything.
    pub fn check_letter(&mut self, letter: char) -> bool {
        let mut found = false;
        self.display = self
            .secret
            .chars()
            .zip(self.display.chars())
            .map(|(s, d)| {
                if s == letter {
                    found = true;
                    s
                } else {
                    d
                }
            })
            .collect();
        found
    }

    /// True once every position is revealed.
    pub fn is_solved(&self) -> bool {
        self.display == self.secret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_initial_display_is_blank() {
        let game = Hangman::with_word("cat");
        assert_eq!(game.display(), "   ");
        assert!(!game.is_solved());
    }

    #[test]
    fn test_check_reveals_all_occurrences() {
        let mut game = Hangman::with_word("banana");
        assert!(game.check_letter('a'));
        assert_eq!(game.display(), " a a a");
        assert!(!game.check_letter('z'));
        assert_eq!(game.display(), " a a a");
    }

    #[test]
    fn test_check_is_idempotent() {
        let mut game = Hangman::with_word("banana");
        assert!(game.check_letter('n'));
        let after_first = game.display().to_string();
        assert!(game.check_letter('n'));
        assert_eq!(game.display(), after_first);
    }

    #[test]
    fn test_solving() {
        let mut game = Hangman::with_word("dog");
        for letter in ['d', 'o', 'g'] {
            assert!(!game.is_solved());
            assert!(game.check_letter(letter));
        }
        assert!(game.is_solved());
        assert_eq!(game.display(), "dog");
    }

    #[test]
    fn test_reveals_never_revert() {
        let mut game = Hangman::with_word("cacao");
        game.check_letter('a');
        game.check_letter('x');
        game.check_letter('q');
        assert_eq!(game.display(), " a a ");
    }

    #[test]
    fn test_sample_bounded_respects_lengths() {
        let vocab = Vocabulary::from_words(["at", "cat", "horse", "elephant"]);
        let mut rng = ChaCha8Rng::seed_from_u64(51);
        for _ in 0..50 {
            let game = Hangman::sample_bounded(&vocab, &mut rng, 3, 5);
            assert!((3..=5).contains(&game.secret().len()));
        }
    }
}
