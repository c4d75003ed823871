//! Word list the game draws its secrets from.

use rand::Rng;
use std::io;
use std::path::Path;

/// A fixed, indexed collection of lowercase words.
#[derive(Clone, Debug)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary from an iterator of words. Words are lowercased;
    /// anything containing a non-alphabetic character is skipped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().to_ascii_lowercase())
            .filter(|w| !w.is_empty() && w.bytes().all(|b| b.is_ascii_lowercase()))
            .collect();
        Self { words }
    }

    /// Load a vocabulary from a whitespace-separated word file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let vocab = Self::from_words(contents.split_whitespace());
        if vocab.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "vocabulary file contains no usable words",
            ));
        }
        Ok(vocab)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    /// Draw a word uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        assert!(!self.words.is_empty(), "cannot sample an empty vocabulary");
        &self.words[rng.gen_range(0..self.words.len())]
    }
}
