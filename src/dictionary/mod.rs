use anyhow::Result;
use std::path::Path;
use tokio::fs;

pub mod trie;

pub use trie::{DictionaryError, Trie};

/// The word index for a game: a trie built once from a word list, read-only
/// for the rest of the round.
#[derive(Debug)]
pub struct Dictionary {
    index: Trie,
}

impl Dictionary {
    /// Load a dictionary from a newline-delimited word list file. Lines are
    /// trimmed and case-folded; words shorter than three symbols can never
    /// score and are skipped, as is anything containing a symbol outside A-Z.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).await?;

        let mut index = Trie::new();
        let mut skipped = 0usize;
        for line in content.lines() {
            let word = line.trim();
            if word.len() < 3 {
                continue;
            }
            if !word.bytes().all(|b| b.is_ascii_alphabetic()) {
                skipped += 1;
                continue;
            }
            index.insert(word)?;
        }

        tracing::info!("Loaded {} words into dictionary", index.len());
        if skipped > 0 {
            tracing::debug!("Skipped {} entries with out-of-alphabet symbols", skipped);
        }

        Ok(Self { index })
    }

    /// Build an index from an in-memory word sequence. Unlike `load`, which
    /// normalizes a file of unknown provenance, this propagates an error for
    /// any word outside the supported alphabet.
    pub fn from_words<I, S>(words: I) -> Result<Self, DictionaryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Trie::new();
        for word in words {
            index.insert(word.as_ref())?;
        }
        Ok(Self { index })
    }

    /// Create an empty dictionary (for testing and as a boot fallback)
    pub fn empty() -> Self {
        Self { index: Trie::new() }
    }

    /// Check if a word exists in the dictionary
    pub fn contains_word(&self, word: &str) -> bool {
        self.index.contains_word(word)
    }

    /// Check if any dictionary word starts with the given prefix
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.index.contains_prefix(prefix)
    }

    /// The underlying prefix index, as consumed by the board solver
    pub fn index(&self) -> &Trie {
        &self.index
    }

    /// Get the number of words in the dictionary
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
