use thiserror::Error;

/// Number of symbols in the supported alphabet (uppercase A-Z)
const ALPHABET_SIZE: usize = 26;

/// Errors raised when inserting a word into the index
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DictionaryError {
    #[error("cannot insert an empty word")]
    EmptyWord,
    #[error("word {word:?} contains symbol {symbol:?} outside A-Z")]
    InvalidSymbol { word: String, symbol: char },
}

/// One prefix position. A node exists if and only if some inserted word has
/// that exact prefix; `terminal` marks the end of a complete word.
#[derive(Debug, Default)]
struct TrieNode {
    terminal: bool,
    children: [Option<Box<TrieNode>>; ALPHABET_SIZE],
}

/// Prefix tree over uppercase words. Supports exact-word membership and
/// prefix-existence queries; the latter is what lets the board solver cut
/// off a path as soon as it can no longer become a dictionary word.
///
/// Symbols are ASCII-case-folded before indexing, so `"Quiz"` and `"QUIZ"`
/// address the same path. After folding, a symbol outside A-Z is rejected at
/// insertion time and treated as absent at query time.
#[derive(Debug, Default)]
pub struct Trie {
    root: TrieNode,
    len: usize,
}

/// Child-slot index for a symbol, `None` for anything outside the alphabet
fn symbol_index(symbol: char) -> Option<usize> {
    let folded = symbol.to_ascii_uppercase();
    folded
        .is_ascii_uppercase()
        .then(|| (folded as u8 - b'A') as usize)
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a word, lazily creating nodes along its symbol path. Inserting
    /// the same word twice leaves the structure unchanged. The word is
    /// validated up front, so a rejected insert leaves no partial path.
    pub fn insert(&mut self, word: &str) -> Result<(), DictionaryError> {
        if word.is_empty() {
            return Err(DictionaryError::EmptyWord);
        }

        let mut indices = Vec::with_capacity(word.len());
        for symbol in word.chars() {
            let idx = symbol_index(symbol).ok_or_else(|| DictionaryError::InvalidSymbol {
                word: word.to_string(),
                symbol,
            })?;
            indices.push(idx);
        }

        let mut node = &mut self.root;
        for idx in indices {
            node = node.children[idx].get_or_insert_with(Box::default);
        }

        if !node.terminal {
            node.terminal = true;
            self.len += 1;
        }

        Ok(())
    }

    /// True iff `word` was previously inserted (a terminal node is reached)
    pub fn contains_word(&self, word: &str) -> bool {
        self.walk(word).is_some_and(|node| node.terminal)
    }

    /// True iff some inserted word starts with `prefix`. Used purely to
    /// prune the board search, never for gameplay decisions.
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.walk(prefix).is_some()
    }

    /// Number of distinct words inserted
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Descend one symbol at a time; bail out as soon as a child is missing
    fn walk(&self, symbols: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for symbol in symbols.chars() {
            let idx = symbol_index(symbol)?;
            node = node.children[idx].as_deref()?;
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trie() -> Trie {
        let mut trie = Trie::new();
        for word in ["CAT", "CATS", "CAR", "DOG"] {
            trie.insert(word).unwrap();
        }
        trie
    }

    #[test]
    fn test_round_trip() {
        let trie = sample_trie();

        for word in ["CAT", "CATS", "CAR", "DOG"] {
            assert!(trie.contains_word(word), "{} should be a word", word);
            // every non-empty prefix of an inserted word is a known prefix
            for end in 1..=word.len() {
                assert!(
                    trie.contains_prefix(&word[..end]),
                    "{} should be a prefix",
                    &word[..end]
                );
            }
        }
    }

    #[test]
    fn test_negative_containment() {
        let trie = sample_trie();

        assert!(!trie.contains_word("HOUSE"));
        assert!(!trie.contains_prefix("HO"));
        // a valid prefix is not a word until its terminal node is marked
        assert!(!trie.contains_word("CA"));
        assert!(trie.contains_prefix("CA"));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut trie = sample_trie();
        assert_eq!(trie.len(), 4);

        trie.insert("CAT").unwrap();
        assert_eq!(trie.len(), 4);
        assert!(trie.contains_word("CAT"));
        assert!(trie.contains_word("CATS"));
    }

    #[test]
    fn test_queries_case_fold() {
        let mut trie = Trie::new();
        trie.insert("QUIZ").unwrap();

        // the "QU" tile historically carried a lowercase u; folding makes
        // "Quiz", "quiz" and "QUIZ" the same path
        assert!(trie.contains_word("Quiz"));
        assert!(trie.contains_word("quiz"));
        assert!(trie.contains_prefix("Qu"));
        assert!(trie.contains_prefix("qU"));
    }

    #[test]
    fn test_insert_case_folds() {
        let mut trie = Trie::new();
        trie.insert("hello").unwrap();
        assert!(trie.contains_word("HELLO"));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_insert_rejects_out_of_alphabet_symbols() {
        let mut trie = Trie::new();

        let err = trie.insert("NAÏVE").unwrap_err();
        assert_eq!(
            err,
            DictionaryError::InvalidSymbol {
                word: "NAÏVE".to_string(),
                symbol: 'Ï',
            }
        );
        // the failed insert must not leave a partial path behind
        assert!(!trie.contains_prefix("NA"));

        assert_eq!(trie.insert("").unwrap_err(), DictionaryError::EmptyWord);
    }

    #[test]
    fn test_queries_treat_out_of_alphabet_symbols_as_absent() {
        let trie = sample_trie();

        assert!(!trie.contains_word("CAFÉ"));
        assert!(!trie.contains_prefix("CA T"));
        assert!(!trie.contains_word("DOG!"));
    }

    #[test]
    fn test_empty_trie() {
        let trie = Trie::new();
        assert!(trie.is_empty());
        assert!(!trie.contains_word("CAT"));
        assert!(!trie.contains_prefix("C"));
    }
}
