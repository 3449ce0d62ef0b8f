pub struct Scorer;

impl Scorer {
    /// Points for a single word, by length alone:
    /// 3-4 letters -> 1, 5 -> 2, 6 -> 3, 7 -> 5, 8+ -> 11.
    /// Shorter words score nothing; the solver never records them.
    pub fn word_score(word: &str) -> u32 {
        match word.len() {
            0..=2 => 0,
            3 | 4 => 1,
            5 => 2,
            6 => 3,
            7 => 5,
            _ => 11,
        }
    }

    /// Total achievable score over a set of found words. Recomputed from the
    /// set, never accumulated incrementally.
    pub fn total_score<I>(words: I) -> u32
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        words
            .into_iter()
            .map(|word| Self::word_score(word.as_ref()))
            .sum()
    }
}
