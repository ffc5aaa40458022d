//! Input tokenization for the Lanai Trie.
//!
//! Every word is lower-cased as a whole before it is broken into code points,
//! so characters outside the Basic Multilingual Plane occupy a single trie
//! edge and lookups ignore case.

/// A folded token: the lower-cased code points of one indexing unit.
pub type Token = Vec<char>;

/// Turns raw input into the tokens the trie indexes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tokenizer {
    split_whitespace: bool,
}

impl Tokenizer {
    /// Creates a tokenizer. With `split_whitespace` set, every
    /// whitespace-delimited word of an input becomes its own token.
    pub fn new(split_whitespace: bool) -> Self {
        Self { split_whitespace }
    }

    /// Whether inputs are split on whitespace.
    pub fn splits_whitespace(&self) -> bool {
        self.split_whitespace
    }

    /// Folds a query into a single token without splitting.
    ///
    /// Returns `None` for the empty string.
    pub fn fold(&self, input: &str) -> Option<Token> {
        if input.is_empty() {
            return None;
        }
        Some(input.to_lowercase().chars().collect())
    }

    /// Produces the indexing tokens of an input.
    ///
    /// An empty result means the input is not indexable.
    pub fn tokens(&self, input: &str) -> Vec<Token> {
        if !self.split_whitespace {
            return self.fold(input).into_iter().collect();
        }

        input
            .to_lowercase()
            .split_whitespace()
            .map(|word| word.chars().collect())
            .collect()
    }
}
