//! Configuration options for the Lanai Trie.

use serde::{Deserialize, Serialize};

/// Default bound on the number of payloads kept per cached node and returned
/// per lookup.
pub const DEFAULT_MAX_CACHE: usize = 10;

/// Configuration options for the Lanai Trie.
///
/// The defaults match the common autocomplete setup: every node caches a
/// sorted, bounded answer for its prefix, whole inputs are indexed as single
/// tokens, and at most ten payloads are returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanaiTrieOptions {
    /// Whether every node keeps a precomputed aggregate of its subtree.
    ///
    /// When disabled, payloads live only on terminal nodes and lookups
    /// aggregate the subtree on demand.
    pub enable_cache: bool,

    /// Whether aggregates keep pure insertion order instead of being sorted.
    ///
    /// Results are still bounded by `max_cache`.
    pub insert_order: bool,

    /// Whether inputs are split on whitespace and indexed under every token.
    pub match_substrings: bool,

    /// Maximum number of payloads kept in a cached aggregate or returned by a lookup.
    pub max_cache: usize,
}

impl Default for LanaiTrieOptions {
    fn default() -> Self {
        Self {
            enable_cache: true,
            insert_order: false,
            match_substrings: false,
            max_cache: DEFAULT_MAX_CACHE,
        }
    }
}

impl LanaiTrieOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable per-node aggregate caching.
    pub fn with_cache(mut self, enable_cache: bool) -> Self {
        self.enable_cache = enable_cache;
        self
    }

    /// Keep insertion order instead of sorting aggregates.
    pub fn with_insert_order(mut self, insert_order: bool) -> Self {
        self.insert_order = insert_order;
        self
    }

    /// Index every whitespace-separated token of an input.
    pub fn with_substrings(mut self, match_substrings: bool) -> Self {
        self.match_substrings = match_substrings;
        self
    }

    /// Set the bound on cached aggregates and lookup results.
    pub fn with_max_cache(mut self, max_cache: usize) -> Self {
        self.max_cache = max_cache;
        self
    }
}
