//! Error types for the Lanai Trie.
//!
//! Regular trie operations never fail: a missing word is reported as `None`
//! or `false`. Errors only surface while constructing a trie from options and
//! while producing diagnostic snapshots.

/// Errors that can occur in Lanai Trie operations.
#[derive(Debug, thiserror::Error)]
pub enum LanaiTrieError {
    /// Error when the result bound is configured as zero.
    #[error("max_cache must be greater than 0")]
    ZeroMaxCache,

    /// Error when the node store cannot be rendered as JSON.
    #[error("Failed to serialize trie snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}
