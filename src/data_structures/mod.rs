//! Data structures for Lanai.
//!
//! Currently this is the [`lanai_trie`] autocomplete index and its supporting
//! types.

pub mod lanai_trie;

// Re-export common data structures
pub use lanai_trie::{LanaiTrie, LanaiTrieError, LanaiTrieResult, SharedLanaiTrie};
