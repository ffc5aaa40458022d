//! Lanai Library
//!
//! Lanai is an in-memory autocomplete index. Words are stored in a compressed
//! trie together with caller-supplied payloads, and a prefix lookup returns a
//! bounded, ordered aggregate of the payloads of every word that starts with
//! the prefix.
//!
//! # Architecture
//!
//! * [`data_structures::lanai_trie`] holds the engine: the node store, the
//!   tokenizer, the hook pipeline that defines aggregates, and the trie itself.
//! * [`config`] loads and validates settings from files and the environment.
//! * [`logging`] installs a `tracing` subscriber from those settings.
//! * [`error`] defines the crate-wide error type.
//!
//! # Example
//!
//! ```
//! use lanai::LanaiTrie;
//!
//! let mut trie = LanaiTrie::<String>::new();
//! trie.add_word("testing");
//! trie.add_word("tested");
//!
//! assert_eq!(trie.find("test").unwrap(), vec!["tested", "testing"]);
//! assert!(trie.contains("tested"));
//! assert!(!trie.contains("test"));
//! ```

pub mod config;
pub mod data_structures;
pub mod error;
pub mod logging;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

pub use data_structures::lanai_trie::{
    GroupedHooks, Hooks, LanaiTrie, LanaiTrieError, LanaiTrieOptions, ListHooks,
    SharedLanaiTrie,
};

/// Version information for Lanai.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization function.
///
/// Validates `config` and installs the global tracing subscriber it describes.
pub fn init(settings: &config::LanaiConfig) -> error::LanaiResult<()> {
    use crate::config::Validate;

    settings.validate()?;
    logging::init_logging(&settings.log)?;
    tracing::info!(version = VERSION, "Lanai initialized");
    Ok(())
}
