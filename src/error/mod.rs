//! Error module for Lanai.
//!
//! Every fallible operation in the crate returns a `thiserror`-derived error.
//! Module-level errors convert into [`LanaiError`] so callers can propagate
//! them with `?` through a single [`LanaiResult`].

use thiserror::Error;

use crate::data_structures::lanai_trie::LanaiTrieError;

pub mod config;

/// Result type alias used throughout Lanai.
pub type LanaiResult<T> = Result<T, LanaiError>;

/// Core error enum for Lanai.
#[derive(Error, Debug)]
pub enum LanaiError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Errors raised by the trie itself.
    #[error("Trie error: {0}")]
    Trie(#[from] LanaiTrieError),

    /// Errors installing the global tracing subscriber.
    #[error("Logging error: {0}")]
    Logging(String),

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
