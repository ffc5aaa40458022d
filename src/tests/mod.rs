//! Test modules for Lanai.
//!
//! This module contains the crate-internal test suites:
//! - Property-based tests for the trie using proptest
//! - Configuration loading and validation tests
//! - Error conversion and display tests
//! - Shared strategies and fixtures


// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{create_test_dir, dictionary_strategy, word_strategy};
