//! Thread-safe handle around a [`LanaiTrie`].

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Hooks, LanaiTrie, ListHooks};

/// A cloneable, thread-safe handle to a [`LanaiTrie`].
///
/// Lookups take a shared lock and mutations an exclusive one, so every
/// operation observes the trie either fully before or fully after any
/// concurrent mutation.
pub struct SharedLanaiTrie<T, H: Hooks<T> = ListHooks> {
    inner: Arc<RwLock<LanaiTrie<T, H>>>,
}

impl<T, H: Hooks<T>> Clone for SharedLanaiTrie<T, H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, H: Hooks<T>> From<LanaiTrie<T, H>> for SharedLanaiTrie<T, H> {
    fn from(trie: LanaiTrie<T, H>) -> Self {
        Self::new(trie)
    }
}

impl<T, H: Hooks<T>> SharedLanaiTrie<T, H> {
    /// Wraps a trie for shared access.
    pub fn new(trie: LanaiTrie<T, H>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(trie)),
        }
    }

    /// Acquires shared read access to the trie.
    pub fn read(&self) -> RwLockReadGuard<'_, LanaiTrie<T, H>> {
        self.inner.read()
    }

    /// Acquires exclusive write access to the trie.
    pub fn write(&self) -> RwLockWriteGuard<'_, LanaiTrie<T, H>> {
        self.inner.write()
    }
}

impl<T: Clone, H: Hooks<T>> SharedLanaiTrie<T, H> {
    /// See [`LanaiTrie::add`].
    pub fn add<W: AsRef<str>>(&self, word: W, payload: T) {
        self.inner.write().add(word, payload);
    }

    /// See [`LanaiTrie::find`].
    pub fn find<W: AsRef<str>>(&self, prefix: W) -> Option<H::Aggregate> {
        self.inner.read().find(prefix)
    }

    /// See [`LanaiTrie::contains`].
    pub fn contains<W: AsRef<str>>(&self, word: W) -> bool {
        self.inner.read().contains(word)
    }

    /// See [`LanaiTrie::remove`].
    pub fn remove<W: AsRef<str>>(&self, word: W) -> Option<H::Aggregate> {
        self.inner.write().remove(word)
    }
}
