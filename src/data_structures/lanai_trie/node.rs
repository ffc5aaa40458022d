//! Node implementation for the Lanai Trie.
//!
//! Every node sits under its parent keyed by the first character of its edge
//! label; the rest of the label is kept in `suffix`. Chains of payload-less
//! single-child nodes are always merged into one label, and a label is split
//! again as soon as a word diverges from it or ends inside it.

use std::mem;

use fnv::FnvBuildHasher;
use hashbrown::HashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Child mapping of a node, keyed by the first (lower-cased) label character.
pub(crate) type Children<T, A> = HashMap<char, TrieNode<T, A>, FnvBuildHasher>;

/// A payload stored on the node of the exact word it was indexed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Posting<T> {
    /// Insertion sequence number, shared by every token of one input.
    pub(crate) seq: u64,
    pub(crate) payload: T,
}

/// How the end of a traversal has to line up with node boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Match {
    /// The walk may stop partway through a compressed label.
    Prefix,
    /// The walk must consume whole labels.
    Exact,
}

/// A node in the Lanai Trie.
///
/// `T` is the payload type and `A` the aggregate type of the hook pipeline.
#[derive(Debug)]
pub struct TrieNode<T, A> {
    /// Map of label heads to child nodes
    pub(crate) children: Children<T, A>,

    /// Remainder of this node's edge label after its key character
    pub(crate) suffix: Vec<char>,

    /// Payloads of words ending exactly at this node
    pub(crate) postings: Vec<Posting<T>>,

    /// Cached aggregate of every payload in this subtree (cache mode only)
    pub(crate) data: Option<A>,
}

impl<T, A> TrieNode<T, A> {
    /// Creates a new empty trie node.
    pub(crate) fn new() -> Self {
        Self {
            children: Children::default(),
            suffix: Vec::new(),
            postings: Vec::new(),
            data: None,
        }
    }

    /// Creates a childless node that ends a word.
    pub(crate) fn leaf(suffix: Vec<char>, posting: Posting<T>, data: Option<A>) -> Self {
        Self {
            children: Children::default(),
            suffix,
            postings: vec![posting],
            data,
        }
    }

    /// Returns the child whose label starts with `key`.
    pub fn child(&self, key: char) -> Option<&Self> {
        self.children.get(&key)
    }

    /// Iterates over the children together with their keys, in no particular order.
    pub fn children(&self) -> impl Iterator<Item = (char, &Self)> {
        self.children.iter().map(|(key, child)| (*key, child))
    }

    /// Returns the part of this node's label after its key character.
    pub fn suffix(&self) -> String {
        self.suffix.iter().collect()
    }

    /// Returns the cached aggregate, if this trie keeps one.
    pub fn data(&self) -> Option<&A> {
        self.data.as_ref()
    }

    /// Iterates over the payloads of words ending exactly here, oldest first.
    pub fn payloads(&self) -> impl Iterator<Item = &T> {
        self.postings.iter().map(|posting| &posting.payload)
    }

    /// Whether some word ends exactly at this node.
    pub fn is_terminal(&self) -> bool {
        !self.postings.is_empty()
    }

    /// Sequence number of the oldest payload stored here.
    pub(crate) fn first_seq(&self) -> Option<u64> {
        self.postings.first().map(|posting| posting.seq)
    }

    /// Drops every child and payload.
    pub(crate) fn clear(&mut self) {
        self.children.clear();
        self.postings.clear();
        self.data = None;
    }

    /// Walks down the trie along `token`.
    pub(crate) fn descend(&self, token: &[char], mode: Match) -> Option<&Self> {
        let mut node = self;
        let mut rest = token;

        while let Some((&key, tail)) = rest.split_first() {
            let child = node.children.get(&key)?;
            rest = match tail.strip_prefix(child.suffix.as_slice()) {
                Some(after) => after,
                None if mode == Match::Prefix && child.suffix.starts_with(tail) => &[],
                None => return None,
            };
            node = child;
        }

        Some(node)
    }

    /// Splits this node's label after `at` suffix characters.
    ///
    /// The tail of the label moves into a new child that takes over the
    /// children, payloads and aggregate of this node. This node keeps the
    /// head of the label and starts over with `upper_data`.
    pub(crate) fn split_at(&mut self, at: usize, upper_data: Option<A>) {
        let mut tail = self.suffix.split_off(at);
        if tail.is_empty() {
            return;
        }
        let key = tail.remove(0);

        let lower = Self {
            children: mem::take(&mut self.children),
            suffix: tail,
            postings: mem::take(&mut self.postings),
            data: mem::replace(&mut self.data, upper_data),
        };
        self.children.insert(key, lower);
    }

    /// Merges the only child into this node if this node ends no word.
    ///
    /// Returns `true` if a merge happened. The merged node inherits the
    /// child's aggregate, which covers the same subtree.
    pub(crate) fn absorb_only_child(&mut self) -> bool {
        if self.is_terminal() || self.children.len() != 1 {
            return false;
        }
        let Some(key) = self.children.keys().next().copied() else {
            return false;
        };
        let Some(child) = self.children.remove(&key) else {
            return false;
        };

        self.suffix.push(key);
        self.suffix.extend(child.suffix);
        self.children = child.children;
        self.postings = child.postings;
        self.data = child.data;
        true
    }

    /// Removes payloads from the node that ends exactly at `rest`, below this node.
    ///
    /// `path` holds the folded characters leading to this node. `take` selects
    /// the payloads to remove. Every surviving node on the way back up is
    /// compacted, and `refresh` is called on it unless it was rebuilt by
    /// merging its only child. Nodes left without payloads or children are
    /// pruned.
    pub(crate) fn remove_path<F, R>(
        &mut self,
        rest: &[char],
        path: &mut Vec<char>,
        take: &mut F,
        refresh: &mut R,
    ) -> Vec<Posting<T>>
    where
        F: FnMut(&Posting<T>) -> bool,
        R: FnMut(&mut Self, &[char]),
    {
        let Some((&key, tail)) = rest.split_first() else {
            return Vec::new();
        };
        let Some(child) = self.children.get_mut(&key) else {
            return Vec::new();
        };
        let Some(tail) = tail.strip_prefix(child.suffix.as_slice()) else {
            return Vec::new();
        };

        let depth = path.len();
        path.push(key);
        path.extend_from_slice(&child.suffix);

        let removed = if tail.is_empty() {
            let (removed, kept): (Vec<_>, Vec<_>) =
                mem::take(&mut child.postings).into_iter().partition(|p| take(p));
            child.postings = kept;
            removed
        } else {
            child.remove_path(tail, path, take, refresh)
        };

        if !removed.is_empty() {
            if !child.is_terminal() && child.children.is_empty() {
                self.children.remove(&key);
                tracing::trace!(key = %key, "Pruned empty node");
            } else if child.absorb_only_child() {
                tracing::trace!(key = %key, suffix = %child.suffix(), "Merged single child");
            } else {
                refresh(child, path);
            }
        }

        path.truncate(depth);
        removed
    }

    /// Collects every node in this subtree that ends a word, together with that word.
    ///
    /// `path` holds the folded characters leading to this node.
    pub(crate) fn collect_terminals<'a>(
        &'a self,
        path: &mut Vec<char>,
        out: &mut Vec<(String, &'a Self)>,
    ) {
        if self.is_terminal() {
            out.push((path.iter().collect(), self));
        }
        for (key, child) in &self.children {
            let depth = path.len();
            path.push(*key);
            path.extend_from_slice(&child.suffix);
            child.collect_terminals(path, out);
            path.truncate(depth);
        }
    }

    /// Counts the nodes in this subtree that end a word.
    pub(crate) fn terminal_count(&self) -> usize {
        let own = usize::from(self.is_terminal());
        own + self
            .children
            .values()
            .map(Self::terminal_count)
            .sum::<usize>()
    }
}

impl<T, A> Default for TrieNode<T, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Diagnostic rendering: children keyed by character, then `"$s"` for a
/// non-empty suffix and `"$d"` for the cached aggregate, or for the node's
/// own payloads when nothing is cached.
impl<T: Serialize, A: Serialize> Serialize for TrieNode<T, A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut keys: Vec<char> = self.children.keys().copied().collect();
        keys.sort_unstable();

        let mut map = serializer.serialize_map(None)?;
        for key in keys {
            if let Some(child) = self.children.get(&key) {
                map.serialize_entry(&key.to_string(), child)?;
            }
        }
        if !self.suffix.is_empty() {
            map.serialize_entry("$s", &self.suffix())?;
        }
        match &self.data {
            Some(data) => map.serialize_entry("$d", data)?,
            None if self.is_terminal() => {
                let payloads: Vec<&T> = self.payloads().collect();
                map.serialize_entry("$d", &payloads)?;
            }
            None => {}
        }
        map.end()
    }
}
