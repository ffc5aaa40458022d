//! Lanai Trie Implementation
//!
//! This module provides a compressed (radix) trie for autocomplete: words are
//! indexed with payloads, and a prefix lookup returns a bounded, ordered
//! aggregate of the payloads of every word starting with that prefix.
//!
//! Two lookup strategies are available:
//! * **Cache mode** (default): every node keeps a sorted, clipped aggregate of
//!   its subtree, maintained on insertion. Lookups are O(depth).
//! * **No-cache mode**: payloads live only on the node ending their word.
//!   Lookups walk the subtree and merge through the hook pipeline, so results
//!   are always exact.
//!
//! Aggregation is defined by a [`Hooks`] implementation; [`ListHooks`] is the
//! default.
//!
//! The trie is single-threaded. Wrap it in a [`SharedLanaiTrie`] for access
//! from several threads.

mod error;
mod hooks;
mod node;
mod options;
mod shared;
mod tokenizer;

use fnv::FnvBuildHasher;
use hashbrown::hash_map::Entry;
use hashbrown::{HashMap, HashSet};
use tracing::{debug, trace};

pub use error::LanaiTrieError;
pub use hooks::{FoldContext, Grouped, GroupedAggregate, GroupedHooks, Hooks, ListHooks};
pub use node::TrieNode;
pub use options::{LanaiTrieOptions, DEFAULT_MAX_CACHE};
pub use shared::SharedLanaiTrie;
pub use tokenizer::{Token, Tokenizer};

use node::{Match, Posting};

/// Result type for Lanai Trie operations
pub type LanaiTrieResult<T> = Result<T, LanaiTrieError>;

/// Lanai Trie is an in-memory autocomplete index over (word, payload) pairs.
///
/// Key features:
/// * Case-insensitive, code-point based keys
/// * Compressed edges that split and merge as words come and go
/// * Pluggable aggregation through [`Hooks`]
/// * Optional multi-word indexing, where every whitespace-separated token
///   of an input finds the same payload
///
/// Payloads are owned copies: nothing returned by [`find`](Self::find) or
/// [`remove`](Self::remove) aliases data held by the trie.
pub struct LanaiTrie<T, H: Hooks<T> = ListHooks> {
    /// The root node; it has no label and is never replaced
    root: TrieNode<T, H::Aggregate>,

    /// Configuration options
    options: LanaiTrieOptions,

    /// Aggregation pipeline
    hooks: H,

    tokenizer: Tokenizer,

    /// Sequence number handed to the next input
    next_seq: u64,

    /// Tokens each input was indexed under (substring mode only)
    phrases: HashMap<u64, Vec<Token>, FnvBuildHasher>,
}

impl<T: Ord + Clone> LanaiTrie<T, ListHooks> {
    /// Creates a new empty `LanaiTrie` with default options and list aggregates.
    pub fn new() -> Self {
        Self::build(LanaiTrieOptions::default(), ListHooks)
    }

    /// Creates a new empty `LanaiTrie` with the given options and list aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`LanaiTrieError::ZeroMaxCache`] if `options.max_cache` is zero.
    pub fn with_options(options: LanaiTrieOptions) -> LanaiTrieResult<Self> {
        Self::with_hooks(options, ListHooks)
    }
}

impl<T: Ord + Clone> Default for LanaiTrie<T, ListHooks> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, H: Hooks<T>> LanaiTrie<T, H> {
    /// Creates a new empty `LanaiTrie` with the given options and hook pipeline.
    ///
    /// # Arguments
    ///
    /// * `options` - Configuration for the trie.
    /// * `hooks` - The aggregation pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`LanaiTrieError::ZeroMaxCache`] if `options.max_cache` is zero.
    pub fn with_hooks(options: LanaiTrieOptions, hooks: H) -> LanaiTrieResult<Self> {
        if options.max_cache == 0 {
            return Err(LanaiTrieError::ZeroMaxCache);
        }
        Ok(Self::build(options, hooks))
    }

    fn build(options: LanaiTrieOptions, hooks: H) -> Self {
        Self {
            root: TrieNode::new(),
            tokenizer: Tokenizer::new(options.match_substrings),
            options,
            hooks,
            next_seq: 0,
            phrases: HashMap::default(),
        }
    }

    /// Returns the options this trie was built with.
    pub fn options(&self) -> &LanaiTrieOptions {
        &self.options
    }

    /// Returns the hook pipeline.
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Returns the root node for inspection.
    pub fn root(&self) -> &TrieNode<T, H::Aggregate> {
        &self.root
    }

    /// Indexes `payload` under `word`.
    ///
    /// In substring mode the payload is indexed under every whitespace-separated
    /// token of `word`. Inputs without tokens are ignored. Adding the same pair
    /// twice stores it twice.
    pub fn add<W: AsRef<str>>(&mut self, word: W, payload: T) {
        let word = word.as_ref();
        let tokens = self.tokenizer.tokens(word);
        if tokens.is_empty() {
            debug!("Ignoring input without indexable tokens");
            return;
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        for token in &tokens {
            self.insert_token(token, seq, payload.clone());
        }
        debug!(word, seq, tokens = tokens.len(), "Indexed payload");

        if self.tokenizer.splits_whitespace() {
            self.phrases.insert(seq, tokens);
        }
    }

    /// Indexes `word` with the word itself, as given, for payload.
    pub fn add_word<W: AsRef<str>>(&mut self, word: W)
    where
        T: for<'a> From<&'a str>,
    {
        let word = word.as_ref();
        self.add(word, T::from(word));
    }

    /// Indexes every `(word, payload)` pair in order.
    pub fn add_all<I, W>(&mut self, items: I)
    where
        I: IntoIterator<Item = (W, T)>,
        W: AsRef<str>,
    {
        for (word, payload) in items {
            self.add(word, payload);
        }
    }

    /// Indexes every word with itself for payload, in order.
    pub fn add_words<I, W>(&mut self, words: I)
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
        T: for<'a> From<&'a str>,
    {
        for word in words {
            self.add_word(word);
        }
    }

    /// Walks `token` down from the root, splitting labels where needed, and
    /// stores the payload on the node ending the token.
    fn insert_token(&mut self, token: &[char], seq: u64, payload: T) {
        let word: String = token.iter().collect();
        let ctx = self.fold_context(&word, self.options.max_cache);
        let cache = self.options.enable_cache;
        let hooks = &self.hooks;

        let mut node = &mut self.root;
        let mut rest = token;

        while let Some((&key, tail)) = rest.split_first() {
            let child = match node.children.entry(key) {
                Entry::Vacant(slot) => {
                    let data = cache.then(|| hooks.absorb(None, payload.clone(), &ctx));
                    slot.insert(TrieNode::leaf(tail.to_vec(), Posting { seq, payload }, data));
                    return;
                }
                Entry::Occupied(slot) => slot.into_mut(),
            };

            let shared = child
                .suffix
                .iter()
                .zip(tail)
                .take_while(|(a, b)| a == b)
                .count();
            if shared < child.suffix.len() {
                let upper = match &child.data {
                    Some(data) if cache => Some(hooks.copy(data)),
                    _ => None,
                };
                child.split_at(shared, upper);
                trace!(word = %word, key = %key, at = shared, "Split compressed label");
            }

            if cache {
                child.data = Some(hooks.absorb(child.data.take(), payload.clone(), &ctx));
            }

            node = child;
            rest = &tail[shared..];
        }

        node.postings.push(Posting { seq, payload });
    }

    /// Returns the aggregate of payloads whose words start with `prefix`.
    ///
    /// The prefix may end in the middle of a compressed label. Returns `None`
    /// if the prefix is empty or no indexed word starts with it.
    pub fn find<W: AsRef<str>>(&self, prefix: W) -> Option<H::Aggregate> {
        let token = self.tokenizer.fold(prefix.as_ref())?;
        let node = self.root.descend(&token, Match::Prefix)?;

        if self.options.enable_cache {
            return node.data.as_ref().map(|data| self.hooks.copy(data));
        }

        let word: String = token.iter().collect();
        self.collect(node, &word)
    }

    /// Aggregates a subtree on demand (no-cache mode).
    ///
    /// Word-ending nodes are visited in order of their oldest payload so that
    /// unsorted aggregates keep insertion order.
    fn collect(&self, node: &TrieNode<T, H::Aggregate>, word: &str) -> Option<H::Aggregate> {
        let mut terminals = Vec::new();
        node.collect_terminals(&mut Vec::new(), &mut terminals);
        terminals.sort_by_key(|(_, terminal)| terminal.first_seq());

        let ctx = self.fold_context(word, self.options.max_cache);
        let own = self.fold_context(word, usize::MAX);

        terminals.into_iter().fold(None, |acc, (_, terminal)| {
            match self.aggregate(terminal.payloads(), &own) {
                Some(data) => Some(self.hooks.merge(acc, &data, &ctx)),
                None => acc,
            }
        })
    }

    /// Returns `true` if `word` was indexed as a whole word.
    ///
    /// Prefixes of indexed words do not count. In substring mode every
    /// whitespace-separated token of `word` has to be indexed.
    pub fn contains<W: AsRef<str>>(&self, word: W) -> bool {
        let tokens = self.tokenizer.tokens(word.as_ref());
        !tokens.is_empty()
            && tokens.iter().all(|token| {
                self.root
                    .descend(token, Match::Exact)
                    .is_some_and(TrieNode::is_terminal)
            })
    }

    /// Removes every payload indexed under exactly `word`.
    ///
    /// Returns the removed payloads aggregated and clipped the way the exact
    /// word's own payloads would be, or `None` if nothing was indexed under
    /// `word`.
    ///
    /// In substring mode `word` is tokenized. A single token removes every
    /// input indexed under it; several tokens remove only the inputs indexed
    /// under all of them. Each removed input is also withdrawn from the other
    /// tokens it was indexed under.
    pub fn remove<W: AsRef<str>>(&mut self, word: W) -> Option<H::Aggregate> {
        let word = word.as_ref();
        let tokens = self.tokenizer.tokens(word);
        let selected = (tokens.len() > 1).then(|| self.phrases_covering(&tokens));

        let mut removed = Vec::new();
        for token in &tokens {
            removed.append(&mut self.remove_postings(token, |posting| match &selected {
                Some(seqs) => seqs.contains(&posting.seq),
                None => true,
            }));
        }
        if removed.is_empty() {
            return None;
        }

        removed.sort_by_key(|posting| posting.seq);
        removed.dedup_by_key(|posting| posting.seq);

        if self.tokenizer.splits_whitespace() {
            self.withdraw_phrases(&removed, &tokens);
        }
        debug!(word, removed = removed.len(), "Removed payloads");

        let folded = word.to_lowercase();
        let ctx = self.fold_context(folded.trim(), self.options.max_cache);
        self.aggregate(removed.iter().map(|posting| &posting.payload), &ctx)
    }

    /// Returns the inputs indexed under every one of `tokens`.
    fn phrases_covering(&self, tokens: &[Token]) -> HashSet<u64, FnvBuildHasher> {
        self.phrases
            .iter()
            .filter(|(_, phrase)| tokens.iter().all(|token| phrase.contains(token)))
            .map(|(&seq, _)| seq)
            .collect()
    }

    /// Removes the selected payloads stored on the node ending `token`.
    fn remove_postings<F>(&mut self, token: &[char], mut take: F) -> Vec<Posting<T>>
    where
        F: FnMut(&Posting<T>) -> bool,
    {
        let cache = self.options.enable_cache;
        let hooks = &self.hooks;
        let options = &self.options;

        let mut refresh = |node: &mut TrieNode<T, H::Aggregate>, path: &[char]| {
            if cache {
                node.data = Self::rebuild(hooks, options, node, path);
            }
        };

        self.root
            .remove_path(token, &mut Vec::new(), &mut take, &mut refresh)
    }

    /// Strips removed inputs from the other tokens they were indexed under.
    fn withdraw_phrases(&mut self, removed: &[Posting<T>], tokens: &[Token]) {
        let mut seqs = HashSet::with_hasher(FnvBuildHasher::default());
        let mut others: Vec<Token> = Vec::new();

        for posting in removed {
            seqs.insert(posting.seq);
            if let Some(phrase) = self.phrases.remove(&posting.seq) {
                others.extend(phrase.into_iter().filter(|t| !tokens.contains(t)));
            }
        }
        others.sort();
        others.dedup();

        for token in &others {
            let stripped = self.remove_postings(token, |posting| seqs.contains(&posting.seq));
            trace!(stripped = stripped.len(), "Withdrew payloads from sibling token");
        }
    }

    /// Recomputes a node's cached aggregate from the payloads below it.
    ///
    /// Payloads are replayed in insertion order, each sorted against its own
    /// word, which reproduces what indexing them from scratch would build.
    fn rebuild(
        hooks: &H,
        options: &LanaiTrieOptions,
        node: &TrieNode<T, H::Aggregate>,
        path: &[char],
    ) -> Option<H::Aggregate> {
        let mut terminals = Vec::new();
        node.collect_terminals(&mut path.to_vec(), &mut terminals);

        let mut postings: Vec<(&str, &Posting<T>)> = terminals
            .iter()
            .flat_map(|(word, terminal)| {
                terminal
                    .postings
                    .iter()
                    .map(move |posting| (word.as_str(), posting))
            })
            .collect();
        postings.sort_by_key(|(_, posting)| posting.seq);

        postings.into_iter().fold(None, |acc, (word, posting)| {
            let ctx = FoldContext {
                word,
                max_cache: options.max_cache,
                sorted: !options.insert_order,
            };
            Some(hooks.absorb(acc, posting.payload.clone(), &ctx))
        })
    }

    /// Folds payloads into a fresh aggregate.
    fn aggregate<'a, I>(&self, payloads: I, ctx: &FoldContext<'_>) -> Option<H::Aggregate>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        payloads.into_iter().fold(None, |acc, payload| {
            Some(self.hooks.absorb(acc, payload.clone(), ctx))
        })
    }

    fn fold_context<'w>(&self, word: &'w str, max_cache: usize) -> FoldContext<'w> {
        FoldContext {
            word,
            max_cache,
            sorted: !self.options.insert_order,
        }
    }

    /// Returns the number of distinct indexed tokens.
    ///
    /// This requires traversing the entire trie, so it's an O(n) operation.
    pub fn len(&self) -> usize {
        self.root.terminal_count()
    }

    /// Checks if the trie is empty.
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Clears all entries from the trie.
    pub fn clear(&mut self) {
        self.root.clear();
        self.phrases.clear();
    }

    /// Renders the node store as JSON for diagnostics.
    ///
    /// Children are keyed by character; `"$s"` holds a compressed suffix and
    /// `"$d"` the node's aggregate (or its own payloads in no-cache mode).
    pub fn snapshot(&self) -> LanaiTrieResult<serde_json::Value>
    where
        T: serde::Serialize,
        H::Aggregate: serde::Serialize,
    {
        Ok(serde_json::to_value(&self.root)?)
    }
}

impl<T, H: Hooks<T>> std::fmt::Debug for LanaiTrie<T, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanaiTrie")
            .field("options", &self.options)
            .field("tokens", &self.root.terminal_count())
            .field("next_seq", &self.next_seq)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn no_cache() -> LanaiTrieOptions {
        LanaiTrieOptions::new().with_cache(false)
    }

    #[test]
    fn test_trie_basic_operations() {
        let mut trie = LanaiTrie::<String>::new();

        // Test initial state
        assert!(trie.is_empty());
        assert_eq!(trie.len(), 0);

        // Test insertion
        trie.add("test", "word".to_string());
        trie.add("testing", "another word".to_string());
        assert_eq!(trie.len(), 2);
        assert!(!trie.is_empty());

        // Test retrieval
        assert_eq!(trie.find("t").unwrap(), vec!["another word", "word"]);
        assert!(trie.contains("test"));
        assert!(!trie.contains("tes"));

        // Test removal
        assert_eq!(trie.remove("test").unwrap(), vec!["word"]);
        assert_eq!(trie.find("test").unwrap(), vec!["another word"]);
        assert!(!trie.contains("test"));
        assert!(trie.remove("test").is_none());

        trie.clear();
        assert!(trie.is_empty());
        assert!(trie.find("t").is_none());
    }

    #[test]
    fn test_zero_max_cache_is_rejected() {
        let result = LanaiTrie::<String>::with_options(LanaiTrieOptions::new().with_max_cache(0));
        assert!(matches!(result, Err(LanaiTrieError::ZeroMaxCache)));
    }

    #[test]
    fn test_shared_label_is_compressed() {
        let mut trie = LanaiTrie::<String>::new();
        trie.add("test", "word".to_string());
        trie.add("test", "another word".to_string());

        assert_eq!(
            trie.snapshot().unwrap(),
            json!({"t": {"$s": "est", "$d": ["another word", "word"]}})
        );
    }

    #[test]
    fn test_split_on_divergence_and_on_length() {
        let mut trie = LanaiTrie::<String>::new();
        trie.add_word("testing");
        trie.add_word("tester");
        trie.add_word("tea");

        assert_eq!(
            trie.snapshot().unwrap(),
            json!({
                "t": {
                    "$s": "e",
                    "$d": ["tea", "tester", "testing"],
                    "a": {"$d": ["tea"]},
                    "s": {
                        "$s": "t",
                        "$d": ["tester", "testing"],
                        "e": {"$s": "r", "$d": ["tester"]},
                        "i": {"$s": "ng", "$d": ["testing"]}
                    }
                }
            })
        );

        // A word ending inside a label splits it at that length.
        trie.add_word("te");
        let te = trie.root().child('t').unwrap();
        assert_eq!(te.suffix(), "e");
        assert!(te.is_terminal());
    }

    #[test]
    fn test_removal_recompresses_labels() {
        let mut trie = LanaiTrie::<String>::with_options(no_cache()).unwrap();
        trie.add_word("test");
        trie.add_word("testing");
        trie.add_word("tests");

        trie.remove("test");
        trie.remove("tests");

        assert_eq!(
            trie.snapshot().unwrap(),
            json!({"t": {"$s": "esting", "$d": ["testing"]}})
        );
    }

    #[test]
    fn test_cache_rebuild_restores_clipped_payloads() {
        let options = LanaiTrieOptions::new().with_max_cache(2);
        let mut trie = LanaiTrie::<String>::with_options(options).unwrap();
        trie.add("ab", "a".to_string());
        trie.add("ac", "b".to_string());
        trie.add("ad", "c".to_string());

        // "c" fell off the bounded aggregate of "a" but still lives under "ad".
        assert_eq!(trie.find("a").unwrap(), vec!["a", "b"]);
        assert_eq!(trie.find("ad").unwrap(), vec!["c"]);

        trie.remove("ab");
        assert_eq!(trie.find("a").unwrap(), vec!["b", "c"]);
    }

    #[test]
    fn test_no_cache_stores_payloads_on_terminals_only() {
        let mut trie = LanaiTrie::<String>::with_options(no_cache()).unwrap();
        trie.add("test", "word".to_string());
        trie.add("team", "other".to_string());

        let te = trie.root().child('t').unwrap();
        assert!(te.data().is_none());
        assert!(!te.is_terminal());
        assert_eq!(trie.find("te").unwrap(), vec!["other", "word"]);
    }

    #[test]
    fn test_substring_removal_withdraws_every_token() {
        let options = LanaiTrieOptions::new().with_substrings(true);
        let mut trie = LanaiTrie::<String>::with_options(options).unwrap();
        trie.add("test one", "word".to_string());
        trie.add("one more", "other".to_string());

        assert_eq!(trie.remove("test").unwrap(), vec!["word"]);
        assert_eq!(trie.find("one").unwrap(), vec!["other"]);
        assert!(trie.find("test").is_none());
        assert!(trie.contains("more"));
    }

    #[test]
    fn test_removed_payloads_are_bounded_like_find() {
        for options in [LanaiTrieOptions::new(), no_cache()] {
            let mut trie = LanaiTrie::<String>::with_options(options).unwrap();
            for i in 0..12 {
                trie.add("word", format!("payload {i:02}"));
            }

            let found = trie.find("word").unwrap();
            assert_eq!(found.len(), DEFAULT_MAX_CACHE);
            assert_eq!(trie.remove("word").unwrap(), found);
            assert!(trie.is_empty());
        }
    }

    #[test]
    fn test_debug_output() {
        let mut trie = LanaiTrie::<String>::new();
        trie.add_word("word");
        let rendered = format!("{trie:?}");
        assert!(rendered.contains("LanaiTrie"));
        assert!(rendered.contains("tokens: 1"));
    }
}
