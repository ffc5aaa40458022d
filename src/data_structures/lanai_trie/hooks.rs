//! Hook pipeline for the Lanai Trie.
//!
//! A [`Hooks`] implementation decides what a node's aggregate looks like and
//! how payloads are combined into it, ordered, bounded, copied and merged.
//! The trie never inspects an aggregate itself; it only threads aggregates
//! through these five operations.
//!
//! Two hook sets ship with the crate:
//! * [`ListHooks`] keeps a flat `Vec` of payloads in their natural order.
//! * [`GroupedHooks`] keeps payloads grouped by a discriminator, with exact
//!   label matches first inside each group.
//!
//! The engine does not check that a custom set is internally consistent.
//! Whatever a hook does (including panicking) is passed straight through.

use std::collections::BTreeMap;

/// Per-fold parameters the engine hands to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldContext<'a> {
    /// The folded word the fold is performed for: the inserted token while
    /// indexing, the query while collecting.
    pub word: &'a str,

    /// Bound applied by `clip` after every absorbed payload.
    pub max_cache: usize,

    /// Whether `sort` runs after every absorbed payload.
    pub sorted: bool,
}

/// The five replaceable operations that define aggregate semantics.
pub trait Hooks<T> {
    /// The per-node aggregate shape.
    type Aggregate;

    /// Combines one payload into an aggregate, creating it if needed.
    fn insert(&self, target: Option<Self::Aggregate>, payload: T) -> Self::Aggregate;

    /// Orders an aggregate in place. `word` is the folded word of the current fold.
    fn sort(&self, target: &mut Self::Aggregate, word: &str);

    /// Bounds an aggregate to `max` entries.
    fn clip(&self, target: &mut Self::Aggregate, max: usize);

    /// Produces an independent copy of an aggregate.
    fn copy(&self, data: &Self::Aggregate) -> Self::Aggregate;

    /// Folds a subtree node's aggregate into the running lookup result.
    fn merge(
        &self,
        target: Option<Self::Aggregate>,
        data: &Self::Aggregate,
        ctx: &FoldContext<'_>,
    ) -> Self::Aggregate;

    /// Inserts a payload, then sorts (unless the context disables it) and clips.
    fn absorb(
        &self,
        target: Option<Self::Aggregate>,
        payload: T,
        ctx: &FoldContext<'_>,
    ) -> Self::Aggregate {
        let mut target = self.insert(target, payload);
        if ctx.sorted {
            self.sort(&mut target, ctx.word);
        }
        self.clip(&mut target, ctx.max_cache);
        target
    }
}

/// Flat list aggregate ordered by the payload's `Ord`.
///
/// For string payloads this is lexicographic order. Sorting is stable, so
/// equal payloads keep their insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListHooks;

impl<T: Ord + Clone> Hooks<T> for ListHooks {
    type Aggregate = Vec<T>;

    fn insert(&self, target: Option<Vec<T>>, payload: T) -> Vec<T> {
        let mut target = target.unwrap_or_default();
        target.push(payload);
        target
    }

    fn sort(&self, target: &mut Vec<T>, _word: &str) {
        target.sort();
    }

    fn clip(&self, target: &mut Vec<T>, max: usize) {
        target.truncate(max);
    }

    fn copy(&self, data: &Vec<T>) -> Vec<T> {
        data.clone()
    }

    fn merge(&self, target: Option<Vec<T>>, data: &Vec<T>, ctx: &FoldContext<'_>) -> Vec<T> {
        data.iter()
            .fold(target, |acc, payload| Some(self.absorb(acc, payload.clone(), ctx)))
            .unwrap_or_default()
    }
}

/// A payload that can be grouped into a keyed aggregate.
pub trait Grouped: Clone + Ord {
    /// The discriminator payloads are grouped by.
    type Group: Ord + Clone;

    /// Returns the group this payload belongs to.
    fn group(&self) -> Self::Group;

    /// Returns the display text compared against the word for exact matches.
    fn label(&self) -> &str;
}

/// Keyed aggregate produced by [`GroupedHooks`].
pub type GroupedAggregate<T> = BTreeMap<<T as Grouped>::Group, Vec<T>>;

/// Keyed aggregate: payloads grouped by [`Grouped::group`].
///
/// Inside each group, payloads whose label equals the current word
/// (ignoring case) come first and the rest follow the payload's `Ord`.
/// Clipping bounds every group separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupedHooks;

impl GroupedHooks {
    fn is_exact<T: Grouped>(payload: &T, word: &str) -> bool {
        payload.label().to_lowercase() == word
    }
}

impl<T: Grouped> Hooks<T> for GroupedHooks {
    type Aggregate = GroupedAggregate<T>;

    fn insert(&self, target: Option<GroupedAggregate<T>>, payload: T) -> GroupedAggregate<T> {
        let mut target = target.unwrap_or_default();
        target.entry(payload.group()).or_default().push(payload);
        target
    }

    fn sort(&self, target: &mut GroupedAggregate<T>, word: &str) {
        for group in target.values_mut() {
            group.sort_by(|a, b| {
                Self::is_exact(b, word)
                    .cmp(&Self::is_exact(a, word))
                    .then_with(|| a.cmp(b))
            });
        }
    }

    fn clip(&self, target: &mut GroupedAggregate<T>, max: usize) {
        for group in target.values_mut() {
            group.truncate(max);
        }
    }

    fn copy(&self, data: &GroupedAggregate<T>) -> GroupedAggregate<T> {
        data.clone()
    }

    fn merge(
        &self,
        target: Option<GroupedAggregate<T>>,
        data: &GroupedAggregate<T>,
        ctx: &FoldContext<'_>,
    ) -> GroupedAggregate<T> {
        data.values()
            .flatten()
            .fold(target, |acc, payload| Some(self.absorb(acc, payload.clone(), ctx)))
            .unwrap_or_default()
    }
}
