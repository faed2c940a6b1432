//! Distinct-count grouping and top-N ranking.
//!
//! [`DistinctGroups`] collects a set of unique members per group key;
//! [`DistinctGroups::top_n`] turns it into a [`RankedList`] ordered by set
//! size. Nothing here knows about airlines or airports.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// One ranking result: a group key and the number of distinct members it had.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry<K = String> {
    pub key: K,
    pub count: usize,
}

impl<K> RankedEntry<K> {
    pub fn new(key: K, count: usize) -> Self {
        Self { key, count }
    }
}

/// Entries sorted by count descending, then key ascending.
pub type RankedList<K = String> = Vec<RankedEntry<K>>;

/// Maps each group key to the set of distinct members seen for it.
#[derive(Debug, Clone)]
pub struct DistinctGroups<K, M> {
    groups: HashMap<K, HashSet<M>>,
}

impl<K, M> Default for DistinctGroups<K, M> {
    fn default() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }
}

impl<K, M> DistinctGroups<K, M>
where
    K: Eq + Hash + Ord,
    M: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `member` under `group`. Returns `false` if it was already there.
    pub fn insert(&mut self, group: K, member: M) -> bool {
        self.groups.entry(group).or_default().insert(member)
    }

    /// Number of distinct members recorded for `group` (0 if unknown).
    pub fn cardinality<Q>(&self, group: &Q) -> usize
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.groups.get(group).map_or(0, HashSet::len)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Consumes the groups and returns at most `n` of them, largest set first.
    pub fn top_n(self, n: usize) -> RankedList<K> {
        top_n(
            self.groups
                .into_iter()
                .map(|(key, members)| RankedEntry::new(key, members.len())),
            n,
        )
    }
}

/// Sorts `entries` by count descending (key ascending on ties) and keeps the
/// first `n`.
pub fn top_n<K: Ord>(entries: impl IntoIterator<Item = RankedEntry<K>>, n: usize) -> RankedList<K> {
    if n == 0 {
        return Vec::new();
    }

    let mut ranked: RankedList<K> = entries.into_iter().collect();
    ranked.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    ranked.truncate(n);
    ranked
}
