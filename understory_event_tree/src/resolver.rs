// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolved date spans per node, memoized per tree generation.

use core::hash::{Hash, Hasher};
use core::num::NonZeroUsize;

use hashbrown::HashMap;
use lru::LruCache;
use rustc_hash::FxHasher;
use understory_timescale::{DateRange, Instant};

use crate::log;
use crate::node::{Event, EventTree, Node};
use crate::path::Path;
use crate::recurrence::{DEFAULT_RECURRENCE_LIMIT, Recurrence, expand};

/// Default capacity of the leaf range cache.
pub const DEFAULT_RANGE_CACHE_CAPACITY: usize = 1000;

/// Temporal extent of a node.
///
/// `max_from` is the latest occurrence start in the subtree. It is tracked
/// apart from `from` so a far-future recurrence moves `to` and `max_from`
/// without shifting the node's start.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedRange {
    /// Earliest start.
    pub from: Instant,
    /// Latest end.
    pub to: Instant,
    /// Latest occurrence start.
    pub max_from: Instant,
}

impl ResolvedRange {
    /// Span from `from` to `to`.
    #[must_use]
    pub fn range(&self) -> DateRange {
        DateRange::new(self.from, self.to)
    }

    /// Union of two resolved ranges.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            from: self.from.min(other.from),
            to: self.to.max(other.to),
            max_from: self.max_from.max(other.max_from),
        }
    }
}

/// Hit/miss counters for the leaf cache.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that expanded the event.
    pub misses: u64,
    /// Current number of cached leaves.
    pub size: usize,
    /// Maximum number of cached leaves.
    pub capacity: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct LeafEntry {
    range: DateRange,
    recurrence: Option<Recurrence>,
    resolved: ResolvedRange,
}

impl LeafEntry {
    fn matches(&self, event: &Event) -> bool {
        self.range == event.range && self.recurrence == event.recurrence
    }
}

/// Computes and caches resolved ranges for an [`EventTree`].
///
/// Two layers of caching:
/// - a bounded LRU of leaf ranges keyed by a content hash of
///   `(range, recurrence)`, which survives re-parses since identical events
///   hash identically, and the stored content is compared on every hit;
/// - a per-path memo of leaf and group ranges, valid for one tree generation.
///
/// Eviction and invalidation are transparent: a miss simply recomputes.
#[derive(Debug)]
pub struct RangeResolver {
    leaves: LruCache<u64, LeafEntry>,
    memo: HashMap<Path, Option<ResolvedRange>>,
    generation: Option<u64>,
    recurrence_limit: usize,
    hits: u64,
    misses: u64,
}

impl Default for RangeResolver {
    fn default() -> Self {
        Self::new(DEFAULT_RANGE_CACHE_CAPACITY, DEFAULT_RECURRENCE_LIMIT)
    }
}

impl RangeResolver {
    /// Creates a resolver caching up to `capacity` leaves (at least one), and
    /// expanding at most `recurrence_limit` occurrences per event.
    #[must_use]
    pub fn new(capacity: usize, recurrence_limit: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            leaves: LruCache::new(capacity),
            memo: HashMap::new(),
            generation: None,
            recurrence_limit,
            hits: 0,
            misses: 0,
        }
    }

    /// Maximum occurrences expanded per recurring event.
    #[must_use]
    pub fn recurrence_limit(&self) -> usize {
        self.recurrence_limit
    }

    /// Changes the expansion cap, dropping everything computed with the old one.
    pub fn set_recurrence_limit(&mut self, limit: usize) {
        if self.recurrence_limit != limit {
            self.recurrence_limit = limit;
            self.invalidate_all();
        }
    }

    /// Resolves a single event through the leaf cache.
    pub fn event_range(&mut self, event: &Event) -> ResolvedRange {
        let key = content_hash(&event.range, event.recurrence.as_ref());
        if let Some(entry) = self.leaves.get(&key).filter(|e| e.matches(event)) {
            self.hits += 1;
            return entry.resolved;
        }
        self.misses += 1;
        log::trace!(misses = self.misses, "leaf range cache miss");
        let resolved = self.expand_event(event);
        self.leaves.put(
            key,
            LeafEntry {
                range: event.range,
                recurrence: event.recurrence,
                resolved,
            },
        );
        resolved
    }

    fn expand_event(&self, event: &Event) -> ResolvedRange {
        let Some(rule) = event.recurrence.as_ref() else {
            return ResolvedRange {
                from: event.range.from,
                to: event.range.to,
                max_from: event.range.from,
            };
        };
        let occurrences = expand(&event.range, rule, self.recurrence_limit);
        let first = occurrences.first().copied().unwrap_or(event.range);
        let last = occurrences.last().copied().unwrap_or(event.range);
        if occurrences.len() >= self.recurrence_limit.max(1) {
            log::trace!(
                limit = self.recurrence_limit,
                "recurrence truncated at expansion cap"
            );
        }
        ResolvedRange {
            from: first.from,
            to: last.to,
            max_from: last.from,
        }
    }

    /// Drops the path memo if `generation` differs from the last one seen.
    ///
    /// Hosts bump the generation whenever they replace the tree.
    pub fn sync(&mut self, generation: u64) {
        if self.generation != Some(generation) {
            self.memo.clear();
            self.generation = Some(generation);
        }
    }

    /// Resolved range of the node at `path`.
    ///
    /// Returns `None` for paths that do not exist and for groups with no dated
    /// descendants.
    pub fn range_of(&mut self, tree: &EventTree, path: &Path) -> Option<ResolvedRange> {
        if let Some(&memo) = self.memo.get(path) {
            return memo;
        }
        let resolved = match tree.get(path.as_slice())? {
            Node::Event(event) => Some(self.event_range(event)),
            Node::Group(group) => {
                let mut acc: Option<ResolvedRange> = None;
                for i in 0..group.children.len() {
                    let Some(child) = self.range_of(tree, &path.child(i)) else {
                        continue;
                    };
                    acc = Some(match acc {
                        Some(acc) => acc.merge(&child),
                        None => child,
                    });
                }
                acc
            }
        };
        self.memo.insert(path.clone(), resolved);
        resolved
    }

    /// Resolved range of the whole document.
    pub fn root_range(&mut self, tree: &EventTree) -> Option<ResolvedRange> {
        self.range_of(tree, &Path::root())
    }

    /// Forgets everything derived from the node at `path`: its memo entry,
    /// the memo entries of its ancestors, and its leaf cache entry.
    pub fn invalidate(&mut self, tree: &EventTree, path: &Path) {
        if let Some(Node::Event(event)) = tree.get(path.as_slice()) {
            let key = content_hash(&event.range, event.recurrence.as_ref());
            if self.leaves.peek(&key).is_some_and(|e| e.matches(event)) {
                self.leaves.pop(&key);
            }
        }
        self.memo.remove(path);
        for ancestor in path.ancestors() {
            self.memo.remove(ancestor);
        }
        // Descendants of a replaced group are addressed by new children.
        self.memo.retain(|p, _| !path.is_ancestor_of(p));
        log::debug!(path = %path, "range cache invalidated");
    }

    /// Forgets every cached range.
    pub fn invalidate_all(&mut self) {
        self.leaves.clear();
        self.memo.clear();
        self.generation = None;
    }

    /// Leaf cache counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.leaves.len(),
            capacity: self.leaves.cap().get(),
        }
    }
}

fn content_hash(range: &DateRange, recurrence: Option<&Recurrence>) -> u64 {
    let mut hasher = FxHasher::default();
    range.hash(&mut hasher);
    recurrence.hash(&mut hasher);
    hasher.finish()
}
