// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_tree --heading-base-level=0

//! Understory Event Tree: hierarchical events addressed by path, with cached
//! date-range resolution.
//!
//! - [`EventTree`]: an immutable snapshot of [`Node`]s (dated [`Event`]
//!   leaves and titled [`Group`]s) as produced by an external parser.
//! - [`Path`]: a node's child index in each ancestor. Paths, not node
//!   identity, key every piece of derived state, because a re-parse replaces
//!   all nodes.
//! - [`Recurrence`] and [`expand`]: repetition rules with a hard expansion cap.
//! - [`RangeResolver`]: resolved `(from, to, max_from)` spans per path. Leaves
//!   go through a bounded LRU keyed by content hash; groups are unions of
//!   their children, memoized per tree generation.
//!
//! ## Minimal example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use understory_event_tree::{
//!     DateRange, Event, EventTree, Frequency, Group, Path, RangeResolver, Recurrence,
//! };
//!
//! let day = |d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
//! let standup = Event::new(DateRange::new(day(1), day(1)))
//!     .with_recurrence(Recurrence::new(Frequency::Daily, 1).with_count(5));
//! let tree = EventTree::new(vec![
//!     Group::new("Work", vec![standup.into()]).into(),
//! ]);
//!
//! let mut ranges = RangeResolver::default();
//! ranges.sync(1);
//! let work = ranges.range_of(&tree, &"0".parse::<Path>().unwrap()).unwrap();
//! assert_eq!(work.from, day(1));
//! assert_eq!(work.to, day(5));
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit `tracing` events on cache invalidation and recurrence
//!   truncation.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod log;
mod node;
mod path;
mod recurrence;
mod resolver;

pub use node::{DateFormat, Event, EventMeta, EventTree, FlatNode, Group, Iter, Node, NodeKind};
pub use path::{ParsePathError, Path};
pub use recurrence::{DEFAULT_RECURRENCE_LIMIT, Frequency, Recurrence, expand};
pub use resolver::{CacheStats, DEFAULT_RANGE_CACHE_CAPACITY, RangeResolver, ResolvedRange};

pub use understory_timescale::{DateRange, Instant};
