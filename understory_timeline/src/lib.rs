// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_timeline --heading-base-level=0

//! Understory Timeline: a headless, virtualized timeline over an event tree.
//!
//! [`Timeline`] turns an [`EventTree`](understory_event_tree::EventTree) into
//! rows and pixels:
//!
//! - **Collapse**: [`CollapseSet`] records collapsed groups by path. Loading a
//!   tree resets it from each group's `expanded` flag.
//! - **Layout**: [`LayoutIndex`] assigns every node a row from its predecessor
//!   count and sizes groups by their visible descendants. Nodes under a
//!   collapsed group share the group's row.
//! - **Virtualization**: [`Timeline::visible`] returns only the sections and
//!   events near the viewport, each with a small display key recycled as
//!   nodes scroll in and out.
//! - **Gestures**: drag scrolling, pinch and wheel zoom anchored under the
//!   pointer, double-tap scale drags, and create/resize drags that queue
//!   [`TimelineRequest`]s for the host's editor.
//!
//! The engine does no rendering and no I/O. Hosts feed it a [`Viewport`]
//! snapshot and input events, read back scroll offsets, the visible set and
//! axis markers, and apply them to their own widgets.
//!
//! ## Minimal example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use understory_event_tree::{DateRange, Event, EventTree, Group, Path};
//! use understory_timeline::{Timeline, TimelineConfig, Viewport};
//!
//! let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
//! let event = |d| Event::new(DateRange::instant(Utc.with_ymd_and_hms(2024, 6, d, 0, 0, 0).unwrap()));
//! let tree = EventTree::new(vec![
//!     Group::new("Launch", vec![event(1).into(), event(2).into()]).into(),
//! ]);
//!
//! let mut timeline = Timeline::new(TimelineConfig::default(), now);
//! timeline.set_tree(tree);
//! timeline.set_viewport(Viewport::new(800.0, 600.0));
//! timeline.initial_view();
//!
//! // Group on row 1, its events on rows 2 and 3.
//! assert_eq!(timeline.predecessor_count(&Path::from([0, 1])), 3);
//!
//! timeline.collapse(Path::from([0]));
//! let visible = timeline.visible();
//! assert_eq!(visible.sections.len(), 1);
//! // Events of a collapsed group are drawn on its row.
//! assert!(visible.events.iter().all(|e| e.collapsed && e.top == 130.0));
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to Kurbo's `std` feature.
//! - `libm`: forwards to Kurbo's `libm` feature for `no_std` builds.
//! - `tracing`: emit `tracing` events for tree loads, layout rebuilds,
//!   gestures, and queued requests.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod collapse;
mod config;
mod input;
mod keys;
mod layout;
mod log;
mod memo;
mod request;
mod timeline;
mod viewport;
mod visible;

pub mod gesture;

pub use collapse::CollapseSet;
pub use config::{GestureConfig, LayoutConfig, TimelineConfig};
pub use keys::KeyRecycler;
pub use layout::{LayoutIndex, Slot};
pub use request::{RangeGranularity, TimelineRequest};
pub use timeline::Timeline;
pub use viewport::{DisplayMode, Viewport};
pub use visible::{VisibleEvent, VisibleSection, VisibleSet};
