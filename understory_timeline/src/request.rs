// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Requests emitted to the editing collaborator.

use understory_event_tree::{DateFormat, Path};
use understory_timescale::{DateRange, Granularity};

/// Precision a newly created event should be written with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RangeGranularity {
    /// A point in time; used when the timeline is zoomed to sub-hour units.
    Instant,
    /// A span of whole units.
    Unit(Granularity),
}

/// Fire-and-forget request for the host's editor.
///
/// The engine queues requests and never waits for an answer; hosts drain them
/// with [`Timeline::drain_requests`](crate::Timeline::drain_requests) and
/// reply by loading a new tree.
#[derive(Clone, Debug, PartialEq)]
pub enum TimelineRequest {
    /// Create an event covering `range`.
    CreateEvent {
        /// Dates of the new event.
        range: DateRange,
        /// Precision to write the dates with.
        granularity: RangeGranularity,
    },
    /// Replace the dates of the event at `path`.
    EditEventDateRange {
        /// Address of the edited event.
        path: Path,
        /// New dates.
        range: DateRange,
        /// Granularity the dates were snapped to.
        granularity: Granularity,
        /// Day/month ordering the event was originally written in.
        preferred_format: Option<DateFormat>,
    },
}
