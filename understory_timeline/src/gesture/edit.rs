// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-to-create and drag-to-resize state.

use understory_event_tree::Path;
use understory_timescale::{DateRange, Granularity, Instant, add_hours};

/// Tracks an event being created by dragging across empty space.
///
/// The range starts as the granularity unit under the press and grows to cover
/// every unit the pointer passes over; it never shrinks below the start unit.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CreateState {
    start: Option<DateRange>,
    current: Option<DateRange>,
}

impl CreateState {
    /// Starts creating from the unit `range` under the pointer.
    pub fn start(&mut self, range: DateRange) {
        self.start = Some(range);
        self.current = None;
    }

    /// Extends the range to cover `range`. Returns the new range, or `None`
    /// when idle.
    pub fn extend(&mut self, range: DateRange) -> Option<DateRange> {
        let start = self.start?;
        let current = DateRange {
            from: range.from.min(start.from),
            to: range.to.max(start.to),
        };
        self.current = Some(current);
        Some(current)
    }

    /// Range the event would get if released now.
    #[must_use]
    pub fn range(&self) -> Option<DateRange> {
        self.current.or(self.start)
    }

    /// Ends creation and returns the final range.
    pub fn finish(&mut self) -> Option<DateRange> {
        let range = self.range();
        self.cancel();
        range
    }

    /// Abandons creation.
    pub fn cancel(&mut self) {
        self.start = None;
        self.current = None;
    }

    /// Returns `true` while creating.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }
}

/// Part of an event being dragged.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    /// The start edge; moves `from`.
    Start,
    /// The end edge; moves `to`.
    End,
    /// The body; moves both, keeping the duration.
    Body,
}

#[derive(Clone, Debug, PartialEq)]
struct Resize {
    path: Path,
    original: DateRange,
    handle: ResizeHandle,
    from: Option<Instant>,
    to: Option<Instant>,
}

/// Tracks an event whose dates are being dragged.
///
/// Edges snap down to the edit granularity; the body snaps to the nearest
/// boundary and keeps the original duration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResizeState {
    active: Option<Resize>,
}

impl ResizeState {
    /// Starts dragging `handle` of the event at `path` whose dates are
    /// `original`.
    pub fn start(&mut self, path: Path, original: DateRange, handle: ResizeHandle) {
        self.active = Some(Resize {
            path,
            original,
            handle,
            from: None,
            to: None,
        });
    }

    /// Moves the dragged part to `date`, snapped at `granularity`. Returns the
    /// preview range, or `None` when idle.
    pub fn update(&mut self, date: Instant, granularity: Granularity) -> Option<DateRange> {
        let resize = self.active.as_mut()?;
        match resize.handle {
            ResizeHandle::Start => resize.from = Some(granularity.floor(date)),
            ResizeHandle::End => resize.to = Some(granularity.floor(date)),
            ResizeHandle::Body => {
                let from = granularity.round(date);
                resize.from = Some(from);
                resize.to = Some(add_hours(from, resize.original.hours()));
            }
        }
        self.preview()
    }

    /// Range the event would get if released now.
    #[must_use]
    pub fn preview(&self) -> Option<DateRange> {
        let resize = self.active.as_ref()?;
        Some(DateRange::new(
            resize.from.unwrap_or(resize.original.from),
            resize.to.unwrap_or(resize.original.to),
        ))
    }

    /// Part of the event being dragged.
    #[must_use]
    pub fn handle(&self) -> Option<ResizeHandle> {
        self.active.as_ref().map(|r| r.handle)
    }

    /// Path of the event being dragged.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.active.as_ref().map(|r| &r.path)
    }

    /// Ends the drag and returns the edited path and range, or `None` if the
    /// pointer never moved.
    pub fn finish(&mut self) -> Option<(Path, DateRange)> {
        let range = self.preview()?;
        let resize = self.active.take()?;
        if resize.from.is_none() && resize.to.is_none() {
            return None;
        }
        Some((resize.path, range))
    }

    /// Abandons the drag.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Returns `true` while dragging.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
