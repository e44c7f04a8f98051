// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer, wheel, and keyboard input.
//!
//! Hosts translate platform events into these calls. Positions are client
//! coordinates unless stated otherwise; times are milliseconds on any
//! monotonic clock. Every method is inert when the gesture it continues is not
//! active, so a stray move or up event never changes state.

use kurbo::Point;
use understory_event_tree::{Node, Path};
use understory_timescale::DateRange;

use crate::Timeline;
use crate::gesture::{GestureKind, ResizeHandle, ZoomTarget};
use crate::log;
use crate::request::{RangeGranularity, TimelineRequest};

impl Timeline {
    /// Returns `true` if a drag on empty space may scroll: no event is being
    /// created or resized.
    #[must_use]
    pub fn can_pan(&self) -> bool {
        !self.create.is_active() && !self.resize.is_active()
    }

    // --- Pan --------------------------------------------------------------------

    /// Starts drag scrolling with the pointer at `pointer`.
    ///
    /// Returns `false` if a pan is already active or an edit gesture holds the
    /// pointer.
    pub fn pan_start(&mut self, pointer: Point) -> bool {
        if !self.can_pan() || !self.pan.start(pointer, self.viewport.scroll()) {
            return false;
        }
        self.engage(GestureKind::Pan);
        true
    }

    /// Moves the pan pointer and returns the new scroll offsets.
    pub fn pan_move(&mut self, pointer: Point) -> Option<Point> {
        let scroll = self.pan.update(pointer)?;
        self.scroll_to(scroll);
        Some(scroll)
    }

    /// Ends drag scrolling.
    pub fn pan_end(&mut self) {
        if self.pan.end() {
            self.disengage(GestureKind::Pan);
        }
    }

    /// Returns `true` while drag scrolling.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.pan.is_panning()
    }

    // --- Zoom -------------------------------------------------------------------

    /// Applies a pinch with centroid `center` and cumulative `factor` since
    /// the pinch began.
    ///
    /// The first call anchors the date under `center`; later calls keep that
    /// date under the centroid. Returns the applied target, or `None` if the
    /// scale was rejected (the pinch stays active).
    pub fn pinch(&mut self, center: Point, factor: f64) -> Option<ZoomTarget> {
        let local = self.local_point(center);
        if self.zoom_kind == Some(GestureKind::Wheel) {
            self.end_zoom();
        }
        if self.zoom_kind.is_none() {
            self.begin_zoom(GestureKind::Pinch, local, 0);
        }
        let target = self.zoom.target(factor, local)?;
        self.apply_zoom(target)
    }

    /// Ends a pinch.
    pub fn pinch_end(&mut self) {
        if self.zoom_kind == Some(GestureKind::Pinch) {
            self.end_zoom();
        }
    }

    /// Applies one wheel zoom step of `delta` with the pointer at `origin`.
    ///
    /// Steps arriving within the gesture timeout of each other accumulate into
    /// one zoom anchored at the first step's pointer. Ignored during a pinch.
    pub fn wheel(&mut self, origin: Point, delta: f64, now_ms: u64) -> Option<ZoomTarget> {
        self.tick(now_ms);
        if self.zoom_kind == Some(GestureKind::Pinch) {
            return None;
        }
        let local = self.local_point(origin);
        if self.zoom_kind.is_none() {
            self.begin_zoom(GestureKind::Wheel, local, now_ms);
        }
        let previous = self.zoom.factor();
        let factor = self
            .zoom
            .accumulate(delta, self.config.gesture.wheel_sensitivity, now_ms);
        let applied = self
            .zoom
            .target(factor, local)
            .and_then(|target| self.apply_zoom(target));
        if applied.is_none() {
            self.zoom.set_factor(previous);
        }
        applied
    }

    /// Advances the clock; ends a wheel zoom that has been idle past the
    /// gesture timeout.
    pub fn tick(&mut self, now_ms: u64) {
        if self.zoom_kind == Some(GestureKind::Wheel)
            && self
                .zoom
                .timed_out(now_ms, self.config.gesture.gesture_timeout_ms)
        {
            self.end_zoom();
        }
    }

    /// Returns `true` while a pinch or wheel zoom is active.
    #[must_use]
    pub fn is_zooming(&self) -> bool {
        self.zoom.is_zooming()
    }

    fn begin_zoom(&mut self, kind: GestureKind, local: Point, now_ms: u64) {
        if self
            .zoom
            .start(self.scale.scale(), self.viewport.scroll(), local, now_ms)
        {
            self.zoom_kind = Some(kind);
            self.engage(kind);
        }
    }

    fn end_zoom(&mut self) {
        self.zoom.end();
        if let Some(kind) = self.zoom_kind.take() {
            self.disengage(kind);
        }
    }

    fn apply_zoom(&mut self, target: ZoomTarget) -> Option<ZoomTarget> {
        self.set_scale(target.scale).ok()?;
        self.scroll_to(target.scroll);
        Some(target)
    }

    // --- Double tap -------------------------------------------------------------

    /// Records a touch tap at `point`.
    ///
    /// A second tap within the double-tap window and tolerance moves the time
    /// scale's reference date under the tap, shifts the horizontal scroll
    /// offset to compensate, and starts a vertical scale drag. Returns the
    /// applied shift.
    pub fn touch_tap(&mut self, point: Point, now_ms: u64) -> Option<f64> {
        if !self.taps.tap(now_ms, point, &self.config.gesture) {
            return None;
        }
        let reference = self.date_from_client_left(point.x);
        let shift = self.scale.set_reference(reference);
        let scroll = Point::new(self.viewport.left + shift, self.viewport.top);
        self.scroll_to(scroll);
        self.taps.start_drag(self.scale.scale(), point.y);
        self.engage(GestureKind::ScaleDrag);
        log::trace!(shift, "double tap");
        Some(shift)
    }

    /// Moves the scale drag pointer to vertical position `y` and returns the
    /// applied scale. Scroll offsets are left alone.
    pub fn scale_drag_move(&mut self, y: f64) -> Option<f64> {
        let scale = self.taps.drag_scale(y, self.config.gesture.min_drag_scale)?;
        self.set_scale(scale).ok()
    }

    /// Ends the scale drag.
    pub fn scale_drag_end(&mut self) {
        if self.taps.end_drag() {
            self.disengage(GestureKind::ScaleDrag);
        }
    }

    // --- Create -----------------------------------------------------------------

    /// Starts creating an event at the display-granularity unit under
    /// `client_x` and returns the initial range.
    ///
    /// Returns `None` while another edit gesture is active.
    pub fn create_start(&mut self, client_x: f64) -> Option<DateRange> {
        if self.create.is_active() || self.resize.is_active() {
            return None;
        }
        let range = self.unit_range_at(client_x);
        self.create.start(range);
        self.engage(GestureKind::Create);
        Some(range)
    }

    /// Extends the new event to the unit under `client_x` and returns the
    /// preview range.
    pub fn create_move(&mut self, client_x: f64) -> Option<DateRange> {
        if !self.create.is_active() {
            return None;
        }
        let unit = self.unit_range_at(client_x);
        self.create.extend(unit)
    }

    /// Range of the event being created.
    #[must_use]
    pub fn create_preview(&self) -> Option<DateRange> {
        self.create.range()
    }

    /// Ends event creation and queues a
    /// [`CreateEvent`](TimelineRequest::CreateEvent) request.
    ///
    /// Ranges are requested as instants while the axis shows sub-hour units.
    pub fn create_end(&mut self) -> Option<DateRange> {
        let range = self.create.finish()?;
        self.disengage(GestureKind::Create);
        let display = self.display_granularity();
        let granularity = if display.is_sub_hour() {
            RangeGranularity::Instant
        } else {
            RangeGranularity::Unit(display)
        };
        self.push_request(TimelineRequest::CreateEvent { range, granularity });
        Some(range)
    }

    // --- Resize -----------------------------------------------------------------

    /// Starts dragging `handle` of the event at `path`.
    ///
    /// Returns `false` for unknown paths, groups, or while another edit
    /// gesture is active.
    pub fn resize_start(&mut self, path: Path, handle: ResizeHandle) -> bool {
        if self.create.is_active() || self.resize.is_active() {
            return false;
        }
        let Some(Node::Event(event)) = self.tree().get(path.as_slice()) else {
            return false;
        };
        let original = event.range;
        self.resize.start(path, original, handle);
        self.engage(GestureKind::Resize);
        true
    }

    /// Moves the dragged part to the pointer at `client_x` and returns the
    /// preview range.
    ///
    /// Edges follow the pointer; the body keeps its start a fixed distance to
    /// the left of the pointer.
    pub fn resize_move(&mut self, client_x: f64) -> Option<DateRange> {
        let handle = self.resize.handle()?;
        let x = match handle {
            ResizeHandle::Body => client_x + self.config.gesture.resize_handle_offset,
            ResizeHandle::Start | ResizeHandle::End => client_x,
        };
        let date = self.date_from_client_left(x);
        let granularity = self.edit_granularity();
        self.resize.update(date, granularity)
    }

    /// Path and preview range of the event being dragged.
    #[must_use]
    pub fn resize_preview(&self) -> Option<(&Path, DateRange)> {
        Some((self.resize.path()?, self.resize.preview()?))
    }

    /// Ends the drag and queues an
    /// [`EditEventDateRange`](TimelineRequest::EditEventDateRange) request if
    /// the event moved.
    pub fn resize_end(&mut self) -> Option<DateRange> {
        if !self.resize.is_active() {
            return None;
        }
        let finished = self.resize.finish();
        self.disengage(GestureKind::Resize);
        let (path, range) = finished?;
        let preferred_format = self
            .tree()
            .get(path.as_slice())
            .and_then(Node::as_event)
            .and_then(|event| event.meta.date_format);
        let granularity = self.edit_granularity();
        self.push_request(TimelineRequest::EditEventDateRange {
            path,
            range,
            granularity,
            preferred_format,
        });
        Some(range)
    }

    // --- Lifecycle --------------------------------------------------------------

    /// Completes every pointer-driven gesture, queueing the requests edit
    /// gestures produce. Inert when nothing is active.
    pub fn pointer_up(&mut self) {
        self.pan_end();
        self.pinch_end();
        self.scale_drag_end();
        self.create_end();
        self.resize_end();
    }

    /// Abandons every gesture without queueing requests.
    pub fn pointer_cancel(&mut self) {
        self.cancel_gestures();
    }

    /// Abandons every gesture without queueing requests.
    pub fn escape(&mut self) {
        if self.has_active_gesture() {
            log::debug!("gestures cancelled by escape");
        }
        self.cancel_gestures();
    }

    /// Returns `true` while any gesture holds the pointer.
    #[must_use]
    pub fn has_active_gesture(&self) -> bool {
        GestureKind::ALL.into_iter().any(|kind| self.is_captured(kind))
    }
}
