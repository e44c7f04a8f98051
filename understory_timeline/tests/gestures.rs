// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture handling through the engine: anchoring, capture bookkeeping, and
//! editor requests.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{TimeDelta, TimeZone, Utc};
use kurbo::Point;
use proptest::prelude::*;
use understory_event_tree::{DateFormat, DateRange, Event, EventTree, Group, Instant, Path};
use understory_timeline::gesture::{GestureKind, PointerCapture, ResizeHandle};
use understory_timeline::{RangeGranularity, Timeline, TimelineConfig, TimelineRequest, Viewport};
use understory_timescale::Granularity;

fn now() -> Instant {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<(GestureKind, bool)>>>);

impl Recorder {
    fn events(&self) -> Vec<(GestureKind, bool)> {
        self.0.borrow().clone()
    }
}

impl PointerCapture for Recorder {
    fn capture(&mut self, gesture: GestureKind) {
        self.0.borrow_mut().push((gesture, true));
    }

    fn release(&mut self, gesture: GestureKind) {
        self.0.borrow_mut().push((gesture, false));
    }
}

fn edited_tree() -> EventTree {
    let mut event = Event::new(DateRange::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap(),
    ));
    event.meta.date_format = Some(DateFormat::DayFirst);
    EventTree::new(vec![Group::new("g", vec![event.into()]).into()])
}

fn framed() -> (Timeline, Recorder) {
    let recorder = Recorder::default();
    let mut timeline = Timeline::new(TimelineConfig::default(), now());
    timeline.set_pointer_capture(Box::new(recorder.clone()));
    timeline.set_tree(edited_tree());
    timeline.set_viewport(Viewport::new(800.0, 600.0));
    timeline.initial_view();
    (timeline, recorder)
}

/// Screen x, relative to the time area, of `date`.
fn screen_x(timeline: &Timeline, date: Instant) -> f64 {
    timeline.time_scale().pixel_from_date(date) - timeline.viewport().left
}

proptest! {
    #[test]
    fn wheel_zoom_keeps_the_date_under_the_pointer(
        scale in 0.5_f64..500.0,
        left in -100_000.0_f64..100_000.0,
        offset_left in 0.0_f64..200.0,
        x in 0.0_f64..800.0,
        delta in -400.0_f64..400.0,
    ) {
        let mut timeline = Timeline::new(TimelineConfig::default(), now());
        timeline.set_viewport(Viewport { left, top: 0.0, width: 800.0, height: 600.0, offset_left });
        prop_assume!(timeline.set_scale(scale).is_ok());

        let client_x = x + offset_left;
        let anchor = timeline.date_from_client_left(client_x);
        let before = screen_x(&timeline, anchor);
        timeline.wheel(Point::new(client_x, 300.0), delta, 0);
        let after = screen_x(&timeline, anchor);
        prop_assert!((after - before).abs() < 0.01, "moved from {before} to {after}");
    }
}

#[test]
fn pinch_follows_the_centroid() {
    let (mut timeline, recorder) = framed();
    let start = Point::new(300.0, 200.0);
    let anchor = timeline.date_from_client_left(start.x);
    let scale = timeline.scale();

    timeline.pinch(start, 1.0).unwrap();
    let moved = Point::new(340.0, 180.0);
    let target = timeline.pinch(moved, 2.0).unwrap();
    assert!((target.scale - 2.0 * scale).abs() < 1e-9);
    assert!((screen_x(&timeline, anchor) - moved.x).abs() < 0.01);
    // Vertical centroid movement scrolls 1:1.
    assert_eq!(timeline.viewport().top, 20.0);

    timeline.pointer_up();
    assert!(!timeline.is_zooming());
    assert_eq!(
        recorder.events(),
        [(GestureKind::Pinch, true), (GestureKind::Pinch, false)]
    );
}

#[test]
fn rejected_zoom_leaves_the_view_alone() {
    let (mut timeline, _) = framed();
    let viewport = timeline.viewport();
    let scale = timeline.scale();
    assert!(timeline.pinch(Point::new(300.0, 200.0), 1e12).is_none());
    assert_eq!(timeline.viewport(), viewport);
    assert_eq!(timeline.scale(), scale);
    // The pinch is still active and accepts a valid factor.
    assert!(timeline.is_zooming());
    assert!(timeline.pinch(Point::new(300.0, 200.0), 1.5).is_some());
}

#[test]
fn wheel_zoom_ends_after_the_timeout() {
    let (mut timeline, recorder) = framed();
    let scale = timeline.scale();
    timeline.wheel(Point::new(400.0, 300.0), -100.0, 1_000).unwrap();
    timeline.wheel(Point::new(400.0, 300.0), -100.0, 1_100).unwrap();
    // Two steps of exp(0.2) accumulate into one gesture.
    let expected = scale * 0.4_f64.exp();
    assert!((timeline.scale() - expected).abs() < 1e-9 * expected);

    timeline.tick(1_200);
    assert!(timeline.is_zooming());
    timeline.tick(1_300);
    assert!(!timeline.is_zooming());
    assert_eq!(
        recorder.events(),
        [(GestureKind::Wheel, true), (GestureKind::Wheel, false)]
    );
}

#[test]
fn pan_scrolls_one_to_one() {
    let (mut timeline, recorder) = framed();
    let start = timeline.viewport().scroll();
    assert!(timeline.pan_start(Point::new(100.0, 100.0)));
    assert!(!timeline.pan_start(Point::new(0.0, 0.0)));
    let scroll = timeline.pan_move(Point::new(60.0, 80.0)).unwrap();
    assert_eq!(scroll, Point::new(start.x + 40.0, start.y + 20.0));
    timeline.pointer_up();
    assert!(timeline.pan_move(Point::new(0.0, 0.0)).is_none());
    assert_eq!(
        recorder.events(),
        [(GestureKind::Pan, true), (GestureKind::Pan, false)]
    );
}

#[test]
fn stray_input_without_a_gesture_is_inert() {
    let (mut timeline, recorder) = framed();
    let viewport = timeline.viewport();
    timeline.pointer_up();
    assert!(timeline.pan_move(Point::new(10.0, 10.0)).is_none());
    assert!(timeline.create_move(10.0).is_none());
    assert!(timeline.resize_move(10.0).is_none());
    assert!(timeline.scale_drag_move(10.0).is_none());
    timeline.pinch_end();
    timeline.escape();
    assert_eq!(timeline.viewport(), viewport);
    assert!(timeline.pending_requests().is_empty());
    assert!(recorder.events().is_empty());
}

#[test]
fn double_tap_rebases_and_starts_a_scale_drag() {
    let (mut timeline, recorder) = framed();
    let second = Point::new(305.0, 195.0);
    let under = timeline.date_from_client_left(second.x);
    let scale = timeline.scale();

    assert!(timeline.touch_tap(Point::new(300.0, 200.0), 1_000).is_none());
    assert!(timeline.touch_tap(second, 1_200).is_some());
    // The tapped date becomes the reference and stays under the finger.
    assert_eq!(timeline.time_scale().reference(), under);
    let drift = timeline.date_from_client_left(second.x) - under;
    assert!(drift.abs() <= TimeDelta::milliseconds(1));

    let left = timeline.viewport().left;
    // Dragging down by 10 px doubles the scale without scrolling.
    let doubled = timeline.scale_drag_move(205.0).unwrap();
    assert!((doubled - 2.0 * scale).abs() < 1e-9);
    assert_eq!(timeline.viewport().left, left);

    timeline.pointer_up();
    assert!(timeline.scale_drag_move(220.0).is_none());
    assert_eq!(
        recorder.events(),
        [(GestureKind::ScaleDrag, true), (GestureKind::ScaleDrag, false)]
    );
}

#[test]
fn slow_or_distant_taps_do_not_pair() {
    let (mut timeline, _) = framed();
    assert!(timeline.touch_tap(Point::new(300.0, 200.0), 1_000).is_none());
    assert!(timeline.touch_tap(Point::new(300.0, 200.0), 1_600).is_none());
    assert!(timeline.touch_tap(Point::new(320.0, 200.0), 1_700).is_none());
    assert!(timeline.touch_tap(Point::new(320.0, 200.0), 1_700).is_none());
}

#[test]
fn create_drag_requests_the_covered_units() {
    let (mut timeline, recorder) = framed();
    let granularity = timeline.display_granularity();
    let first = timeline.date_from_client_left(100.0);
    let last = timeline.date_from_client_left(500.0);

    let start = timeline.create_start(100.0).unwrap();
    assert_eq!(
        start,
        DateRange::new(granularity.floor(first), granularity.ceil(first))
    );
    assert!(!timeline.can_pan());
    assert!(!timeline.pan_start(Point::new(0.0, 0.0)));
    timeline.create_move(500.0).unwrap();
    timeline.pointer_up();

    let requests: Vec<_> = timeline.drain_requests().collect();
    let expected = if granularity.is_sub_hour() {
        RangeGranularity::Instant
    } else {
        RangeGranularity::Unit(granularity)
    };
    assert_eq!(
        requests,
        [TimelineRequest::CreateEvent {
            range: DateRange::new(granularity.floor(first), granularity.ceil(last)),
            granularity: expected,
        }]
    );
    assert!(timeline.pending_requests().is_empty());
    assert_eq!(
        recorder.events(),
        [(GestureKind::Create, true), (GestureKind::Create, false)]
    );
}

#[test]
fn create_on_a_unit_boundary_starts_empty() {
    let (mut timeline, _) = framed();
    // Pixel 0 is the reference date, the start of a year.
    timeline.scroll_to(Point::new(0.0, 0.0));
    let reference = timeline.time_scale().reference();
    assert!(timeline.display_granularity() <= Granularity::Year);
    assert_eq!(timeline.date_from_client_left(0.0), reference);

    let start = timeline.create_start(0.0).unwrap();
    assert_eq!(start, DateRange::new(reference, reference));
    timeline.escape();
    assert!(timeline.pending_requests().is_empty());
}

#[test]
fn resize_requests_an_edit_at_edit_granularity() {
    let (mut timeline, _) = framed();
    let path = Path::from([0, 0]);
    assert!(!timeline.resize_start(Path::from([0]), ResizeHandle::End));
    assert!(timeline.resize_start(path.clone(), ResizeHandle::End));

    let granularity = timeline.edit_granularity();
    let to = granularity.floor(timeline.date_from_client_left(600.0));
    let preview = timeline.resize_move(600.0).unwrap();
    let from = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    assert_eq!(preview, DateRange::new(from, to));
    timeline.pointer_up();

    assert_eq!(
        timeline.pending_requests(),
        [TimelineRequest::EditEventDateRange {
            path,
            range: DateRange::new(from, to),
            granularity,
            preferred_format: Some(DateFormat::DayFirst),
        }]
    );
}

#[test]
fn moving_the_body_keeps_the_duration() {
    let (mut timeline, _) = framed();
    assert!(timeline.resize_start(Path::from([0, 0]), ResizeHandle::Body));
    let preview = timeline.resize_move(250.0).unwrap();
    let granularity = timeline.edit_granularity();
    let expected_from = granularity.round(timeline.date_from_client_left(268.0));
    assert_eq!(preview.from, expected_from);
    assert_eq!(preview.to - preview.from, TimeDelta::days(9));
}

#[test]
fn unmoved_resize_emits_nothing() {
    let (mut timeline, recorder) = framed();
    assert!(timeline.resize_start(Path::from([0, 0]), ResizeHandle::Start));
    timeline.pointer_up();
    assert!(timeline.pending_requests().is_empty());
    assert_eq!(
        recorder.events(),
        [(GestureKind::Resize, true), (GestureKind::Resize, false)]
    );
}

#[test]
fn escape_and_reload_release_active_gestures() {
    let (mut timeline, recorder) = framed();
    timeline.create_start(100.0).unwrap();
    timeline.escape();
    assert!(!timeline.has_active_gesture());
    timeline.pointer_up();
    assert!(timeline.pending_requests().is_empty());

    timeline.resize_start(Path::from([0, 0]), ResizeHandle::End);
    timeline.resize_move(600.0);
    timeline.set_tree(edited_tree());
    assert!(!timeline.has_active_gesture());
    assert!(timeline.pending_requests().is_empty());
    assert_eq!(
        recorder.events(),
        [
            (GestureKind::Create, true),
            (GestureKind::Create, false),
            (GestureKind::Resize, true),
            (GestureKind::Resize, false),
        ]
    );
}
