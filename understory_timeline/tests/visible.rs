// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport culling, display keys, and the scroll target.

use chrono::{TimeZone, Utc};
use kurbo::Point;
use understory_event_tree::{DateRange, Event, EventTree, Group, Instant, Node, Path};
use understory_timeline::{DisplayMode, Timeline, TimelineConfig, Viewport};
use understory_timescale::{Granularity, Weights};

fn now() -> Instant {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn at(year: i32) -> Node {
    Event::new(DateRange::instant(
        Utc.with_ymd_and_hms(year, 6, 1, 0, 0, 0).unwrap(),
    ))
    .into()
}

fn long_group(len: usize) -> EventTree {
    EventTree::new(vec![
        Group::new("many", (0..len).map(|_| at(2024)).collect()).into(),
    ])
}

fn framed(tree: EventTree, width: f64, height: f64) -> Timeline {
    let mut timeline = Timeline::new(TimelineConfig::default(), now());
    timeline.set_tree(tree);
    timeline.set_viewport(Viewport::new(width, height));
    timeline.initial_view();
    timeline
}

#[test]
fn zero_sized_viewport_shows_nothing() {
    let mut timeline = Timeline::new(TimelineConfig::default(), now());
    timeline.set_tree(long_group(10));
    assert!(timeline.initial_view().is_none());
    assert!(timeline.visible().is_empty());
    assert_eq!(timeline.display_granularity(), Granularity::Century);

    timeline.set_viewport(Viewport::new(0.0, 600.0));
    assert!(timeline.visible().is_empty());
}

#[test]
fn only_rows_inside_the_band_are_selected() {
    let mut timeline = framed(long_group(200), 800.0, 300.0);
    let visible = timeline.visible();
    assert_eq!(visible.sections.len(), 1);
    // Event tops are strictly inside (-100, 400): rows 2 through 9.
    let rows: Vec<f64> = visible.events.iter().map(|e| e.top).collect();
    assert_eq!(rows.first(), Some(&160.0));
    assert_eq!(rows.last(), Some(&370.0));
    assert_eq!(rows.len(), 8);
    assert!(visible.events.iter().all(|e| !e.collapsed));
}

#[test]
fn keys_are_recycled_while_scrolling() {
    let mut timeline = framed(long_group(400), 800.0, 300.0);
    let left = timeline.viewport().left;
    let mut widest = 0;
    let mut highest_key = 0;
    let mut previous: Vec<(Path, u32)> = Vec::new();
    for step in 0..300 {
        timeline.scroll_to(Point::new(left, f64::from(step) * 30.0));
        let visible = timeline.visible();
        widest = widest.max(visible.events.len());
        for event in &visible.events {
            highest_key = highest_key.max(event.key);
            if let Some((_, key)) = previous.iter().find(|(p, _)| *p == event.path) {
                assert_eq!(*key, event.key, "a path that stays visible keeps its key");
            }
        }
        previous = visible
            .events
            .iter()
            .map(|e| (e.path.clone(), e.key))
            .collect();
    }
    assert!(widest > 0);
    assert!((highest_key as usize) < widest);
}

#[test]
fn scroll_target_is_always_selected() {
    let mut timeline = framed(long_group(200), 800.0, 300.0);
    let target = Path::from([0, 150]);
    assert!(!timeline.visible().events.iter().any(|e| e.path == target));
    timeline.set_scroll_target(Some(target.clone()));
    let visible = timeline.visible();
    let event = visible.events.iter().find(|e| e.path == target).unwrap();
    assert_eq!(event.top, 100.0 + 30.0 * 152.0);
}

#[test]
fn timeline_mode_culls_horizontally_and_gantt_does_not() {
    let tree = EventTree::new(vec![Group::new("g", vec![at(2024), at(2034)]).into()]);
    let mut timeline = framed(tree, 800.0, 600.0);
    let far = Path::from([0, 1]);
    let visible = timeline.visible();
    assert!(visible.events.iter().any(|e| e.path == Path::from([0, 0])));
    assert!(!visible.events.iter().any(|e| e.path == far));

    timeline.set_mode(DisplayMode::Gantt);
    assert!(timeline.visible().events.iter().any(|e| e.path == far));
}

#[test]
fn collapsed_subtrees_hide_sections_but_keep_events() {
    let tree = EventTree::new(vec![
        Group::new(
            "outer",
            vec![Group::new("inner", vec![at(2024)]).into(), at(2024)],
        )
        .into(),
    ]);
    let mut timeline = framed(tree, 800.0, 600.0);
    assert_eq!(timeline.visible().sections.len(), 2);

    timeline.collapse(Path::from([0]));
    let visible = timeline.visible();
    assert_eq!(visible.sections.len(), 1);
    assert_eq!(visible.sections[0].path, Path::from([0]));
    assert_eq!(visible.events.len(), 2);
    assert!(visible.events.iter().all(|e| e.collapsed && e.top == 130.0));
}

#[test]
fn visible_set_is_reused_until_an_input_changes() {
    let mut timeline = framed(long_group(50), 800.0, 300.0);
    let first = timeline.visible().clone();
    assert_eq!(timeline.visible(), &first);

    let viewport = timeline.viewport();
    timeline.set_viewport(Viewport {
        top: viewport.top + 300.0,
        ..viewport
    });
    assert_ne!(timeline.visible(), &first);
}

#[test]
fn weights_cover_the_area_left_of_the_viewport() {
    let mut timeline = Timeline::new(TimelineConfig::default(), now());
    timeline.set_tree(long_group(10));
    timeline.set_viewport(Viewport {
        offset_left: 400.0,
        ..Viewport::new(800.0, 600.0)
    });
    timeline.initial_view();
    // The date interval includes the offset.
    let seconds = timeline.viewport_date_interval().hours() * 3600.0;
    assert_eq!(timeline.weights(), Weights::compute(seconds, 1200.0));
    assert_ne!(timeline.weights(), Weights::compute(seconds, 800.0));
}
