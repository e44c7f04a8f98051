// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport culling of sections and events.

use alloc::vec::Vec;

use understory_event_tree::{EventTree, FlatNode, NodeKind, Path, RangeResolver};
use understory_timescale::TimeScale;

use crate::collapse::CollapseSet;
use crate::config::LayoutConfig;
use crate::keys::KeyRecycler;
use crate::layout::LayoutIndex;
use crate::log;
use crate::viewport::{DisplayMode, Viewport};

/// A visible leaf.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleEvent {
    /// Address of the event.
    pub path: Path,
    /// Recycled display key.
    pub key: u32,
    /// Pixel offset of the event's row.
    pub top: f64,
    /// Horizontal pixel offset of the event's start.
    pub left: f64,
    /// Horizontal pixel extent of the event.
    pub width: f64,
    /// `true` if the event is drawn on a collapsed ancestor's row.
    pub collapsed: bool,
}

/// A visible group.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleSection {
    /// Address of the group.
    pub path: Path,
    /// Recycled display key.
    pub key: u32,
    /// Pixel offset of the group's title row.
    pub top: f64,
    /// Pixel height of the group including its visible descendants.
    pub height: f64,
}

/// Nodes intersecting the viewport, in document order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleSet {
    /// Visible leaves.
    pub events: Vec<VisibleEvent>,
    /// Visible groups.
    pub sections: Vec<VisibleSection>,
}

impl VisibleSet {
    /// Returns `true` if nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.sections.is_empty()
    }
}

/// Everything selection reads besides the range cache.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SelectionInput<'a> {
    pub(crate) tree: &'a EventTree,
    pub(crate) nodes: &'a [FlatNode],
    pub(crate) layout: &'a LayoutIndex,
    pub(crate) collapse: &'a CollapseSet,
    pub(crate) scale: &'a TimeScale,
    pub(crate) viewport: Viewport,
    pub(crate) mode: DisplayMode,
    pub(crate) scroll_target: Option<&'a Path>,
    pub(crate) config: &'a LayoutConfig,
}

/// Culls nodes against the viewport and keys the survivors.
///
/// Sections and events draw keys from separate recyclers.
#[derive(Clone, Debug, Default)]
pub(crate) struct VisibleSelector {
    event_keys: KeyRecycler,
    section_keys: KeyRecycler,
}

impl VisibleSelector {
    pub(crate) fn clear(&mut self) {
        self.event_keys.clear();
        self.section_keys.clear();
    }

    pub(crate) fn select(
        &mut self,
        input: &SelectionInput<'_>,
        ranges: &mut RangeResolver,
    ) -> VisibleSet {
        let mut events: Vec<(Path, f64, f64, f64, bool)> = Vec::new();
        let mut sections: Vec<(Path, f64, f64)> = Vec::new();

        if !input.viewport.is_empty() {
            collect(input, ranges, &mut events, &mut sections);
        }

        let event_keys = self.event_keys.assign(events.iter().map(|e| &e.0));
        let section_keys = self.section_keys.assign(sections.iter().map(|s| &s.0));
        log::trace!(
            events = events.len(),
            sections = sections.len(),
            "visible set recomputed"
        );
        VisibleSet {
            events: events
                .into_iter()
                .zip(event_keys)
                .map(|((path, top, left, width, collapsed), key)| VisibleEvent {
                    path,
                    key,
                    top,
                    left,
                    width,
                    collapsed,
                })
                .collect(),
            sections: sections
                .into_iter()
                .zip(section_keys)
                .map(|((path, top, height), key)| VisibleSection {
                    path,
                    key,
                    top,
                    height,
                })
                .collect(),
        }
    }
}

fn collect(
    input: &SelectionInput<'_>,
    ranges: &mut RangeResolver,
    events: &mut Vec<(Path, f64, f64, f64, bool)>,
    sections: &mut Vec<(Path, f64, f64)>,
) {
    let vp = input.viewport;
    let config = input.config;
    let band_top = vp.top - config.vertical_margin;
    let band_bottom = vp.top + vp.height + config.vertical_margin;
    let band_left = vp.left - config.horizontal_margin;
    let band_right = vp.left + vp.width + config.horizontal_margin;

    for (position, node) in input.nodes.iter().enumerate() {
        if node.path.is_root() {
            continue;
        }
        match node.kind {
            NodeKind::Group => {
                if input.collapse.is_collapsed_child(&node.path) {
                    continue;
                }
                let slot = input.layout.slot_at(position, None, config);
                if slot.top > band_bottom || slot.top + slot.height < band_top {
                    continue;
                }
                sections.push((node.path.clone(), slot.top, slot.height));
            }
            NodeKind::Event => {
                let redirect = input
                    .collapse
                    .collapsed_ancestor_of(&node.path)
                    .and_then(|ancestor| input.layout.position(ancestor.as_slice()));
                let slot = input.layout.slot_at(position, redirect, config);
                let targeted = input.scroll_target == Some(&node.path);
                if !targeted && !(slot.top > band_top && slot.top < band_bottom) {
                    continue;
                }
                let (left, width) = ranges
                    .range_of(input.tree, &node.path)
                    .map_or((0.0, 0.0), |r| {
                        let range = r.range();
                        (input.scale.pixel_from_date(range.from), input.scale.width_of(&range))
                    });
                let horizontal = input.mode == DisplayMode::Gantt
                    || (left <= band_right && left + width >= band_left);
                if targeted || horizontal {
                    events.push((node.path.clone(), slot.top, left, width, redirect.is_some()));
                }
            }
        }
    }
}
