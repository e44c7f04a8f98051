// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-container geometry and display modes.

use kurbo::Point;

/// Geometry of the host's scroll container, in content pixels.
///
/// `left`/`top` are the scroll offsets; horizontal content pixel `0` is the
/// time scale's reference date. `offset_left` is the container's distance from
/// the left edge of the client area.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Horizontal scroll offset.
    pub left: f64,
    /// Vertical scroll offset.
    pub top: f64,
    /// Visible width.
    pub width: f64,
    /// Visible height.
    pub height: f64,
    /// Left edge of the container in client coordinates.
    pub offset_left: f64,
}

impl Viewport {
    /// Creates a viewport scrolled to the origin.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Returns `true` if the viewport cannot show anything: a non-positive or
    /// non-finite extent, or non-finite offsets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let finite = self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.offset_left.is_finite();
        !finite || self.width <= 0.0 || self.height <= 0.0
    }

    /// Scroll offsets as a point.
    #[must_use]
    pub fn scroll(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Sets both scroll offsets.
    pub fn set_scroll(&mut self, scroll: Point) {
        self.left = scroll.x;
        self.top = scroll.y;
    }
}

/// How rows are drawn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// Events sit at their dates; offscreen events are culled horizontally.
    #[default]
    Timeline,
    /// Rows span the full width beside a sidebar; no horizontal culling.
    Gantt,
}
