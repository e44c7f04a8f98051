// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor-preserving zoom for pinch and wheel input.

use kurbo::Point;

/// Scale and scroll offsets a zoom update asks for.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZoomTarget {
    /// Requested scale.
    pub scale: f64,
    /// Scroll offsets that keep the anchor date under the pointer.
    pub scroll: Point,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Anchor {
    scale: f64,
    scroll: Point,
    local: Point,
}

/// Tracks one pinch or wheel zoom.
///
/// At start it records the scale, the scroll offsets, and the pointer position
/// relative to the scroll container. Every update multiplies the start scale by
/// the gesture's cumulative factor and computes scroll offsets that keep the
/// date under the start pointer at the current pointer's position:
///
/// `scroll.x = factor * (start_scroll.x + start_local.x) - local.x`
///
/// Vertically, moving the pointer scrolls 1:1.
///
/// ```
/// use kurbo::Point;
/// use understory_timeline::gesture::ZoomState;
///
/// let mut zoom = ZoomState::default();
/// zoom.start(10.0, Point::new(1000.0, 0.0), Point::new(200.0, 50.0), 0);
/// let target = zoom.target(2.0, Point::new(200.0, 50.0)).unwrap();
/// assert_eq!(target.scale, 20.0);
/// // Content x 1200 was under the pointer; at twice the scale it is 2400.
/// assert_eq!(target.scroll, Point::new(2200.0, 0.0));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ZoomState {
    anchor: Option<Anchor>,
    factor: f64,
    last_input_ms: u64,
}

impl ZoomState {
    /// Starts a zoom. `local` is the pointer (or pinch centroid) relative to
    /// the scroll container's left edge.
    ///
    /// Returns `false` and keeps the current anchor if already zooming.
    pub fn start(&mut self, scale: f64, scroll: Point, local: Point, now_ms: u64) -> bool {
        if self.anchor.is_some() {
            return false;
        }
        self.anchor = Some(Anchor {
            scale,
            scroll,
            local,
        });
        self.factor = 1.0;
        self.last_input_ms = now_ms;
        true
    }

    /// Returns `true` while zooming.
    #[must_use]
    pub fn is_zooming(&self) -> bool {
        self.anchor.is_some()
    }

    /// Scale the gesture started at.
    #[must_use]
    pub fn start_scale(&self) -> Option<f64> {
        self.anchor.map(|a| a.scale)
    }

    /// Target for a cumulative `factor` with the pointer at `local`, or `None`
    /// when idle or when `factor` is not a positive finite number.
    #[must_use]
    pub fn target(&self, factor: f64, local: Point) -> Option<ZoomTarget> {
        let anchor = self.anchor?;
        if !factor.is_finite() || factor <= 0.0 {
            return None;
        }
        Some(ZoomTarget {
            scale: anchor.scale * factor,
            scroll: Point::new(
                factor * (anchor.scroll.x + anchor.local.x) - local.x,
                anchor.scroll.y + anchor.local.y - local.y,
            ),
        })
    }

    /// Folds one wheel step into the cumulative factor and returns it.
    ///
    /// Positive deltas (scrolling down) zoom out.
    pub fn accumulate(&mut self, delta: f64, sensitivity: f64, now_ms: u64) -> f64 {
        let step = libm::exp(-delta * sensitivity);
        if step.is_finite() && step > 0.0 {
            self.factor *= step;
        }
        self.last_input_ms = now_ms;
        self.factor
    }

    /// Current cumulative wheel factor.
    #[must_use]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Overwrites the cumulative wheel factor, for example to undo a step
    /// whose scale was rejected.
    pub fn set_factor(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.factor = factor;
        }
    }

    /// Returns `true` if no input arrived within `timeout_ms` before `now_ms`.
    #[must_use]
    pub fn timed_out(&self, now_ms: u64, timeout_ms: u64) -> bool {
        self.is_zooming() && now_ms.saturating_sub(self.last_input_ms) >= timeout_ms
    }

    /// Ends the zoom. Returns `true` if one was active.
    pub fn end(&mut self) -> bool {
        self.factor = 1.0;
        self.anchor.take().is_some()
    }
}
