// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Double-tap detection and the scale drag that follows it.

use kurbo::Point;

use crate::config::GestureConfig;

#[derive(Copy, Clone, Debug, PartialEq)]
struct ScaleDrag {
    initial_scale: f64,
    initial_y: f64,
}

/// Recognizes double taps and tracks the vertical scale drag they start.
///
/// Two taps form a double tap when the second lands strictly within
/// [`GestureConfig::double_tap_ms`] of the first (and strictly after it) and
/// strictly within [`GestureConfig::double_tap_tolerance`] on each axis.
///
/// During the scale drag, moving down grows the scale and moving up shrinks
/// it: with `dy = initial_y - y`, the factor is `10 / (dy + 10)` for `dy >= 0`
/// and `(dy - 10) / -10` otherwise.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DoubleTap {
    last: Option<(u64, Point)>,
    drag: Option<ScaleDrag>,
}

impl DoubleTap {
    /// Records a tap. Returns `true` if it completes a double tap.
    pub fn tap(&mut self, now_ms: u64, point: Point, config: &GestureConfig) -> bool {
        if let Some((time, last)) = self.last {
            let elapsed = now_ms.saturating_sub(time);
            let near = (point.x - last.x).abs() < config.double_tap_tolerance
                && (point.y - last.y).abs() < config.double_tap_tolerance;
            if elapsed > 0 && elapsed < config.double_tap_ms && near {
                self.last = None;
                return true;
            }
        }
        self.last = Some((now_ms, point));
        false
    }

    /// Starts a scale drag at vertical position `y`.
    pub fn start_drag(&mut self, scale: f64, y: f64) {
        self.drag = Some(ScaleDrag {
            initial_scale: scale,
            initial_y: y,
        });
    }

    /// Scale for the pointer at vertical position `y`, floored at
    /// `min_scale`, or `None` when no drag is active.
    #[must_use]
    pub fn drag_scale(&self, y: f64, min_scale: f64) -> Option<f64> {
        let drag = self.drag?;
        let dy = drag.initial_y - y;
        let factor = if dy < 0.0 {
            (dy - 10.0) / -10.0
        } else {
            10.0 / (dy + 10.0)
        };
        Some((drag.initial_scale * factor).max(min_scale))
    }

    /// Returns `true` while a scale drag is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Ends the scale drag. Returns `true` if one was active.
    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// Forgets the last tap and any drag.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
