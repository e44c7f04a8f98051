// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Direct-manipulation scrolling.

use kurbo::Point;

/// Tracks a drag that scrolls the viewport 1:1 with the pointer.
///
/// ```
/// use kurbo::Point;
/// use understory_timeline::gesture::PanState;
///
/// let mut pan = PanState::default();
/// pan.start(Point::new(100.0, 100.0), Point::new(500.0, 0.0));
/// // Dragging right by 40 px scrolls left by 40 px.
/// assert_eq!(pan.update(Point::new(140.0, 100.0)), Some(Point::new(460.0, 0.0)));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PanState {
    start_pointer: Option<Point>,
    start_scroll: Point,
}

impl PanState {
    /// Starts panning from `pointer` with the viewport scrolled to `scroll`.
    ///
    /// Returns `false` and keeps the current pan if one is already active.
    pub fn start(&mut self, pointer: Point, scroll: Point) -> bool {
        if self.start_pointer.is_some() {
            return false;
        }
        self.start_pointer = Some(pointer);
        self.start_scroll = scroll;
        true
    }

    /// Scroll offsets for the pointer at `pointer`, or `None` when idle.
    #[must_use]
    pub fn update(&self, pointer: Point) -> Option<Point> {
        let start = self.start_pointer?;
        Some(self.start_scroll + (start - pointer))
    }

    /// Ends the pan. Returns `true` if one was active.
    pub fn end(&mut self) -> bool {
        self.start_pointer.take().is_some()
    }

    /// Returns `true` while panning.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.start_pointer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_pan_is_inert() {
        let mut pan = PanState::default();
        assert_eq!(pan.update(Point::new(5.0, 5.0)), None);
        assert!(!pan.end());
    }

    #[test]
    fn offset_is_relative_to_start_not_last() {
        let mut pan = PanState::default();
        assert!(pan.start(Point::new(0.0, 0.0), Point::new(10.0, 20.0)));
        let _ = pan.update(Point::new(-5.0, 0.0));
        assert_eq!(pan.update(Point::new(-10.0, -10.0)), Some(Point::new(20.0, 30.0)));
    }

    #[test]
    fn second_start_is_ignored() {
        let mut pan = PanState::default();
        pan.start(Point::new(0.0, 0.0), Point::ZERO);
        assert!(!pan.start(Point::new(50.0, 50.0), Point::new(9.0, 9.0)));
        assert_eq!(pan.update(Point::new(0.0, 0.0)), Some(Point::ZERO));
        assert!(pan.end());
        assert!(!pan.is_panning());
    }
}
