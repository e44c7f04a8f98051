// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture state machines.
//!
//! Each gesture is a small state object that is idle until started, active
//! while it tracks pointer input, and idle again after it ends or is
//! cancelled. The states only do arithmetic; [`Timeline`](crate::Timeline)
//! feeds them viewport and scale values, applies their results, and brackets
//! every active period with [`PointerCapture::capture`] and
//! [`PointerCapture::release`].

mod edit;
mod pan;
mod tap;
mod zoom;

pub use edit::{CreateState, ResizeHandle, ResizeState};
pub use pan::PanState;
pub use tap::DoubleTap;
pub use zoom::{ZoomState, ZoomTarget};

/// Identifies a gesture for pointer capture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// One-pointer drag scrolling.
    Pan,
    /// Two-pointer zoom.
    Pinch,
    /// Wheel or trackpad zoom.
    Wheel,
    /// Vertical drag after a double tap.
    ScaleDrag,
    /// Drag on empty space creating an event.
    Create,
    /// Drag of an event's handle or body.
    Resize,
}

impl GestureKind {
    pub(crate) const ALL: [Self; 6] = [
        Self::Pan,
        Self::Pinch,
        Self::Wheel,
        Self::ScaleDrag,
        Self::Create,
        Self::Resize,
    ];

    pub(crate) const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Host hook for routing pointer input to the timeline while a gesture is
/// active.
///
/// Platform shells typically register move/up/key listeners in `capture` and
/// remove them in `release`. The timeline calls `release` exactly once for
/// every `capture`, on every exit path: completion, cancellation, Escape,
/// timeout, or loading a new tree.
pub trait PointerCapture {
    /// A gesture became active.
    fn capture(&mut self, gesture: GestureKind);
    /// A gesture became idle.
    fn release(&mut self, gesture: GestureKind);
}

/// A [`PointerCapture`] that does nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn capture(&mut self, _: GestureKind) {}
    fn release(&mut self, _: GestureKind) {}
}
