// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunables for layout, virtualization, gestures, and caching.

use understory_event_tree::{DEFAULT_RANGE_CACHE_CAPACITY, DEFAULT_RECURRENCE_LIMIT};
use understory_timescale::{MAX_MARKERS, ScaleLimits};

/// Row geometry and prefetch margins.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Height of one row in pixels.
    pub row_height: f64,
    /// Vertical offset of row `0`.
    pub top_offset: f64,
    /// Prefetch distance above and below the viewport.
    pub vertical_margin: f64,
    /// Prefetch distance left and right of the viewport (timeline mode only).
    pub horizontal_margin: f64,
    /// Extra scrollable space below the last row.
    pub bottom_padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_height: 30.0,
            top_offset: 100.0,
            vertical_margin: 100.0,
            horizontal_margin: 50.0,
            bottom_padding: 500.0,
        }
    }
}

/// Gesture thresholds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GestureConfig {
    /// Maximum time between two taps of a double tap, exclusive.
    pub double_tap_ms: u64,
    /// Maximum per-axis distance between two taps of a double tap, exclusive.
    pub double_tap_tolerance: f64,
    /// Idle time after which a wheel zoom ends.
    pub gesture_timeout_ms: u64,
    /// Wheel zoom factor per unit of wheel delta: `factor = exp(-delta * sensitivity)`.
    pub wheel_sensitivity: f64,
    /// Floor applied to scales produced by a double-tap scale drag.
    pub min_drag_scale: f64,
    /// Horizontal distance from the pointer to the start of an event being moved.
    pub resize_handle_offset: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            double_tap_ms: 500,
            double_tap_tolerance: 10.0,
            gesture_timeout_ms: 200,
            wheel_sensitivity: 0.002,
            min_drag_scale: 0.01,
            resize_handle_offset: 18.0,
        }
    }
}

/// Configuration of a [`Timeline`](crate::Timeline).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimelineConfig {
    /// Row geometry.
    pub layout: LayoutConfig,
    /// Gesture thresholds.
    pub gesture: GestureConfig,
    /// Scale bounds.
    pub scale_limits: ScaleLimits,
    /// Maximum occurrences expanded per recurring event.
    pub recurrence_limit: usize,
    /// Capacity of the leaf range cache.
    pub range_cache_capacity: usize,
    /// Pixels left of the viewport still included in its date interval.
    pub left_margin: f64,
    /// Maximum number of axis markers generated.
    pub marker_cap: usize,
    /// Default width of the gantt sidebar.
    pub sidebar_width: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            gesture: GestureConfig::default(),
            scale_limits: ScaleLimits::default(),
            recurrence_limit: DEFAULT_RECURRENCE_LIMIT,
            range_cache_capacity: DEFAULT_RANGE_CACHE_CAPACITY,
            left_margin: 64.0,
            marker_cap: MAX_MARKERS,
            sidebar_width: 200.0,
        }
    }
}
