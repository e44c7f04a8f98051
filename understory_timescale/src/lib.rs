// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_timescale --heading-base-level=0

//! Understory Timescale: date/pixel transforms for zoomable timelines.
//!
//! This crate provides the headless math behind a horizontal, zoomable date
//! axis:
//!
//! - [`TimeScale`]: converts between calendar instants and pixel offsets for a
//!   given reference date and scale (pixels per 24 hours), with clamped,
//!   rejectable scale changes.
//! - [`Granularity`] and [`Weights`]: the ten-step ladder (second … century)
//!   used to pick marker density for the current zoom.
//! - [`markers`]: axis markers at granularity boundaries across a baseline.
//! - [`DateRange`] and the hour helpers shared by the crates built on top.
//!
//! It does **not** own any event data or viewport state. Hosts (for example
//! `understory_timeline`) own a [`TimeScale`], feed it scroll and zoom changes,
//! and ask it where dates land.
//!
//! ## Minimal example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use understory_timescale::{DateRange, TimeScale};
//!
//! let baseline = DateRange::new(
//!     Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2050, 1, 1, 0, 0, 0).unwrap(),
//! );
//! // Ten pixels per day.
//! let mut scale = TimeScale::new(baseline, 10.0);
//!
//! let date = Utc.with_ymd_and_hms(2000, 1, 11, 0, 0, 0).unwrap();
//! assert_eq!(scale.pixel_from_date(date), 100.0);
//! assert_eq!(scale.date_from_pixel(100.0), date);
//!
//! // Zero or negative scales are rejected and leave the transform unchanged.
//! assert!(scale.set_scale(0.0).is_err());
//! assert_eq!(scale.scale(), 10.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod granularity;
mod markers;
mod range;
mod scale;

pub use granularity::{
    DISPLAY_WEIGHT_THRESHOLD, EDIT_WEIGHT_THRESHOLD, Granularity, SPAN_DENSITY, Weights,
};
pub use markers::{MAX_MARKERS, TimeMarker, markers};
pub use range::{DateRange, Instant, add_hours, add_months, hours_between};
pub use scale::{
    INITIAL_SCALE, MAX_RENDERABLE_WIDTH, MAX_SCALE, MIN_SCALE, ScaleError, ScaleLimits, TimeScale,
    baseline_for, scale_to_fit,
};
