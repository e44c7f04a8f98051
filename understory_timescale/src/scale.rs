// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::granularity::Granularity;
use crate::range::{DateRange, Instant, add_hours, add_months, hours_between};

/// Smallest allowed scale, in pixels per 24 hours.
pub const MIN_SCALE: f64 = 0.002;

/// Largest allowed scale, in pixels per 24 hours.
pub const MAX_SCALE: f64 = 30_000_000.0;

/// Widest pixel extent the baseline span may occupy.
///
/// Hosts typically lay the timeline out in a single scroll container, and
/// rendering engines stop representing coordinates reliably past this width.
pub const MAX_RENDERABLE_WIDTH: f64 = 17_895_697.0;

/// Scale used when no viewport geometry is known yet.
pub const INITIAL_SCALE: f64 = 0.3;

/// Returns the scale at which `range` spans `distance_px` pixels.
///
/// Returns `None` for empty or inverted ranges.
#[must_use]
pub fn scale_to_fit(distance_px: f64, range: &DateRange) -> Option<f64> {
    let hours = range.hours();
    if hours <= 0.0 || !distance_px.is_finite() {
        return None;
    }
    Some(distance_px * 24.0 / hours)
}

/// Computes the baseline span for a page covering `page`.
///
/// The leftmost date is the start of the year three years before the page
/// starts; the rightmost is the start of the year thirty years after it ends.
#[must_use]
pub fn baseline_for(page: &DateRange) -> DateRange {
    DateRange::new(
        Granularity::Year.floor(add_months(page.from, -36)),
        Granularity::Year.floor(add_months(page.to, 360)),
    )
}

/// Bounds applied to every scale change.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScaleLimits {
    /// Minimum scale in pixels per 24 hours.
    pub min: f64,
    /// Maximum scale in pixels per 24 hours.
    pub max: f64,
    /// Maximum pixel width of the whole baseline span.
    pub max_renderable_width: f64,
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self {
            min: MIN_SCALE,
            max: MAX_SCALE,
            max_renderable_width: MAX_RENDERABLE_WIDTH,
        }
    }
}

/// Why a scale change was rejected.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ScaleError {
    /// The requested scale was zero, negative, NaN, or infinite.
    Invalid {
        /// Requested scale.
        requested: f64,
    },
    /// The requested scale fell outside the effective bounds.
    OutOfBounds {
        /// Requested scale.
        requested: f64,
        /// Effective minimum at the time of the request.
        min: f64,
        /// Effective maximum at the time of the request.
        max: f64,
    },
}

impl fmt::Display for ScaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { requested } => {
                write!(f, "scale {requested} is not a positive finite number")
            }
            Self::OutOfBounds {
                requested,
                min,
                max,
            } => write!(f, "scale {requested} is outside [{min}, {max}]"),
        }
    }
}

impl core::error::Error for ScaleError {}

/// Date/pixel transform for a horizontal timeline.
///
/// A `TimeScale` maps instants to pixel offsets relative to a reference date
/// (pixel `0`). The scale is expressed in pixels per 24 hours, so the distance
/// between two dates is `hours(to - from) * scale / 24`.
///
/// Invariant: the scale always lies within [`TimeScale::min_scale`] and
/// [`TimeScale::max_scale`], where the maximum is additionally capped so that
/// the baseline span never exceeds
/// [`ScaleLimits::max_renderable_width`] pixels.
#[derive(Clone, Debug)]
pub struct TimeScale {
    reference: Instant,
    baseline: DateRange,
    scale: f64,
    limits: ScaleLimits,
}

impl TimeScale {
    /// Creates a transform with pixel `0` at `baseline.from`.
    ///
    /// An invalid `scale` falls back to [`INITIAL_SCALE`]; the result is then
    /// clamped into the effective bounds.
    #[must_use]
    pub fn new(baseline: DateRange, scale: f64) -> Self {
        let mut this = Self {
            reference: baseline.from,
            baseline,
            scale: INITIAL_SCALE,
            limits: ScaleLimits::default(),
        };
        let requested = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            INITIAL_SCALE
        };
        this.scale = this.clamp_scale(requested);
        this
    }

    /// Current scale in pixels per 24 hours.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current scale in pixels per hour.
    #[must_use]
    pub fn pixels_per_hour(&self) -> f64 {
        self.scale / 24.0
    }

    /// The date at pixel `0`.
    #[must_use]
    pub fn reference(&self) -> Instant {
        self.reference
    }

    /// Moves pixel `0` to `reference`.
    ///
    /// Returns the pixel shift a host must add to its horizontal scroll offset
    /// to keep the same dates on screen.
    pub fn set_reference(&mut self, reference: Instant) -> f64 {
        let shift = self.distance_between(reference, self.reference);
        self.reference = reference;
        shift
    }

    /// Span used to cap the maximum scale.
    #[must_use]
    pub fn baseline(&self) -> DateRange {
        self.baseline
    }

    /// Replaces the baseline span, re-clamping the current scale.
    pub fn set_baseline(&mut self, baseline: DateRange) {
        if self.baseline == baseline {
            return;
        }
        self.baseline = baseline;
        self.scale = self.clamp_scale(self.scale);
    }

    /// Current scale limits.
    #[must_use]
    pub fn limits(&self) -> ScaleLimits {
        self.limits
    }

    /// Replaces the scale limits, normalizing `min <= max` and re-clamping.
    pub fn set_limits(&mut self, limits: ScaleLimits) {
        let (min, max) = if limits.min <= limits.max {
            (limits.min, limits.max)
        } else {
            (limits.max, limits.min)
        };
        self.limits = ScaleLimits {
            min,
            max,
            max_renderable_width: limits.max_renderable_width,
        };
        self.scale = self.clamp_scale(self.scale);
    }

    /// Effective minimum scale.
    #[must_use]
    pub fn min_scale(&self) -> f64 {
        self.limits.min
    }

    /// Effective maximum scale, including the renderable-width cap.
    #[must_use]
    pub fn max_scale(&self) -> f64 {
        let cap = scale_to_fit(self.limits.max_renderable_width, &self.baseline)
            .unwrap_or(self.limits.max);
        self.limits.max.min(cap).max(self.limits.min)
    }

    /// Clamps `scale` into the effective bounds.
    #[must_use]
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale(), self.max_scale())
    }

    /// Sets the scale if it lies within the effective bounds.
    ///
    /// Out-of-bounds requests leave the scale untouched; callers that want
    /// clamping should pass the result of [`TimeScale::clamp_scale`].
    pub fn set_scale(&mut self, scale: f64) -> Result<f64, ScaleError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ScaleError::Invalid { requested: scale });
        }
        let clamped = self.clamp_scale(scale);
        if clamped != scale {
            return Err(ScaleError::OutOfBounds {
                requested: scale,
                min: self.min_scale(),
                max: self.max_scale(),
            });
        }
        self.scale = scale;
        Ok(scale)
    }

    /// Pixel offset of `date` relative to the reference date.
    #[must_use]
    pub fn pixel_from_date(&self, date: Instant) -> f64 {
        hours_between(self.reference, date) * self.pixels_per_hour()
    }

    /// Date at pixel offset `px` relative to the reference date.
    #[must_use]
    pub fn date_from_pixel(&self, px: f64) -> Instant {
        add_hours(self.reference, px / self.pixels_per_hour())
    }

    /// Signed pixel distance from `from` to `to`.
    #[must_use]
    pub fn distance_between(&self, from: Instant, to: Instant) -> f64 {
        hours_between(from, to) * self.pixels_per_hour()
    }

    /// Pixel width of `range`.
    #[must_use]
    pub fn width_of(&self, range: &DateRange) -> f64 {
        self.distance_between(range.from, range.to)
    }

    /// Pixel width of the whole baseline span at the current scale.
    #[must_use]
    pub fn baseline_width(&self) -> f64 {
        self.width_of(&self.baseline)
    }

    /// Date interval covered by `width_px` pixels starting at `left_px`.
    #[must_use]
    pub fn interval_for(&self, left_px: f64, width_px: f64) -> DateRange {
        DateRange::new(
            self.date_from_pixel(left_px),
            self.date_from_pixel(left_px + width_px.max(0.0)),
        )
    }
}
