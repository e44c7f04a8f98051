// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The granularity ladder: ten discrete time units and the weights that pick
//! one of them for the current zoom.
//!
//! Each granularity has a nominal duration and an empirically tuned density
//! factor. For a viewport `width` pixels wide showing `span` seconds, the
//! weight of granularity `i` is
//!
//! ```text
//! weight[i] = clamp01(floor2(density[i] * duration[i] / denom))
//! denom     = span * SPAN_DENSITY / width
//! ```
//!
//! The display granularity is the finest one whose weight exceeds
//! [`DISPLAY_WEIGHT_THRESHOLD`], falling back to [`Granularity::Century`].
//!
//! ```rust
//! use understory_timescale::{Granularity, Weights};
//!
//! // One day spread across 1000 pixels.
//! let weights = Weights::compute(86_400.0, 1000.0);
//! assert_eq!(weights.display_granularity(), Granularity::Hour);
//!
//! // Degenerate geometry never divides by zero.
//! assert_eq!(Weights::compute(86_400.0, 0.0).display_granularity(), Granularity::Century);
//! ```

use chrono::{Datelike, NaiveDate, TimeZone, Timelike, Utc};

use crate::range::{Instant, add_hours, add_months};

/// Weight a granularity must exceed to be used for axis markers.
pub const DISPLAY_WEIGHT_THRESHOLD: f64 = 0.25;

/// Weight a granularity must exceed to be used for snapping edits.
pub const EDIT_WEIGHT_THRESHOLD: f64 = 0.05;

/// Arbitrary density constant scaling the visible span.
pub const SPAN_DENSITY: f64 = 2000.0;

const SECOND: f64 = 1.0;
const QUARTER_MINUTE: f64 = 15.0 * SECOND;
const MINUTE: f64 = 60.0 * SECOND;
const QUARTER_HOUR: f64 = 15.0 * MINUTE;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const MONTH: f64 = 30.0 * DAY;
const YEAR: f64 = 12.0 * MONTH;
const DECADE: f64 = 10.0 * YEAR;
const CENTURY: f64 = 10.0 * DECADE;

/// A discrete time unit, ordered from finest to coarsest.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Granularity {
    /// One second.
    Second,
    /// Fifteen seconds.
    QuarterMinute,
    /// One minute.
    Minute,
    /// Fifteen minutes.
    QuarterHour,
    /// One hour.
    Hour,
    /// One calendar day.
    Day,
    /// One calendar month.
    Month,
    /// One calendar year.
    Year,
    /// Ten calendar years.
    Decade,
    /// One hundred calendar years.
    Century,
}

impl Granularity {
    /// All granularities, finest first.
    pub const ALL: [Self; 10] = [
        Self::Second,
        Self::QuarterMinute,
        Self::Minute,
        Self::QuarterHour,
        Self::Hour,
        Self::Day,
        Self::Month,
        Self::Year,
        Self::Decade,
        Self::Century,
    ];

    /// Position of this granularity in [`Granularity::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Nominal duration in seconds (months are 30 days, years 360).
    #[must_use]
    pub const fn seconds(self) -> f64 {
        match self {
            Self::Second => SECOND,
            Self::QuarterMinute => QUARTER_MINUTE,
            Self::Minute => MINUTE,
            Self::QuarterHour => QUARTER_HOUR,
            Self::Hour => HOUR,
            Self::Day => DAY,
            Self::Month => MONTH,
            Self::Year => YEAR,
            Self::Decade => DECADE,
            Self::Century => CENTURY,
        }
    }

    /// Marker density factor for this granularity.
    #[must_use]
    pub const fn density(self) -> f64 {
        match self {
            Self::Second => 30.0,
            Self::QuarterMinute => 20.0,
            Self::Minute => 30.0,
            Self::QuarterHour => 20.0,
            Self::Hour => 30.0,
            Self::Day => 40.0,
            Self::Month => 30.0,
            Self::Year => 25.0,
            Self::Decade => 25.0,
            Self::Century => 20.0,
        }
    }

    /// Short lowercase name, as used in edit requests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::QuarterMinute => "quarterminute",
            Self::Minute => "minute",
            Self::QuarterHour => "quarterhour",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
            Self::Decade => "decade",
            Self::Century => "cent",
        }
    }

    /// Returns `true` for granularities of a quarter hour or finer.
    #[must_use]
    pub const fn is_sub_hour(self) -> bool {
        matches!(
            self,
            Self::Second | Self::QuarterMinute | Self::Minute | Self::QuarterHour
        )
    }

    /// Truncates `instant` down to the start of the enclosing unit.
    #[must_use]
    pub fn floor(self, instant: Instant) -> Instant {
        let naive = instant.naive_utc();
        let (year, month, day) = (naive.year(), naive.month(), naive.day());
        let (hour, minute, second) = (naive.hour(), naive.minute(), naive.second());
        let (year, month, day, hour, minute, second) = match self {
            Self::Second => (year, month, day, hour, minute, second),
            Self::QuarterMinute => (year, month, day, hour, minute, second - second % 15),
            Self::Minute => (year, month, day, hour, minute, 0),
            Self::QuarterHour => (year, month, day, hour, minute - minute % 15, 0),
            Self::Hour => (year, month, day, hour, 0, 0),
            Self::Day => (year, month, day, 0, 0, 0),
            Self::Month => (year, month, 1, 0, 0, 0),
            Self::Year => (year, 1, 1, 0, 0, 0),
            Self::Decade => (year - year.rem_euclid(10), 1, 1, 0, 0, 0),
            Self::Century => (year - year.rem_euclid(100), 1, 1, 0, 0, 0),
        };
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .map(|naive| Utc.from_utc_datetime(&naive))
            .unwrap_or(instant)
    }

    /// Rounds `instant` up to the next unit boundary (identity on boundaries).
    #[must_use]
    pub fn ceil(self, instant: Instant) -> Instant {
        let floored = self.floor(instant);
        if floored == instant {
            instant
        } else {
            self.step(floored)
        }
    }

    /// Rounds `instant` to the nearest unit boundary; halfway rounds up.
    #[must_use]
    pub fn round(self, instant: Instant) -> Instant {
        let floored = self.floor(instant);
        let ceiled = self.ceil(instant);
        if instant - floored < ceiled - instant {
            floored
        } else {
            ceiled
        }
    }

    /// Advances `instant` by one unit of this granularity.
    #[must_use]
    pub fn step(self, instant: Instant) -> Instant {
        match self {
            Self::Second => add_hours(instant, 1.0 / 3600.0),
            Self::QuarterMinute => add_hours(instant, 15.0 / 3600.0),
            Self::Minute => add_hours(instant, 1.0 / 60.0),
            Self::QuarterHour => add_hours(instant, 0.25),
            Self::Hour => add_hours(instant, 1.0),
            Self::Day => add_hours(instant, 24.0),
            Self::Month => add_months(instant, 1),
            Self::Year => add_months(instant, 12),
            Self::Decade => add_months(instant, 120),
            Self::Century => add_months(instant, 1200),
        }
    }
}

/// Per-granularity weights for one viewport geometry.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Weights([f64; 10]);

impl Weights {
    /// Computes weights for a viewport `width_px` wide showing `span_seconds`.
    ///
    /// Non-positive or non-finite inputs produce all-zero weights, which
    /// select the coarsest granularity.
    #[must_use]
    pub fn compute(span_seconds: f64, width_px: f64) -> Self {
        let valid = span_seconds.is_finite()
            && width_px.is_finite()
            && span_seconds > 0.0
            && width_px > 0.0;
        if !valid {
            return Self([0.0; 10]);
        }
        let denom = span_seconds * SPAN_DENSITY / width_px;
        let mut weights = [0.0; 10];
        for g in Granularity::ALL {
            let raw = g.density() * g.seconds() / denom;
            weights[g.index()] = (libm::floor(raw * 100.0) / 100.0).clamp(0.0, 1.0);
        }
        Self(weights)
    }

    /// Weight for a single granularity.
    #[must_use]
    pub fn get(&self, granularity: Granularity) -> f64 {
        self.0[granularity.index()]
    }

    /// All weights, finest first.
    #[must_use]
    pub fn as_array(&self) -> &[f64; 10] {
        &self.0
    }

    /// Finest granularity whose weight exceeds `threshold`, if any.
    #[must_use]
    pub fn finest_above(&self, threshold: f64) -> Option<Granularity> {
        Granularity::ALL
            .into_iter()
            .find(|g| self.get(*g) > threshold)
    }

    /// Granularity used for axis markers.
    #[must_use]
    pub fn display_granularity(&self) -> Granularity {
        self.finest_above(DISPLAY_WEIGHT_THRESHOLD)
            .unwrap_or(Granularity::Century)
    }

    /// Finer granularity used to snap resize and move edits.
    #[must_use]
    pub fn edit_granularity(&self) -> Granularity {
        self.finest_above(EDIT_WEIGHT_THRESHOLD)
            .unwrap_or(Granularity::Decade)
    }
}
