// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instants, date ranges, and the hour-based distance helpers shared by the
//! transform and the granularity ladder.

use chrono::{DateTime, Months, TimeDelta, Utc};

/// A point on the timeline's date axis.
///
/// All instants are UTC; time zones are a presentation concern for the host.
pub type Instant = DateTime<Utc>;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Returns the signed distance from `from` to `to` in hours.
///
/// Hours are the internal time unit of the transform: a scale is expressed in
/// pixels per 24 hours, so `distance_px = hours * scale / 24`.
#[must_use]
pub fn hours_between(from: Instant, to: Instant) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Offsets `instant` by a (possibly fractional, possibly negative) number of
/// hours, with millisecond precision.
///
/// Offsets that leave the representable range saturate at the range limits
/// instead of failing.
#[must_use]
pub fn add_hours(instant: Instant, hours: f64) -> Instant {
    if !hours.is_finite() {
        return if hours > 0.0 {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        };
    }
    let millis = libm::round(hours * MILLIS_PER_HOUR);
    let saturated = if hours > 0.0 {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    };
    // i64 milliseconds cover far more than chrono's representable range.
    if millis.abs() >= 9.0e18 {
        return saturated;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Value is rounded and range-checked above"
    )]
    let millis = millis as i64;
    TimeDelta::try_milliseconds(millis)
        .and_then(|delta| instant.checked_add_signed(delta))
        .unwrap_or(saturated)
}

/// Shifts `instant` by a signed number of calendar months, saturating.
///
/// Days past the end of the target month clamp to its last day.
#[must_use]
pub fn add_months(instant: Instant, months: i32) -> Instant {
    let shifted = if months >= 0 {
        instant.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        instant.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(if months >= 0 {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    })
}

/// A closed interval of instants.
///
/// Constructors normalize the endpoints so that `from <= to`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DateRange {
    /// Earlier endpoint.
    pub from: Instant,
    /// Later endpoint.
    pub to: Instant,
}

impl DateRange {
    /// Creates a range from two endpoints in any order.
    #[must_use]
    pub fn new(a: Instant, b: Instant) -> Self {
        if a <= b {
            Self { from: a, to: b }
        } else {
            Self { from: b, to: a }
        }
    }

    /// Creates a zero-length range at `instant`.
    #[must_use]
    pub fn instant(instant: Instant) -> Self {
        Self {
            from: instant,
            to: instant,
        }
    }

    /// Returns `true` if both endpoints coincide.
    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.from == self.to
    }

    /// Length of the range in hours.
    #[must_use]
    pub fn hours(&self) -> f64 {
        hours_between(self.from, self.to)
    }

    /// Midpoint of the range.
    #[must_use]
    pub fn midpoint(&self) -> Instant {
        add_hours(self.from, self.hours() / 2.0)
    }

    /// Returns `true` if `instant` lies inside the closed range.
    #[must_use]
    pub fn contains(&self, instant: Instant) -> bool {
        self.from <= instant && instant <= self.to
    }

    /// Returns `true` if the two closed ranges share at least one instant.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.from <= other.to && other.from <= self.to
    }

    /// Smallest range covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            from: self.from.min(other.from),
            to: self.to.max(other.to),
        }
    }

    /// Returns the same range moved by `hours`, preserving its duration.
    #[must_use]
    pub fn shifted(&self, hours: f64) -> Self {
        Self::new(add_hours(self.from, hours), add_hours(self.to, hours))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32) -> Instant {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    #[test]
    fn new_normalizes_endpoint_order() {
        let r = DateRange::new(at(2024, 5, 1, 0), at(2024, 1, 1, 0));
        assert_eq!(r.from, at(2024, 1, 1, 0));
        assert_eq!(r.to, at(2024, 5, 1, 0));
    }

    #[test]
    fn hours_and_midpoint() {
        let r = DateRange::new(at(2024, 1, 1, 0), at(2024, 1, 2, 0));
        assert_eq!(r.hours(), 24.0);
        assert_eq!(r.midpoint(), at(2024, 1, 1, 12));
    }

    #[test]
    fn add_hours_handles_fractions_and_negatives() {
        let base = at(2024, 1, 1, 12);
        assert_eq!(add_hours(base, -12.0), at(2024, 1, 1, 0));
        let half = add_hours(base, 0.5);
        assert_eq!((half - base).num_minutes(), 30);
    }

    #[test]
    fn add_hours_saturates() {
        let base = at(2024, 1, 1, 0);
        assert_eq!(add_hours(base, f64::INFINITY), DateTime::<Utc>::MAX_UTC);
        assert_eq!(add_hours(base, -1.0e30), DateTime::<Utc>::MIN_UTC);
        assert_eq!(add_hours(base, f64::NAN), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn union_and_intersection() {
        let a = DateRange::new(at(2024, 1, 1, 0), at(2024, 2, 1, 0));
        let b = DateRange::new(at(2024, 3, 1, 0), at(2024, 4, 1, 0));
        assert!(!a.intersects(&b));
        let u = a.union(&b);
        assert_eq!(u.from, a.from);
        assert_eq!(u.to, b.to);
        assert!(u.intersects(&a));
        assert!(u.contains(at(2024, 2, 15, 0)));
    }
}
