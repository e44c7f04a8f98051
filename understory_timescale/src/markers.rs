// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis markers at granularity boundaries.

use alloc::vec::Vec;

use crate::granularity::Granularity;
use crate::range::{DateRange, Instant, hours_between};

/// Default cap on the number of generated markers.
pub const MAX_MARKERS: usize = 1024;

/// One axis marker.
///
/// Sizes are scale-less distances in hours; multiply by
/// [`TimeScale::pixels_per_hour`](crate::TimeScale::pixels_per_hour) to get
/// pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeMarker {
    /// Instant the marker sits on.
    pub instant: Instant,
    /// Distance in hours to the next marker.
    pub size: f64,
    /// Running distance in hours, including this marker's own size.
    pub accumulated: f64,
}

/// Generates markers across `baseline` at `granularity` boundaries.
///
/// The first marker sits on `baseline.from` itself; every following marker sits
/// on a granularity boundary. At most `cap` markers are produced; a zero cap
/// yields an empty list.
#[must_use]
pub fn markers(baseline: &DateRange, granularity: Granularity, cap: usize) -> Vec<TimeMarker> {
    let mut out = Vec::new();
    if cap == 0 {
        return out;
    }
    let leftmost = baseline.from;
    let mut next = granularity.ceil(leftmost);
    let rightmost = granularity.ceil(baseline.to);

    let mut acc = hours_between(leftmost, next);
    out.push(TimeMarker {
        instant: leftmost,
        size: acc,
        accumulated: acc,
    });

    while next < rightmost && out.len() < cap {
        out.push(TimeMarker {
            instant: next,
            size: 0.0,
            accumulated: acc,
        });
        let following = granularity.step(next);
        if following <= next {
            // Saturated at the end of the representable range.
            break;
        }
        next = following;
        if let Some(last) = out.last_mut() {
            let size = hours_between(last.instant, next);
            acc += size;
            last.size = size;
            last.accumulated = acc;
        }
    }

    if let Some(last) = out.last_mut() {
        last.size = hours_between(last.instant, rightmost);
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(y: i32, mo: u32, d: u32) -> Instant {
        Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn yearly_markers_cover_the_baseline() {
        let baseline = DateRange::new(at(2000, 1, 1), at(2005, 1, 1));
        let m = markers(&baseline, Granularity::Year, MAX_MARKERS);
        // The leftmost date is already a boundary, so it appears twice: once as
        // the leading marker and once as the first boundary.
        assert_eq!(m.len(), 6);
        assert_eq!(m[0].instant, at(2000, 1, 1));
        assert_eq!(m[0].size, 0.0);
        assert_eq!(m[1].instant, at(2000, 1, 1));
        assert_eq!(m[5].instant, at(2004, 1, 1));
        assert_eq!(m[1].size, 366.0 * 24.0);
        assert_eq!(m[5].size, 366.0 * 24.0);
    }

    #[test]
    fn leading_marker_measures_to_first_boundary() {
        let baseline = DateRange::new(at(2000, 1, 21), at(2000, 4, 1));
        let m = markers(&baseline, Granularity::Month, MAX_MARKERS);
        assert_eq!(m[0].instant, at(2000, 1, 21));
        assert_eq!(m[0].size, 11.0 * 24.0);
        assert_eq!(m[1].instant, at(2000, 2, 1));
        assert_eq!(m.last().unwrap().instant, at(2000, 3, 1));
    }

    #[test]
    fn accumulated_grows_monotonically() {
        let baseline = DateRange::new(at(2000, 1, 1), at(2000, 1, 10));
        let m = markers(&baseline, Granularity::Day, MAX_MARKERS);
        for pair in m.windows(2) {
            assert!(pair[1].accumulated >= pair[0].accumulated);
        }
    }

    #[test]
    fn cap_bounds_the_output() {
        let baseline = DateRange::new(at(2000, 1, 1), at(2100, 1, 1));
        assert_eq!(markers(&baseline, Granularity::Day, 16).len(), 16);
        assert!(markers(&baseline, Granularity::Day, 0).is_empty());
    }
}
