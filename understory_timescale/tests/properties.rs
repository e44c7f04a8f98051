// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the date/pixel transform and the granularity ladder.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use understory_timescale::{DateRange, Granularity, Instant, TimeScale, Weights, add_hours};

fn baseline() -> DateRange {
    DateRange::new(
        Utc.with_ymd_and_hms(1900, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap(),
    )
}

fn date_from_millis(offset_ms: i64) -> Instant {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap() + chrono::TimeDelta::milliseconds(offset_ms)
}

proptest! {
    #[test]
    fn pixel_then_date_is_identity(
        offset_ms in -3_000_000_000_000_i64..3_000_000_000_000_i64,
        scale in 0.002_f64..200.0,
    ) {
        let ts = TimeScale::new(baseline(), scale);
        let date = date_from_millis(offset_ms);
        let back = ts.date_from_pixel(ts.pixel_from_date(date));
        let error_ms = (back - date).num_milliseconds().abs();
        prop_assert!(error_ms <= 1, "error {error_ms} ms at scale {scale}");
    }

    #[test]
    fn larger_scale_means_larger_distance(
        a_ms in -1_000_000_000_000_i64..1_000_000_000_000_i64,
        gap_ms in 1_000_i64..1_000_000_000_000_i64,
        scale in 0.002_f64..100.0,
        factor in 1.01_f64..50.0,
    ) {
        let a = date_from_millis(a_ms);
        let b = date_from_millis(a_ms + gap_ms);
        let slow = TimeScale::new(baseline(), scale);
        let fast = TimeScale::new(baseline(), slow.clamp_scale(scale * factor));
        prop_assume!(fast.scale() > slow.scale());
        prop_assert!(fast.distance_between(a, b) > slow.distance_between(a, b));
    }

    #[test]
    fn exactly_one_granularity_is_selected(
        width in 1.0_f64..10_000.0,
        span in 1.0_f64..1.0e11,
    ) {
        let weights = Weights::compute(span, width);
        let selected = weights.display_granularity();
        // Every finer granularity must be at or below the threshold.
        for g in Granularity::ALL.into_iter().filter(|g| *g < selected) {
            prop_assert!(weights.get(g) <= understory_timescale::DISPLAY_WEIGHT_THRESHOLD);
        }
        prop_assert!(
            selected == Granularity::Century
                || weights.get(selected) > understory_timescale::DISPLAY_WEIGHT_THRESHOLD
        );
    }

    #[test]
    fn floor_never_exceeds_and_ceil_never_precedes(
        offset_hours in -1_000_000.0_f64..1_000_000.0,
        index in 0_usize..10,
    ) {
        let g = Granularity::ALL[index];
        let date = add_hours(date_from_millis(0), offset_hours);
        prop_assert!(g.floor(date) <= date);
        prop_assert!(g.ceil(date) >= date);
    }
}
