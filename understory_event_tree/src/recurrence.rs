// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recurrence rules and bounded occurrence expansion.

use alloc::vec::Vec;

use chrono::TimeDelta;
use understory_timescale::{DateRange, Instant, add_hours, add_months};

/// Default cap on expanded occurrences per event.
pub const DEFAULT_RECURRENCE_LIMIT: usize = 100;

/// Unit a recurrence steps by.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// Every `interval` seconds.
    Secondly,
    /// Every `interval` minutes.
    Minutely,
    /// Every `interval` hours.
    Hourly,
    /// Every `interval` days.
    Daily,
    /// Every `interval` weeks.
    Weekly,
    /// Every `interval` calendar months.
    Monthly,
    /// Every `interval` calendar years.
    Yearly,
}

/// A parsed repetition rule.
///
/// Occurrences start at the event's own range and repeat every
/// `interval` × `frequency`, stopping at `count` occurrences or once an
/// occurrence would start after `until`, whichever comes first. A rule with
/// neither bound repeats indefinitely and relies on the expansion cap.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Recurrence {
    /// Step unit.
    pub frequency: Frequency,
    /// Step multiplier; `0` is treated as `1`.
    pub interval: u32,
    /// Total number of occurrences, including the first.
    pub count: Option<u32>,
    /// Last instant an occurrence may start at.
    pub until: Option<Instant>,
}

impl Recurrence {
    /// Creates an unbounded rule stepping every `interval` × `frequency`.
    #[must_use]
    pub fn new(frequency: Frequency, interval: u32) -> Self {
        Self {
            frequency,
            interval,
            count: None,
            until: None,
        }
    }

    /// Bounds the rule to `count` occurrences.
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Bounds the rule to occurrences starting no later than `until`.
    #[must_use]
    pub fn with_until(mut self, until: Instant) -> Self {
        self.until = Some(until);
        self
    }

    /// Start of occurrence `n` (zero-based) for a first occurrence at `start`.
    ///
    /// Month and year steps are taken from `start` rather than chained, so a
    /// rule starting on the 31st keeps landing on month ends.
    fn nth_start(&self, start: Instant, n: u32) -> Option<Instant> {
        let steps = i64::from(self.interval.max(1)) * i64::from(n);
        let fixed = |unit: i64| {
            TimeDelta::try_seconds(steps.checked_mul(unit)?)
                .and_then(|delta| start.checked_add_signed(delta))
        };
        match self.frequency {
            Frequency::Secondly => fixed(1),
            Frequency::Minutely => fixed(60),
            Frequency::Hourly => fixed(3_600),
            Frequency::Daily => fixed(86_400),
            Frequency::Weekly => fixed(604_800),
            Frequency::Monthly => months_after(start, steps),
            Frequency::Yearly => months_after(start, steps.checked_mul(12)?),
        }
    }
}

fn months_after(start: Instant, months: i64) -> Option<Instant> {
    let months = i32::try_from(months).ok()?;
    let shifted = add_months(start, months);
    // `add_months` saturates; a saturated result is not a real occurrence.
    (shifted != Instant::MAX_UTC).then_some(shifted)
}

/// Expands `rule` from the first occurrence `first`, keeping at most `limit`
/// occurrences.
///
/// The first occurrence is always included, even when `limit` is `0` or the
/// rule's own bounds would exclude it. Expansion stops deterministically at
/// the cap, so a rule producing more occurrences than `limit` yields exactly
/// the first `limit`.
#[must_use]
pub fn expand(first: &DateRange, rule: &Recurrence, limit: usize) -> Vec<DateRange> {
    let cap = limit.max(1);
    let cap = match rule.count {
        Some(count) => cap.min(usize::try_from(count.max(1)).unwrap_or(usize::MAX)),
        None => cap,
    };
    let hours = first.hours();
    let mut out = Vec::with_capacity(cap.min(DEFAULT_RECURRENCE_LIMIT));
    out.push(*first);
    let mut n: u32 = 1;
    while out.len() < cap {
        let Some(start) = rule.nth_start(first.from, n) else {
            break;
        };
        if rule.until.is_some_and(|until| start > until) {
            break;
        }
        out.push(DateRange::new(start, add_hours(start, hours)));
        n = match n.checked_add(1) {
            Some(next) => next,
            None => break,
        };
    }
    out
}
