// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use chrono::{TimeDelta, TimeZone, Utc};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_event_tree::{
    DateRange, Event, EventTree, Frequency, Group, Instant, Node, Path, RangeResolver, Recurrence,
};
use understory_timeline::{CollapseSet, LayoutIndex, Timeline, TimelineConfig, Viewport};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn gen_range_usize(&mut self, upper_exclusive: usize) -> usize {
        if upper_exclusive == 0 {
            return 0;
        }
        (self.next_u32() as usize) % upper_exclusive
    }
}

fn epoch() -> Instant {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn event(rng: &mut Lcg) -> Node {
    let start = epoch() + TimeDelta::hours(rng.gen_range_usize(24 * 365 * 4) as i64);
    let range = DateRange::new(start, start + TimeDelta::hours(rng.gen_range_usize(240) as i64));
    let event = Event::new(range);
    if rng.gen_range_usize(10) == 0 {
        event.with_recurrence(Recurrence::new(Frequency::Weekly, 1).with_count(52)).into()
    } else {
        event.into()
    }
}

/// `groups` groups of `per_group` events each, a tenth of them recurring.
fn build_tree(groups: usize, per_group: usize, seed: u64) -> EventTree {
    let mut rng = Lcg::new(seed);
    EventTree::new(
        (0..groups)
            .map(|g| {
                let children = (0..per_group).map(|_| event(&mut rng)).collect();
                Group::new(format!("group {g}"), children).into()
            })
            .collect(),
    )
}

fn bench_timeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("timeline");

    for (groups, per_group) in [(100_usize, 100_usize), (1_000, 50)] {
        let tree = build_tree(groups, per_group, 0x7153_0000_0000_0001);
        let flat = tree.flatten();

        group.bench_function(format!("layout_build(groups={groups},per={per_group})"), |b| {
            let collapse = CollapseSet::new();
            b.iter(|| black_box(LayoutIndex::build(&flat, &collapse)));
        });

        group.bench_function(
            format!("layout_build_half_collapsed(groups={groups},per={per_group})"),
            |b| {
                let mut collapse = CollapseSet::new();
                for g in (0..groups).step_by(2) {
                    collapse.collapse(Path::from([g]));
                }
                b.iter(|| black_box(LayoutIndex::build(&flat, &collapse)));
            },
        );

        group.bench_function(format!("resolve_cold(groups={groups},per={per_group})"), |b| {
            b.iter_batched(
                || RangeResolver::new(groups * per_group, 100),
                |mut ranges| {
                    ranges.sync(1);
                    black_box(ranges.root_range(&tree));
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(format!("scroll_visible(groups={groups},per={per_group})"), |b| {
            let mut timeline = Timeline::new(TimelineConfig::default(), epoch());
            timeline.set_tree(tree.clone());
            timeline.set_viewport(Viewport::new(1_200.0, 800.0));
            timeline.initial_view();
            let left = timeline.viewport().left;
            let mut top = 0.0;
            b.iter(|| {
                top = (top + 30.0) % 100_000.0;
                timeline.scroll_to(Point::new(left, top));
                black_box(timeline.visible().events.len());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_timeline);
criterion_main!(benches);
