//! Benchmarks for the position engine.
//!
//! Run with: cargo bench -p fpane-position

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fpane_core::{Align, Bounds, Orientation, Point, RelativeAlign, Size};
use fpane_position::{
    Anchor, AnchorSet, OverflowMode, PositionArgs, PositionMode, RelativeTarget, calculate,
    calculate_auto,
};
use std::hint::black_box;

const VIEWPORT: Bounds = Bounds::new(0, 0, 1080, 1920);

fn measured(w: i32, h: i32) -> Bounds {
    Bounds::from_origin(Point::default(), Size::new(w, h))
}

fn bench_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("position/modes");
    let current = measured(320, 240);

    let cases: Vec<(&str, PositionArgs)> = vec![
        ("none", PositionArgs::within(VIEWPORT)),
        (
            "center",
            PositionArgs {
                center: true,
                ..PositionArgs::within(VIEWPORT)
            },
        ),
        (
            "absolute",
            PositionArgs {
                absolute: Point::new(1800, 1000),
                ..PositionArgs::within(VIEWPORT)
            },
        ),
        (
            "relative",
            PositionArgs {
                relative: Some(RelativeTarget::Element(Some(Bounds::new(400, 600, 420, 700)))),
                relative_align: RelativeAlign::Left,
                ..PositionArgs::within(VIEWPORT)
            },
        ),
        (
            "anchor",
            PositionArgs {
                anchors: AnchorSet {
                    top: Some(Anchor::new(Bounds::new(40, 0, 80, 1920))),
                    left: Some(Anchor::new(Bounds::new(80, 0, 1080, 240))),
                    ..AnchorSet::default()
                },
                align_x: Align::Center,
                ..PositionArgs::within(VIEWPORT)
            },
        ),
    ];

    for (name, args) in &cases {
        group.bench_with_input(BenchmarkId::new("auto", name), args, |b, args| {
            b.iter(|| black_box(calculate_auto(black_box(args), current)))
        });
    }

    group.finish();
}

fn bench_flip_escalation(c: &mut Criterion) {
    let mut group = c.benchmark_group("position/flip");
    let current = measured(400, 300);

    // Reference hugging each corner forces one or two flips.
    let corners = [
        ("bottom_right", Bounds::new(1040, 1860, 1070, 1910)),
        ("top_left", Bounds::new(10, 10, 40, 60)),
        ("crowded", Bounds::new(20, 20, 1060, 1900)),
    ];

    for (name, reference) in corners {
        let args = PositionArgs {
            relative: Some(RelativeTarget::Element(Some(reference))),
            orientation: Orientation::default(),
            ..PositionArgs::within(VIEWPORT)
        };
        group.bench_with_input(BenchmarkId::new("shift", name), &args, |b, args| {
            b.iter(|| black_box(calculate(PositionMode::Relative, black_box(args), current)))
        });
    }

    let clip_args = PositionArgs {
        absolute: Point::new(1700, 900),
        overflow: OverflowMode::Clip,
        scroll_on_clip: true,
        ..PositionArgs::within(VIEWPORT)
    };
    group.bench_function("clip", |b| {
        b.iter(|| black_box(calculate(PositionMode::Absolute, black_box(&clip_args), current)))
    });

    group.finish();
}

criterion_group!(benches, bench_modes, bench_flip_escalation);
criterion_main!(benches);
