//! Every anchor presence mask, checked against hand-derived rectangles.
//!
//! Layout used throughout (viewport 1000x1000):
//!
//! ```text
//!            top anchor    y 100..120, x 300..500
//! left anchor                                  right anchor
//! y 300..500, x 100..150                       y 300..500, x 700..760
//!            bottom anchor y 800..820, x 320..520
//! ```
//!
//! The pane measures 80x40. Unanchored axes use `Align::Center` so the
//! expected numbers are easy to read off the diagram.

use fpane_core::{Align, Bounds, Point, Size};
use fpane_position::{
    Anchor, AnchorMask, AnchorSet, PositionArgs, PositionMode, calculate, calculate_auto,
};

const TOP: Bounds = Bounds::new(100, 300, 120, 500);
const LEFT: Bounds = Bounds::new(300, 100, 500, 150);
const BOTTOM: Bounds = Bounds::new(800, 320, 820, 520);
const RIGHT: Bounds = Bounds::new(300, 700, 500, 760);
const W: i32 = 80;
const H: i32 = 40;

fn anchors(mask: AnchorMask) -> AnchorSet {
    let pick = |bit: AnchorMask, bounds: Bounds| mask.contains(bit).then(|| Anchor::new(bounds));
    AnchorSet {
        top: pick(AnchorMask::TOP, TOP),
        left: pick(AnchorMask::LEFT, LEFT),
        bottom: pick(AnchorMask::BOTTOM, BOTTOM),
        right: pick(AnchorMask::RIGHT, RIGHT),
    }
}

fn args(mask: AnchorMask) -> PositionArgs {
    PositionArgs {
        anchors: anchors(mask),
        align_x: Align::Center,
        align_y: Align::Center,
        ..PositionArgs::within(Bounds::new(0, 0, 1000, 1000))
    }
}

fn place(mask: AnchorMask) -> Option<Bounds> {
    let current = Bounds::from_origin(Point::default(), Size::new(W, H));
    calculate(PositionMode::Anchor, &args(mask), current).map(|p| p.bounds())
}

fn centered(start: i32, end: i32, extent: i32) -> (i32, i32) {
    let s = start + (end - start - extent) / 2;
    (s, s + extent)
}

/// Expected rectangle, derived independently from the solver.
fn expected(mask: AnchorMask) -> Bounds {
    let has = |bit| mask.contains(bit);

    let (y0, y1) = match (has(AnchorMask::TOP), has(AnchorMask::BOTTOM)) {
        (true, true) => (TOP.bottom, BOTTOM.top),
        (true, false) => (TOP.bottom, TOP.bottom + H),
        (false, true) => (BOTTOM.top - H, BOTTOM.top),
        (false, false) => {
            // Only left/right anchors: both share y 300..500.
            centered(300, 500, H)
        }
    };

    let (x0, x1) = match (has(AnchorMask::LEFT), has(AnchorMask::RIGHT)) {
        (true, true) => (LEFT.right, RIGHT.left),
        (true, false) => (LEFT.right, LEFT.right + W),
        (false, true) => (RIGHT.left - W, RIGHT.left),
        (false, false) => {
            let span = match (has(AnchorMask::TOP), has(AnchorMask::BOTTOM)) {
                (true, true) => (TOP.left.min(BOTTOM.left), TOP.right.max(BOTTOM.right)),
                (true, false) => (TOP.left, TOP.right),
                _ => (BOTTOM.left, BOTTOM.right),
            };
            centered(span.0, span.1, W)
        }
    };

    Bounds::new(y0, x0, y1, x1)
}

#[test]
fn all_sixteen_masks() {
    for bits in 0u8..16 {
        let mask = AnchorMask::from_bits_truncate(bits);
        let got = place(mask);
        if mask.is_empty() {
            assert_eq!(got, None, "mask {bits:04b} has no solution");
            continue;
        }
        let got = got.unwrap_or_else(|| panic!("mask {bits:04b} produced no placement"));
        assert_eq!(got, expected(mask), "mask {bits:04b}");
        assert!(got.is_well_formed(), "mask {bits:04b} inverted: {got:?}");
    }
}

#[test]
fn single_axis_anchor_keeps_element_size() {
    for mask in [AnchorMask::TOP, AnchorMask::BOTTOM, AnchorMask::LEFT, AnchorMask::RIGHT] {
        let b = place(mask).unwrap();
        assert_eq!(b.size(), Size::new(W, H), "{mask:?}");
    }
}

#[test]
fn opposing_anchors_stretch() {
    let b = place(AnchorMask::TOP | AnchorMask::BOTTOM).unwrap();
    assert_eq!(b.height(), BOTTOM.top - TOP.bottom);
    let b = place(AnchorMask::LEFT | AnchorMask::RIGHT).unwrap();
    assert_eq!(b.width(), RIGHT.left - LEFT.right);
}

#[test]
fn detached_anchors_count_as_absent() {
    let mut a = args(AnchorMask::TOP | AnchorMask::LEFT);
    a.anchors.left = Some(Anchor::detached(LEFT));
    let current = Bounds::from_origin(Point::default(), Size::new(W, H));
    let b = calculate(PositionMode::Anchor, &a, current).unwrap().bounds();
    assert_eq!(b, expected(AnchorMask::TOP));
}

#[test]
fn auto_resolution_ignores_fully_detached_set() {
    let mut a = args(AnchorMask::empty());
    a.anchors.top = Some(Anchor::detached(TOP));
    let current = Bounds::from_origin(Point::default(), Size::new(W, H));
    let p = calculate_auto(&a, current).unwrap();
    assert_eq!(p.mode, PositionMode::None);
}

#[test]
fn top_only_left_aligned_matches_worked_example() {
    let mut a = args(AnchorMask::empty());
    a.anchors.top = Some(Anchor::new(Bounds::new(40, 25, 60, 400)));
    a.align_x = Align::Left;
    let current = Bounds::from_origin(Point::default(), Size::new(100, 30));
    let p = calculate_auto(&a, current).unwrap();
    assert_eq!(p.left, 25);
    assert_eq!(p.top, 60);
    assert_eq!(p.bottom, 90);
}

#[test]
fn edge_alignments_on_free_axis() {
    let mut a = args(AnchorMask::TOP);
    let current = Bounds::from_origin(Point::default(), Size::new(W, H));

    a.align_x = Align::Right;
    let b = calculate(PositionMode::Anchor, &a, current).unwrap().bounds();
    assert_eq!(b.right, TOP.right);

    a.align_x = Align::Elastic;
    let b = calculate(PositionMode::Anchor, &a, current).unwrap().bounds();
    assert_eq!((b.left, b.right), (TOP.left, TOP.right));

    a.align_x = Align::None;
    let moved = Bounds::from_origin(Point::new(333, 0), Size::new(W, H));
    let b = calculate(PositionMode::Anchor, &a, moved).unwrap().bounds();
    assert_eq!(b.left, 333);
}
