#![forbid(unsafe_code)]

//! Anchored placement.
//!
//! Up to four anchor elements bound the pane: a top anchor puts the pane's
//! top on the anchor's bottom edge, a bottom anchor puts the pane's bottom on
//! the anchor's top edge, and likewise for left/right. The presence mask
//! selects one of 16 cases, which factor into an independent solve per axis:
//!
//! | anchors on the axis | solved span                                     |
//! |---------------------|-------------------------------------------------|
//! | both                | stretch between the two anchors                 |
//! | one                 | butt against it, keep the element's extent      |
//! | none                | align against the other axis' anchors (`Align`) |
//!
//! Mask `0` has no solution and yields `None`.

use fpane_core::{Align, AxisAlign, Bounds, Size};

use crate::args::{AnchorMask, AnchorSet};

/// Solve the pane rectangle for the connected anchors in `anchors`.
///
/// `current` supplies the coordinate kept by [`Align::None`].
pub(crate) fn place_anchored(
    anchors: &AnchorSet,
    size: Size,
    current: Bounds,
    align_x: Align,
    align_y: Align,
) -> Option<Bounds> {
    let mask = anchors.mask();
    if mask.is_empty() {
        return None;
    }

    let top = anchors.connected(AnchorMask::TOP);
    let bottom = anchors.connected(AnchorMask::BOTTOM);
    let left = anchors.connected(AnchorMask::LEFT);
    let right = anchors.connected(AnchorMask::RIGHT);

    let (y0, y1) = match (top, bottom) {
        (Some(t), Some(b)) => (t.bottom, b.top.max(t.bottom)),
        (Some(t), None) => (t.bottom, t.bottom + size.height),
        (None, Some(b)) => (b.top - size.height, b.top),
        (None, None) => {
            // At least one of left/right is present here.
            let reference = union_of(left, right)?;
            align_span(
                align_y.normalized(),
                reference.top,
                reference.bottom,
                size.height,
                current.top,
            )
        }
    };

    let (x0, x1) = match (left, right) {
        (Some(l), Some(r)) => (l.right, r.left.max(l.right)),
        (Some(l), None) => (l.right, l.right + size.width),
        (None, Some(r)) => (r.left - size.width, r.left),
        (None, None) => {
            let reference = union_of(top, bottom)?;
            align_span(
                align_x.normalized(),
                reference.left,
                reference.right,
                size.width,
                current.left,
            )
        }
    };

    tracing::trace!(
        target: "fpane.position",
        mask = mask.bits(),
        top = y0,
        left = x0,
        "anchored placement solved"
    );

    Some(Bounds::new(y0, x0, y1, x1))
}

fn union_of(a: Option<Bounds>, b: Option<Bounds>) -> Option<Bounds> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(&b)),
        (Some(a), None) | (None, Some(a)) => Some(a),
        (None, None) => None,
    }
}

/// Place a span of `extent` against the reference span `[start, end)`.
fn align_span(align: AxisAlign, start: i32, end: i32, extent: i32, current: i32) -> (i32, i32) {
    match align {
        AxisAlign::Start => (start, start + extent),
        AxisAlign::End => (end - extent, end),
        AxisAlign::Center => {
            let s = start + (end - start - extent) / 2;
            (s, s + extent)
        }
        AxisAlign::Elastic => (start, end.max(start)),
        AxisAlign::None => (current, current + extent),
    }
}
