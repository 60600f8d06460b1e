// SPDX-License-Identifier: Apache-2.0
//! Overflow correction: clip, shift, and flip.
//!
//! # Invariants
//!
//! - Clip output is contained in the clip bounds, or `None` when the input
//!   lies entirely outside them.
//! - Shift and flip never change width or height; only the clip fallback does.
//! - Each flip/realign recursion sets one bit of [`FlipState`] and never
//!   repeats a bit, so at most three recursions happen before the
//!   unconditional clip.

#![forbid(unsafe_code)]

use bitflags::bitflags;
use fpane_core::{Axis, Bounds};

use crate::relative::RelativePlacement;

/// Class added when the horizontal edges were truncated.
pub const CLASS_CLIPPED_X: &str = "clipped-x";
/// Class added when the vertical edges were truncated.
pub const CLASS_CLIPPED_Y: &str = "clipped-y";
/// Scrollable-overflow class for a horizontally clipped pane.
pub const CLASS_SCROLL_X: &str = "scroll-x";
/// Scrollable-overflow class for a vertically clipped pane.
pub const CLASS_SCROLL_Y: &str = "scroll-y";

bitflags! {
    /// Escalation steps already taken while correcting a relative placement.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FlipState: u8 {
        const FLIPPED_X = 0b001;
        const FLIPPED_Y = 0b010;
        const REALIGNED = 0b100;
    }
}

impl FlipState {
    /// The flip bit for an axis.
    pub const fn flipped(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::FLIPPED_X,
            Axis::Y => Self::FLIPPED_Y,
        }
    }
}

/// Result of a correction pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Corrected {
    pub bounds: Bounds,
    pub classes: Vec<String>,
    pub flips: FlipState,
}

/// Truncate each out-of-bound edge to `clip`.
///
/// Returns `None` if nothing of `rect` remains inside `clip`.
pub(crate) fn clip_to_bounds(rect: Bounds, clip: &Bounds, scroll: bool) -> Option<Corrected> {
    let mut out = rect;
    let mut clipped_x = false;
    let mut clipped_y = false;

    if out.left < clip.left {
        out.left = clip.left;
        clipped_x = true;
    }
    if out.right > clip.right {
        out.right = clip.right;
        clipped_x = true;
    }
    if out.top < clip.top {
        out.top = clip.top;
        clipped_y = true;
    }
    if out.bottom > clip.bottom {
        out.bottom = clip.bottom;
        clipped_y = true;
    }

    if out.left > out.right || out.top > out.bottom {
        return None;
    }

    let mut classes = Vec::new();
    if clipped_x {
        classes.push(CLASS_CLIPPED_X.to_owned());
        if scroll {
            classes.push(CLASS_SCROLL_X.to_owned());
        }
    }
    if clipped_y {
        classes.push(CLASS_CLIPPED_Y.to_owned());
        if scroll {
            classes.push(CLASS_SCROLL_Y.to_owned());
        }
    }

    Some(Corrected {
        bounds: out,
        classes,
        flips: FlipState::empty(),
    })
}

/// Translate `rect` along `axis` until it lies within `clip`.
///
/// A rect larger than the clip span is pinned to the clip start.
pub(crate) fn shift_axis(rect: Bounds, axis: Axis, clip: &Bounds) -> Bounds {
    let delta = if rect.extent(axis) > clip.extent(axis) || rect.start(axis) < clip.start(axis) {
        clip.start(axis) - rect.start(axis)
    } else if rect.end(axis) > clip.end(axis) {
        clip.end(axis) - rect.end(axis)
    } else {
        0
    };
    rect.shift(axis, delta)
}

/// Shift into bounds; relative panes flip, then realign, then clip.
pub(crate) fn shift_to_bounds(
    rect: Bounds,
    clip: &Bounds,
    relative: Option<&RelativePlacement>,
    scroll: bool,
) -> Option<Corrected> {
    shift_inner(rect, clip, relative, scroll, FlipState::empty())
}

fn shift_inner(
    rect: Bounds,
    clip: &Bounds,
    relative: Option<&RelativePlacement>,
    scroll: bool,
    state: FlipState,
) -> Option<Corrected> {
    let mut result = rect;
    for axis in [Axis::X, Axis::Y] {
        if result.fits_within(axis, clip) {
            continue;
        }
        let shifted = shift_axis(result, axis, clip);
        if let Some(placement) = relative {
            if placement.is_adjacent(axis) && shifted.overlaps(&placement.reference) {
                return escalate(rect, clip, placement, axis, scroll, state);
            }
        }
        result = shifted;
    }

    Some(Corrected {
        bounds: result,
        classes: Vec::new(),
        flips: state,
    })
}

fn escalate(
    rect: Bounds,
    clip: &Bounds,
    placement: &RelativePlacement,
    axis: Axis,
    scroll: bool,
    state: FlipState,
) -> Option<Corrected> {
    let flip = FlipState::flipped(axis);
    let (next, step) = if !state.contains(flip) {
        (placement.flipped(axis), flip)
    } else if !state.contains(FlipState::REALIGNED) {
        (placement.realigned(clip), FlipState::REALIGNED)
    } else {
        tracing::trace!(
            target: "fpane.position",
            flips = state.bits(),
            "flip escalation exhausted; clipping"
        );
        return clip_to_bounds(rect, clip, scroll).map(|mut c| {
            c.flips = state;
            c
        });
    };

    tracing::trace!(
        target: "fpane.position",
        ?axis,
        step = step.bits(),
        orientation = %next.orientation,
        "flipping relative placement"
    );
    shift_inner(next.place(), clip, Some(&next), scroll, state | step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fpane_core::{Orientation, RelativeAlign, Size};

    fn viewport() -> Bounds {
        Bounds::new(0, 0, 600, 800)
    }

    #[test]
    fn clip_truncates_and_tags() {
        let c = clip_to_bounds(Bounds::new(-10, 700, 50, 900), &viewport(), false).unwrap();
        assert_eq!(c.bounds, Bounds::new(0, 700, 50, 800));
        assert_eq!(c.classes, vec!["clipped-x", "clipped-y"]);
    }

    #[test]
    fn clip_adds_scroll_classes() {
        let c = clip_to_bounds(Bounds::new(0, 700, 50, 900), &viewport(), true).unwrap();
        assert_eq!(c.classes, vec!["clipped-x", "scroll-x"]);
    }

    #[test]
    fn clip_outside_is_none() {
        assert!(clip_to_bounds(Bounds::new(700, 0, 750, 10), &viewport(), false).is_none());
    }

    #[test]
    fn shift_axis_moves_back_inside() {
        let b = shift_axis(Bounds::new(0, 750, 10, 850), Axis::X, &viewport());
        assert_eq!(b, Bounds::new(0, 700, 10, 800));
        let b = shift_axis(Bounds::new(-5, 0, 5, 10), Axis::Y, &viewport());
        assert_eq!(b.top, 0);
    }

    #[test]
    fn oversized_pins_to_start() {
        let b = shift_axis(Bounds::new(0, -100, 10, 900), Axis::X, &viewport());
        assert_eq!(b.left, 0);
        assert_eq!(b.width(), 1000);
    }

    #[test]
    fn dropdown_near_bottom_flips_up() {
        let placement = RelativePlacement {
            reference: Bounds::new(560, 100, 580, 200),
            size: Size::new(100, 80),
            orientation: Orientation::default(),
            align: RelativeAlign::Left,
        };
        let c = shift_to_bounds(placement.place(), &viewport(), Some(&placement), false).unwrap();
        assert_eq!(c.bounds, Bounds::new(480, 100, 560, 200));
        assert_eq!(c.flips, FlipState::FLIPPED_Y);
    }

    #[test]
    fn cross_axis_overflow_just_shifts() {
        let placement = RelativePlacement {
            reference: Bounds::new(100, 760, 120, 790),
            size: Size::new(100, 80),
            orientation: Orientation::default(),
            align: RelativeAlign::Left,
        };
        let c = shift_to_bounds(placement.place(), &viewport(), Some(&placement), false).unwrap();
        assert_eq!(c.bounds.right, 800);
        assert_eq!(c.bounds.top, 120);
        assert!(c.flips.is_empty());
    }

    #[test]
    fn no_room_anywhere_falls_back_to_clip() {
        let placement = RelativePlacement {
            reference: Bounds::new(10, 10, 590, 790),
            size: Size::new(200, 200),
            orientation: Orientation::default(),
            align: RelativeAlign::None,
        };
        let c = shift_to_bounds(placement.place(), &viewport(), Some(&placement), false).unwrap();
        assert!(viewport().contains(&c.bounds));
        assert!(c.flips.contains(FlipState::REALIGNED));
    }
}
