#![forbid(unsafe_code)]

//! Fully resolved inputs to the position engine.
//!
//! The runtime measures every element it needs (reference element, anchors,
//! viewport) before calling the engine, so [`PositionArgs`] is plain data and
//! the engine stays a pure function.

use bitflags::bitflags;
use fpane_core::{Align, Bounds, Orientation, Point, RelativeAlign, Sides};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How out-of-bounds placements are corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OverflowMode {
    /// Truncate out-of-bound edges.
    Clip,
    /// Translate into bounds, flipping relative panes across their reference.
    #[default]
    Shift,
    /// No correction.
    Overflow,
}

/// One anchor element bounding a side of the pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// Measured bounds of the anchor element.
    pub bounds: Bounds,
    /// Whether the element is attached to the render tree.
    pub connected: bool,
}

impl Anchor {
    /// A connected anchor.
    pub const fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            connected: true,
        }
    }

    /// An anchor whose element is not in the render tree.
    pub const fn detached(bounds: Bounds) -> Self {
        Self {
            bounds,
            connected: false,
        }
    }
}

bitflags! {
    /// Which sides carry a connected anchor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AnchorMask: u8 {
        const TOP    = 0b0001;
        const LEFT   = 0b0010;
        const BOTTOM = 0b0100;
        const RIGHT  = 0b1000;
    }
}

/// Up to four anchors, one per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnchorSet {
    pub top: Option<Anchor>,
    pub left: Option<Anchor>,
    pub bottom: Option<Anchor>,
    pub right: Option<Anchor>,
}

impl AnchorSet {
    /// Presence mask over connected anchors only.
    pub fn mask(&self) -> AnchorMask {
        let mut mask = AnchorMask::empty();
        let sides = [
            (self.top, AnchorMask::TOP),
            (self.left, AnchorMask::LEFT),
            (self.bottom, AnchorMask::BOTTOM),
            (self.right, AnchorMask::RIGHT),
        ];
        for (anchor, bit) in sides {
            if anchor.is_some_and(|a| a.connected) {
                mask |= bit;
            }
        }
        mask
    }

    /// Bounds of the anchor on a side if it is connected.
    pub(crate) fn connected(&self, side: AnchorMask) -> Option<Bounds> {
        let anchor = if side == AnchorMask::TOP {
            self.top
        } else if side == AnchorMask::LEFT {
            self.left
        } else if side == AnchorMask::BOTTOM {
            self.bottom
        } else if side == AnchorMask::RIGHT {
            self.right
        } else {
            None
        };
        anchor.filter(|a| a.connected).map(|a| a.bounds)
    }

    /// Whether at least one anchor is connected.
    pub fn any_connected(&self) -> bool {
        !self.mask().is_empty()
    }
}

/// What a relatively positioned pane is placed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeTarget {
    /// A page point (for example a pointer position).
    Point(Point),
    /// An element's measured bounds; `None` when it is not in the render tree.
    Element(Option<Bounds>),
}

impl RelativeTarget {
    /// Reference rectangle, or `None` when there is nothing to place against.
    pub fn reference(&self) -> Option<Bounds> {
        match *self {
            Self::Point(p) => Some(Bounds::at_point(p)),
            Self::Element(bounds) => bounds,
        }
    }
}

/// Resolved placement settings for one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PositionArgs {
    /// Explicit position classes; when present the stylesheet owns placement.
    pub class_names: Vec<String>,
    /// Absolute top-left (`x` = left, `y` = top). The origin means unset.
    pub absolute: Point,
    /// Reference for relative placement.
    pub relative: Option<RelativeTarget>,
    /// Quadrant the pane opens into around its reference.
    pub orientation: Orientation,
    /// Cross-axis alignment against the reference.
    pub relative_align: RelativeAlign,
    /// Anchor elements.
    pub anchors: AnchorSet,
    /// Horizontal alignment for anchored panes without left/right anchors.
    pub align_x: Align,
    /// Vertical alignment for anchored panes without top/bottom anchors.
    pub align_y: Align,
    /// The pane lives in document flow.
    pub insert: bool,
    /// Cover the whole clip area.
    pub fullscreen: bool,
    /// Center inside the clip area.
    pub center: bool,
    /// Overflow correction strategy.
    pub overflow: OverflowMode,
    /// Add scrollable-overflow classes when clipping.
    pub scroll_on_clip: bool,
    /// The area the pane must stay inside (usually the viewport).
    pub clip_bounds: Bounds,
    /// Inset applied to `clip_bounds`.
    pub margin: Sides,
    /// Nudge applied to the raw placement before correction.
    pub offset: Point,
    /// Depth assigned by the scheduler; carried through untouched.
    pub z_index: i32,
}

impl PositionArgs {
    /// Arguments with the given clip area and defaults everywhere else.
    pub fn within(clip_bounds: Bounds) -> Self {
        Self {
            clip_bounds,
            ..Self::default()
        }
    }

    /// Effective clip area after applying the margin.
    pub fn effective_clip(&self) -> Bounds {
        self.clip_bounds.inset(self.margin)
    }
}
