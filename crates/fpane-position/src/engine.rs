#![forbid(unsafe_code)]

//! `calculate`: raw placement followed by overflow correction.

use fpane_core::{Bounds, Point, Size};

use crate::anchor::place_anchored;
use crate::args::{OverflowMode, PositionArgs};
use crate::mode::PositionMode;
use crate::overflow::{FlipState, clip_to_bounds, shift_to_bounds};
use crate::relative::RelativePlacement;

/// Class tagging a pane inserted into document flow.
pub const CLASS_INLINE: &str = "fpane-inline";
/// Class tagging a fullscreen pane.
pub const CLASS_FULLSCREEN: &str = "fullscreen";

/// A resolved on-screen rectangle plus the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Position {
    pub mode: PositionMode,
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
    pub z_index: i32,
    /// Presentation classes to apply alongside the rectangle.
    pub class_names: Vec<String>,
    /// Flip/realign steps taken to reach this rectangle.
    pub flips: FlipState,
}

impl Position {
    /// The rectangle as [`Bounds`].
    pub const fn bounds(&self) -> Bounds {
        Bounds::new(self.top, self.left, self.bottom, self.right)
    }

    pub const fn size(&self) -> Size {
        self.bounds().size()
    }

    /// Same position moved by an offset.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        let b = self.bounds().translate(dx, dy);
        Self {
            top: b.top,
            left: b.left,
            bottom: b.bottom,
            right: b.right,
            ..self.clone()
        }
    }

    /// Same origin with a new size.
    pub fn resized(&self, size: Size) -> Self {
        let b = self.bounds().with_size(size);
        Self {
            bottom: b.bottom,
            right: b.right,
            ..self.clone()
        }
    }

    fn from_bounds(mode: PositionMode, bounds: Bounds, z_index: i32) -> Self {
        Self {
            mode,
            top: bounds.top,
            left: bounds.left,
            bottom: bounds.bottom,
            right: bounds.right,
            z_index,
            class_names: Vec::new(),
            flips: FlipState::empty(),
        }
    }
}

/// Compute the placement for `mode`.
///
/// `current` is the pane's measured bounds; it supplies the size for every
/// strategy and the rectangle itself for class and insert placements.
///
/// Returns `None` when the request is geometrically meaningless: the relative
/// reference is not rendered, anchor mode has no connected anchor, or the
/// final rectangle lies entirely outside the clip area.
pub fn calculate(mode: PositionMode, args: &PositionArgs, current: Bounds) -> Option<Position> {
    let _span = tracing::debug_span!(
        "position.calculate",
        mode = %mode,
        overflow = ?args.overflow,
    )
    .entered();

    let clip = args.effective_clip();
    let size = current.size();
    let mut relative = None;

    let raw = match mode {
        PositionMode::Class => {
            let mut position = Position::from_bounds(mode, current, args.z_index);
            position.class_names = args.class_names.clone();
            return Some(position);
        }
        PositionMode::Insert => {
            let mut position = Position::from_bounds(mode, current, args.z_index);
            position.class_names.push(CLASS_INLINE.to_owned());
            return Some(position);
        }
        PositionMode::Fullscreen => {
            let mut position = Position::from_bounds(mode, clip, args.z_index);
            position.class_names.push(CLASS_FULLSCREEN.to_owned());
            return Some(position);
        }
        PositionMode::Absolute => Bounds::from_origin(args.absolute, size),
        PositionMode::Relative => {
            let reference = args.relative.as_ref()?.reference()?;
            let placement = RelativePlacement {
                reference,
                size,
                orientation: args.orientation,
                align: args.relative_align,
            };
            relative = Some(placement);
            placement.place()
        }
        PositionMode::Anchor => {
            place_anchored(&args.anchors, size, current, args.align_x, args.align_y)?
        }
        PositionMode::Center => {
            let origin = Point::new(
                clip.left + (clip.width() - size.width) / 2,
                clip.top + (clip.height() - size.height) / 2,
            );
            Bounds::from_origin(origin, size)
        }
        PositionMode::None => Bounds::from_origin(clip.origin(), size),
    };

    let raw = raw.translate(args.offset.x, args.offset.y);
    if let Some(placement) = relative.as_mut() {
        placement.reference = placement.reference.translate(args.offset.x, args.offset.y);
    }

    let corrected = match args.overflow {
        OverflowMode::Overflow => {
            if is_outside(&raw, &clip) {
                return None;
            }
            let mut position = Position::from_bounds(mode, raw, args.z_index);
            position.class_names = Vec::new();
            return Some(position);
        }
        OverflowMode::Clip => clip_to_bounds(raw, &clip, args.scroll_on_clip)?,
        OverflowMode::Shift => shift_to_bounds(raw, &clip, relative.as_ref(), args.scroll_on_clip)?,
    };

    if is_outside(&corrected.bounds, &clip) {
        tracing::debug!(target: "fpane.position", "placement lies outside clip bounds");
        return None;
    }

    let mut position = Position::from_bounds(mode, corrected.bounds, args.z_index);
    position.class_names = corrected.classes;
    position.flips = corrected.flips;
    Some(position)
}

/// Resolve the strategy from `args` and calculate.
pub fn calculate_auto(args: &PositionArgs, current: Bounds) -> Option<Position> {
    calculate(PositionMode::resolve(args), args, current)
}

fn is_outside(rect: &Bounds, clip: &Bounds) -> bool {
    rect.left >= clip.right
        || rect.right <= clip.left
        || rect.top >= clip.bottom
        || rect.bottom <= clip.top
}
