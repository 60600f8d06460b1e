#![forbid(unsafe_code)]

//! Placement next to a reference point or element.

use fpane_core::{Axis, Bounds, HSide, Orientation, RelativeAlign, Size, VSide};

/// A relative placement request that can be re-solved after a flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RelativePlacement {
    pub reference: Bounds,
    pub size: Size,
    pub orientation: Orientation,
    pub align: RelativeAlign,
}

impl RelativePlacement {
    /// Raw rectangle for the current orientation and alignment.
    ///
    /// An x-alignment puts the pane above/below the reference; a y-alignment
    /// puts it left/right; no alignment uses the outside corner.
    pub fn place(&self) -> Bounds {
        let r = self.reference;
        let Size { width, height } = self.size;

        let beside_x = |side: HSide| match side {
            HSide::Right => (r.right, r.right + width),
            HSide::Left => (r.left - width, r.left),
        };
        let beside_y = |side: VSide| match side {
            VSide::Bottom => (r.bottom, r.bottom + height),
            VSide::Top => (r.top - height, r.top),
        };

        let ((x0, x1), (y0, y1)) = match self.align {
            RelativeAlign::Left => ((r.left, r.left + width), beside_y(self.orientation.y)),
            RelativeAlign::Right => ((r.right - width, r.right), beside_y(self.orientation.y)),
            RelativeAlign::XCenter => {
                let x = r.left + (r.width() - width) / 2;
                ((x, x + width), beside_y(self.orientation.y))
            }
            RelativeAlign::Top => (beside_x(self.orientation.x), (r.top, r.top + height)),
            RelativeAlign::Bottom => (beside_x(self.orientation.x), (r.bottom - height, r.bottom)),
            RelativeAlign::YCenter => {
                let y = r.top + (r.height() - height) / 2;
                (beside_x(self.orientation.x), (y, y + height))
            }
            RelativeAlign::None => (beside_x(self.orientation.x), beside_y(self.orientation.y)),
        };

        Bounds::new(y0, x0, y1, x1)
    }

    /// Whether the pane sits beside the reference along `axis`.
    ///
    /// Only on such an axis can a shift slide the pane over its reference.
    pub fn is_adjacent(&self, axis: Axis) -> bool {
        match self.align.axis() {
            Some(aligned) => aligned != axis,
            None => true,
        }
    }

    /// Same request with the orientation reflected on `axis`.
    pub fn flipped(&self, axis: Axis) -> Self {
        Self {
            orientation: self.orientation.flipped(axis),
            ..*self
        }
    }

    /// Re-target the side of the reference with the most free space in `clip`.
    ///
    /// Ties prefer bottom, then right, then top, then left.
    pub fn realigned(&self, clip: &Bounds) -> Self {
        let r = self.reference;
        let candidates = [
            (clip.bottom - r.bottom, Side::Bottom),
            (clip.right - r.right, Side::Right),
            (r.top - clip.top, Side::Top),
            (r.left - clip.left, Side::Left),
        ];
        let mut best = candidates[0];
        for candidate in &candidates[1..] {
            if candidate.0 > best.0 {
                best = *candidate;
            }
        }

        let mut next = *self;
        match best.1 {
            Side::Top | Side::Bottom => {
                next.orientation.y = if best.1 == Side::Top {
                    VSide::Top
                } else {
                    VSide::Bottom
                };
                if self.align.axis() != Some(Axis::X) {
                    next.align = match self.orientation.x {
                        HSide::Right => RelativeAlign::Left,
                        HSide::Left => RelativeAlign::Right,
                    };
                }
            }
            Side::Left | Side::Right => {
                next.orientation.x = if best.1 == Side::Left {
                    HSide::Left
                } else {
                    HSide::Right
                };
                if self.align.axis() != Some(Axis::Y) {
                    next.align = match self.orientation.y {
                        VSide::Bottom => RelativeAlign::Top,
                        VSide::Top => RelativeAlign::Bottom,
                    };
                }
            }
        }
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fpane_core::Point;

    fn button() -> Bounds {
        Bounds::new(100, 200, 120, 260)
    }

    fn placement(align: RelativeAlign) -> RelativePlacement {
        RelativePlacement {
            reference: button(),
            size: Size::new(80, 40),
            orientation: Orientation::default(),
            align,
        }
    }

    #[test]
    fn default_corner_is_bottom_right() {
        let b = placement(RelativeAlign::None).place();
        assert_eq!(b, Bounds::new(120, 260, 160, 340));
    }

    #[test]
    fn point_reference_opens_from_point() {
        let p = RelativePlacement {
            reference: Bounds::at_point(Point::new(50, 70)),
            size: Size::new(10, 10),
            orientation: Orientation::default(),
            align: RelativeAlign::None,
        };
        assert_eq!(p.place(), Bounds::new(70, 50, 80, 60));
    }

    #[test]
    fn x_alignments_sit_below() {
        assert_eq!(placement(RelativeAlign::Left).place().left, 200);
        assert_eq!(placement(RelativeAlign::Right).place().right, 260);
        let centered = placement(RelativeAlign::XCenter).place();
        assert_eq!(centered.center().x, button().center().x);
        assert_eq!(centered.top, 120);
    }

    #[test]
    fn y_alignments_sit_beside() {
        let top = placement(RelativeAlign::Top).place();
        assert_eq!((top.left, top.top), (260, 100));
        let bottom = placement(RelativeAlign::Bottom).place();
        assert_eq!(bottom.bottom, 120);
        let mid = placement(RelativeAlign::YCenter).place();
        assert_eq!(mid.center().y, button().center().y);
    }

    #[test]
    fn adjacency_follows_alignment() {
        assert!(placement(RelativeAlign::Left).is_adjacent(Axis::Y));
        assert!(!placement(RelativeAlign::Left).is_adjacent(Axis::X));
        assert!(placement(RelativeAlign::None).is_adjacent(Axis::X));
        assert!(placement(RelativeAlign::None).is_adjacent(Axis::Y));
    }

    #[test]
    fn flipped_y_opens_above() {
        let b = placement(RelativeAlign::Left).flipped(Axis::Y).place();
        assert_eq!(b.bottom, 100);
        assert_eq!(b.height(), 40);
    }

    #[test]
    fn realigned_picks_roomiest_side() {
        // Reference hugging the bottom-right corner: most room above.
        let p = RelativePlacement {
            reference: Bounds::new(900, 900, 990, 990),
            ..placement(RelativeAlign::None)
        };
        let clip = Bounds::new(0, 0, 1000, 1000);
        let next = p.realigned(&clip);
        assert_eq!(next.orientation.y, VSide::Top);
        assert_eq!(next.align, RelativeAlign::Left);
    }
}
