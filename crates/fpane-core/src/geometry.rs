#![forbid(unsafe_code)]

//! Geometric primitives in page coordinates.
//!
//! All coordinates are `i32` with the origin at the top-left of the page.
//! `right` and `bottom` are exclusive, so a bounds of width zero has
//! `left == right`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal (left/right).
    X,
    /// Vertical (top/bottom).
    Y,
}

impl Axis {
    /// The other axis.
    #[inline]
    pub const fn cross(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// A point in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are zero.
    #[inline]
    pub const fn is_origin(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Extent along the given axis.
    #[inline]
    pub const fn along(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }
}

/// An axis-aligned rectangle described by its four edges.
///
/// This is the shape the renderer reports from `measure` and the shape the
/// position engine produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    /// Top edge (inclusive).
    pub top: i32,
    /// Left edge (inclusive).
    pub left: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
    /// Right edge (exclusive).
    pub right: i32,
}

impl Bounds {
    /// Create bounds from explicit edges.
    #[inline]
    pub const fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Create bounds from an origin and a size.
    #[inline]
    pub const fn from_origin(origin: Point, size: Size) -> Self {
        Self {
            top: origin.y,
            left: origin.x,
            bottom: origin.y + size.height,
            right: origin.x + size.width,
        }
    }

    /// Zero-sized bounds at a point.
    #[inline]
    pub const fn at_point(point: Point) -> Self {
        Self::from_origin(point, Size::new(0, 0))
    }

    #[inline]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Check if the bounds have zero (or negative) area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Whether edges are ordered (`top <= bottom`, `left <= right`).
    #[inline]
    pub const fn is_well_formed(&self) -> bool {
        self.top <= self.bottom && self.left <= self.right
    }

    /// Check if a point is inside the bounds.
    #[inline]
    pub const fn contains_point(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// Check if `other` lies entirely inside these bounds.
    #[inline]
    pub const fn contains(&self, other: &Bounds) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// Interior overlap test.
    ///
    /// Touching edges do not overlap. A zero-sized `other` overlaps when it
    /// sits strictly inside these bounds.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        let x = self.left.max(other.left) < self.right.min(other.right)
            || (other.width() == 0 && other.left > self.left && other.left < self.right);
        let y = self.top.max(other.top) < self.bottom.min(other.bottom)
            || (other.height() == 0 && other.top > self.top && other.top < self.bottom);
        x && y
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection(&self, other: &Bounds) -> Option<Bounds> {
        let top = self.top.max(other.top);
        let left = self.left.max(other.left);
        let bottom = self.bottom.min(other.bottom);
        let right = self.right.min(other.right);

        if left < right && top < bottom {
            Some(Bounds::new(top, left, bottom, right))
        } else {
            None
        }
    }

    /// The smallest bounds that contains both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            self.top.min(other.top),
            self.left.min(other.left),
            self.bottom.max(other.bottom),
            self.right.max(other.right),
        )
    }

    /// Move the bounds by an offset, preserving size.
    #[inline]
    pub const fn translate(&self, dx: i32, dy: i32) -> Bounds {
        Bounds::new(
            self.top + dy,
            self.left + dx,
            self.bottom + dy,
            self.right + dx,
        )
    }

    /// Keep the origin and replace the size.
    #[inline]
    pub const fn with_size(&self, size: Size) -> Bounds {
        Bounds::from_origin(self.origin(), size)
    }

    /// Integer center point.
    #[inline]
    pub const fn center(&self) -> Point {
        Point::new(
            self.left + self.width() / 2,
            self.top + self.height() / 2,
        )
    }

    /// Leading edge along an axis (`left` for X, `top` for Y).
    #[inline]
    pub const fn start(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.left,
            Axis::Y => self.top,
        }
    }

    /// Trailing edge along an axis (`right` for X, `bottom` for Y).
    #[inline]
    pub const fn end(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.right,
            Axis::Y => self.bottom,
        }
    }

    /// Extent along an axis.
    #[inline]
    pub const fn extent(&self, axis: Axis) -> i32 {
        self.end(axis) - self.start(axis)
    }

    /// Replace both edges along an axis.
    #[inline]
    pub const fn with_span(&self, axis: Axis, start: i32, end: i32) -> Bounds {
        match axis {
            Axis::X => Bounds::new(self.top, start, self.bottom, end),
            Axis::Y => Bounds::new(start, self.left, end, self.right),
        }
    }

    /// Translate along a single axis.
    #[inline]
    pub const fn shift(&self, axis: Axis, delta: i32) -> Bounds {
        match axis {
            Axis::X => self.translate(delta, 0),
            Axis::Y => self.translate(0, delta),
        }
    }

    /// Whether the span along `axis` lies within `outer`'s span on that axis.
    #[inline]
    pub const fn fits_within(&self, axis: Axis, outer: &Bounds) -> bool {
        self.start(axis) >= outer.start(axis) && self.end(axis) <= outer.end(axis)
    }

    /// Shrink the bounds by the given margin, never inverting the edges.
    pub fn inset(&self, margin: Sides) -> Bounds {
        let left = self.left + margin.left;
        let top = self.top + margin.top;
        let right = (self.right - margin.right).max(left);
        let bottom = (self.bottom - margin.bottom).max(top);
        Bounds::new(top, left, bottom, right)
    }
}

/// Sides for padding/margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sides {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Sides {
    /// Create new sides with equal values.
    pub const fn all(val: i32) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new sides with specific values.
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

impl From<i32> for Sides {
    fn from(val: i32) -> Self {
        Self::all(val)
    }
}

impl From<(i32, i32)> for Sides {
    fn from((vertical, horizontal): (i32, i32)) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}
