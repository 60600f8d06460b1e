#![forbid(unsafe_code)]

//! Placement strategy selection.

use std::fmt;

use crate::args::PositionArgs;

/// The strategy that produced a [`Position`](crate::Position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PositionMode {
    /// Placement is owned by explicit position classes.
    Class,
    /// Fixed top-left coordinates.
    Absolute,
    /// Next to a reference point or element.
    Relative,
    /// Bounded by anchor elements.
    Anchor,
    /// Inserted into document flow.
    Insert,
    /// Covers the clip area.
    Fullscreen,
    /// Centered in the clip area.
    Center,
    /// Top-left of the clip area.
    #[default]
    None,
}

impl PositionMode {
    /// Pick the first applicable strategy, in priority order.
    ///
    /// class names > absolute (non-zero) > relative > anchors (≥1 connected)
    /// > insert > fullscreen > center > none.
    pub fn resolve(args: &PositionArgs) -> Self {
        if !args.class_names.is_empty() {
            Self::Class
        } else if !args.absolute.is_origin() {
            Self::Absolute
        } else if args.relative.is_some() {
            Self::Relative
        } else if args.anchors.any_connected() {
            Self::Anchor
        } else if args.insert {
            Self::Insert
        } else if args.fullscreen {
            Self::Fullscreen
        } else if args.center {
            Self::Center
        } else {
            Self::None
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Absolute => "absolute",
            Self::Relative => "relative",
            Self::Anchor => "anchor",
            Self::Insert => "insert",
            Self::Fullscreen => "fullscreen",
            Self::Center => "center",
            Self::None => "none",
        }
    }
}

impl fmt::Display for PositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
