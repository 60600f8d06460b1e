#![forbid(unsafe_code)]

//! Alignment and orientation vocabulary shared by the position engine.
//!
//! Values arrive from settings as strings (`"left"`, `"xcenter"`, ...), so
//! every enum here parses case-insensitively via [`FromStr`].

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseAlignError;
use crate::geometry::Axis;

/// Alignment of an unconstrained axis against a reference span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Align {
    /// Leave the axis where it currently is.
    #[default]
    None,
    /// Stretch to cover the reference span.
    Elastic,
    Left,
    Right,
    Center,
    Top,
    Bottom,
}

/// Axis-independent form of [`Align`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisAlign {
    None,
    Elastic,
    Start,
    End,
    Center,
}

impl Align {
    /// Fold side-specific values into start/end.
    ///
    /// `Left`/`Top` are the start of either axis and `Right`/`Bottom` the end,
    /// so an alignment written for the wrong axis still resolves sensibly.
    pub const fn normalized(self) -> AxisAlign {
        match self {
            Self::None => AxisAlign::None,
            Self::Elastic => AxisAlign::Elastic,
            Self::Left | Self::Top => AxisAlign::Start,
            Self::Right | Self::Bottom => AxisAlign::End,
            Self::Center => AxisAlign::Center,
        }
    }

    /// Resolve an alignment string for a specific axis.
    ///
    /// Rejects values that name the other axis (`"top"` for X, `"left"` for Y).
    pub fn resolve(value: &str, axis: Axis) -> Result<Self, ParseAlignError> {
        let align: Self = value.parse()?;
        let fits = match (align, axis) {
            (Self::Top | Self::Bottom, Axis::X) | (Self::Left | Self::Right, Axis::Y) => false,
            _ => true,
        };
        if fits {
            Ok(align)
        } else {
            Err(ParseAlignError::WrongAxis {
                value: value.to_owned(),
                axis,
            })
        }
    }
}

impl FromStr for Align {
    type Err = ParseAlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "elastic" | "stretch" => Ok(Self::Elastic),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "center" | "centre" => Ok(Self::Center),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            _ => Err(ParseAlignError::Unknown(s.to_owned())),
        }
    }
}

/// Cross-axis alignment used by relative placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RelativeAlign {
    #[default]
    None,
    Left,
    Right,
    XCenter,
    Top,
    Bottom,
    YCenter,
}

impl RelativeAlign {
    /// The axis this alignment acts on, if any.
    pub const fn axis(self) -> Option<Axis> {
        match self {
            Self::Left | Self::Right | Self::XCenter => Some(Axis::X),
            Self::Top | Self::Bottom | Self::YCenter => Some(Axis::Y),
            Self::None => None,
        }
    }
}

impl FromStr for RelativeAlign {
    type Err = ParseAlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "xcenter" => Ok(Self::XCenter),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "ycenter" => Ok(Self::YCenter),
            _ => Err(ParseAlignError::Unknown(s.to_owned())),
        }
    }
}

/// Horizontal side of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HSide {
    Left,
    #[default]
    Right,
}

/// Vertical side of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VSide {
    Top,
    #[default]
    Bottom,
}

/// Which quadrant around the reference a relatively placed pane opens into.
///
/// Defaults to bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Orientation {
    pub x: HSide,
    pub y: VSide,
}

impl Orientation {
    pub const fn new(x: HSide, y: VSide) -> Self {
        Self { x, y }
    }

    /// Reflect the orientation across the reference on one axis.
    pub const fn flipped(self, axis: Axis) -> Self {
        match axis {
            Axis::X => Self {
                x: match self.x {
                    HSide::Left => HSide::Right,
                    HSide::Right => HSide::Left,
                },
                y: self.y,
            },
            Axis::Y => Self {
                x: self.x,
                y: match self.y {
                    VSide::Top => VSide::Bottom,
                    VSide::Bottom => VSide::Top,
                },
            },
        }
    }
}

impl FromStr for Orientation {
    type Err = ParseAlignError;

    /// Parses `"bottom-right"`, `"top left"`, `"left,bottom"` and similar.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut orientation = Self::default();
        for part in s
            .split(|c: char| c == '-' || c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
        {
            match part.to_ascii_lowercase().as_str() {
                "left" => orientation.x = HSide::Left,
                "right" => orientation.x = HSide::Right,
                "top" => orientation.y = VSide::Top,
                "bottom" => orientation.y = VSide::Bottom,
                _ => return Err(ParseAlignError::Unknown(s.to_owned())),
            }
        }
        Ok(orientation)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let y = match self.y {
            VSide::Top => "top",
            VSide::Bottom => "bottom",
        };
        let x = match self.x {
            HSide::Left => "left",
            HSide::Right => "right",
        };
        write!(f, "{y}-{x}")
    }
}
