#![forbid(unsafe_code)]

//! Core vocabulary for FloatPane.
//!
//! # Role in FloatPane
//! `fpane-core` holds the value types every other crate speaks: page-space
//! geometry, alignment and orientation enums, pane/element identifiers and
//! the error taxonomy. Nothing here has state or talks to a renderer.
//!
//! # How it fits in the system
//! `fpane-position` computes [`Bounds`] from these primitives, and
//! `fpane-runtime` threads [`PaneId`]s and [`PaneError`]s through the
//! operation scheduler.

pub mod align;
pub mod error;
pub mod geometry;
pub mod id;

pub use align::{Align, AxisAlign, HSide, Orientation, RelativeAlign, VSide};
pub use error::{LoadError, PaneError, ParseAlignError};
pub use geometry::{Axis, Bounds, Point, Sides, Size};
pub use id::{ElementId, PaneId};
