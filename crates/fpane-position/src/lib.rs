#![forbid(unsafe_code)]

//! Position engine for FloatPane.
//!
//! # Role in FloatPane
//! Turns fully measured [`PositionArgs`] into an on-screen [`Position`]. The
//! engine is a pure function: the runtime measures every element it needs
//! and hands the numbers over, so nothing here touches a renderer.
//!
//! # Pipeline
//! 1. [`PositionMode::resolve`] picks the strategy (class, absolute,
//!    relative, anchor, insert, fullscreen, center, none).
//! 2. The strategy produces a raw rectangle, then `offset` nudges it.
//! 3. [`OverflowMode`] corrects it against the clip bounds (minus `margin`):
//!    clip, shift (with flip escalation for relative panes) or nothing.
//!
//! # Failure Modes
//! - A detached relative element or an anchor set with no connected anchor
//!   yields `None`.
//! - A rectangle entirely outside the clip bounds yields `None`.

mod anchor;
pub mod args;
mod engine;
pub mod mode;
pub mod overflow;
mod relative;

pub use args::{Anchor, AnchorMask, AnchorSet, OverflowMode, PositionArgs, RelativeTarget};
pub use engine::{CLASS_FULLSCREEN, CLASS_INLINE, Position, calculate, calculate_auto};
pub use mode::PositionMode;
pub use overflow::{
    CLASS_CLIPPED_X, CLASS_CLIPPED_Y, CLASS_SCROLL_X, CLASS_SCROLL_Y, FlipState,
};
