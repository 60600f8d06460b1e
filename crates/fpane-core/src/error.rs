#![forbid(unsafe_code)]

//! Error taxonomy.
//!
//! - [`PaneError`]: usage errors. Returned synchronously to the caller.
//! - [`LoadError`]: collaborator failures. Routed through the `onError` step
//!   and surfaced to callers only as `success = false`.
//! - [`ParseAlignError`]: bad alignment/orientation strings in settings.

use thiserror::Error;

use crate::geometry::Axis;
use crate::id::PaneId;

/// Illegal use of the pane API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaneError {
    /// Identifier is empty or contains whitespace.
    #[error("invalid pane id {0:?}")]
    InvalidId(String),
    /// No pane is registered under this id.
    #[error("no pane registered as {0}")]
    UnknownPane(PaneId),
    /// A pane with this id already exists.
    #[error("pane {0} is already registered")]
    DuplicatePane(PaneId),
    /// The action requires a visible pane.
    #[error("cannot {action} pane {pane}: it is not visible")]
    NotVisible { pane: PaneId, action: &'static str },
    /// The action conflicts with the action currently in flight.
    #[error("cannot {action} pane {pane} while it is {current}")]
    IllegalState {
        pane: PaneId,
        action: &'static str,
        current: &'static str,
    },
    /// The pane's element was already assigned in this load cycle.
    #[error("pane {0} already has an element; unload it first")]
    ElementAlreadySet(PaneId),
}

/// Failure produced by a collaborator while loading or constructing content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The loader produced no element.
    #[error("load produced no element")]
    NoContent,
    /// The loader produced more than one root element.
    #[error("load produced {0} root elements, expected exactly one")]
    MultipleElements(usize),
    /// Transport or resolution failure reported by the loader.
    #[error("fetch failed: {0}")]
    Fetch(String),
    /// The element could not be constructed or attached.
    #[error("construction failed: {0}")]
    Construct(String),
}

/// Unrecognized alignment or orientation value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAlignError {
    #[error("unknown alignment {0:?}")]
    Unknown(String),
    #[error("alignment {value:?} does not apply to the {axis:?} axis")]
    WrongAxis { value: String, axis: Axis },
}
