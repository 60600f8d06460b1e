#![forbid(unsafe_code)]

//! Decide what a new request does to the pane's in-flight action.

use crate::state::{Action, StateFlags};

/// Outcome of classifying a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Nothing in flight: start a new sequence.
    Run,
    /// Cancel the in-flight sequence; the request starts once it settles.
    CancelAndReplace,
    /// The in-flight sequence extends into this action.
    Continue,
    /// Already covered by the in-flight action; only the callback is kept.
    Duplicate,
    /// Run after the in-flight sequence completes.
    Queue,
}

/// Classify `requested` against `current`.
///
/// `continues_to_show` is true when the in-flight load already extends into
/// a show.
pub fn classify(
    current: Action,
    requested: Action,
    reload: bool,
    continues_to_show: bool,
) -> Classification {
    use Action as A;
    use Classification as C;

    if current == A::None {
        return C::Run;
    }
    if reload && requested == A::Load {
        return C::CancelAndReplace;
    }

    match (current, requested) {
        (A::Show, A::Load) | (A::Load, A::Load) => C::Duplicate,
        (A::Show, A::Show) | (A::Hide, A::Hide) | (A::Unload, A::Unload) => C::Duplicate,
        (A::Unload, A::Hide) => C::Duplicate,

        (A::Load, A::Show) => C::Continue,
        (A::Hide, A::Unload) => C::Continue,

        (A::Load, A::Hide) if continues_to_show => C::CancelAndReplace,
        (A::Load, A::Hide) => C::Queue,

        (A::Show, A::Hide)
        | (A::Hide, A::Show)
        | (A::Load, A::Unload)
        | (A::Show, A::Unload)
        | (A::Unload, A::Load)
        | (A::Unload, A::Show) => C::CancelAndReplace,

        (A::Move | A::Resize, A::Hide | A::Unload) => C::CancelAndReplace,

        _ => C::Queue,
    }
}

/// Why a move/resize request is refused before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryRefusal {
    /// A hide or unload is in flight.
    IllegalState(Action),
    /// The pane is neither visible nor being shown.
    NotVisible,
}

/// Usage check for move/resize.
///
/// `showing` is true when a show is in flight or armed (including a load
/// that continues into a show).
pub fn check_geometry(
    current: Action,
    flags: StateFlags,
    showing: bool,
) -> Result<(), GeometryRefusal> {
    if matches!(current, Action::Hide | Action::Unload) {
        return Err(GeometryRefusal::IllegalState(current));
    }
    if !flags.contains(StateFlags::VISIBLE) && !showing {
        return Err(GeometryRefusal::NotVisible);
    }
    Ok(())
}
