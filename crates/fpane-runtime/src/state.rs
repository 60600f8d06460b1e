#![forbid(unsafe_code)]

//! Per-pane lifecycle state.
//!
//! # Invariants
//!
//! - Flags only change inside a running step sequence (or through
//!   [`PaneManager::set_element`](crate::PaneManager::set_element)).
//! - `current_action` is `None` exactly when no session is driving or armed
//!   to drive the pane.
//! - At most one step sequence exists per record.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use bitflags::bitflags;
use fpane_core::{ElementId, LoadError, PaneId};
use fpane_position::Position;

use crate::args::{LoadArgs, ResizeParams, ShowArgs};
use crate::collab::LoadTicket;
use crate::events::EventBus;
use crate::plan::Step;
use crate::sequence::StepSequence;
use crate::session::SessionId;
use crate::settings::PaneSettings;

bitflags! {
    /// Lifecycle flags of a pane.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateFlags: u8 {
        const INITIALIZED = 0b0001;
        const LOADED      = 0b0010;
        const VISIBLE     = 0b0100;
        const POSITIONED  = 0b1000;
    }
}

/// A lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Action {
    #[default]
    None,
    Show,
    Hide,
    Load,
    Unload,
    Move,
    Resize,
}

impl Action {
    /// The inverse lifecycle action, if any.
    pub const fn opposite(self) -> Option<Self> {
        match self {
            Self::Show => Some(Self::Hide),
            Self::Hide => Some(Self::Show),
            Self::Load => Some(Self::Unload),
            Self::Unload => Some(Self::Load),
            Self::None | Self::Move | Self::Resize => None,
        }
    }

    /// Move or resize.
    pub const fn is_geometry(self) -> bool {
        matches!(self, Self::Move | Self::Resize)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "idle",
            Self::Show => "show",
            Self::Hide => "hide",
            Self::Load => "load",
            Self::Unload => "unload",
            Self::Move => "move",
            Self::Resize => "resize",
        }
    }

    /// Present participle used in error messages ("showing").
    pub const fn progressive(self) -> &'static str {
        match self {
            Self::None => "idle",
            Self::Show => "showing",
            Self::Hide => "hiding",
            Self::Load => "loading",
            Self::Unload => "unloading",
            Self::Move => "moving",
            Self::Resize => "resizing",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a sequence is not advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wait {
    /// Remote content has not arrived.
    Content(LoadTicket),
    /// A timed show/hide transition is running.
    Transition,
}

/// Mutable record of one registered pane.
pub(crate) struct PaneStateRecord {
    pub id: PaneId,
    pub settings: PaneSettings,
    pub flags: StateFlags,
    pub element: Option<ElementId>,
    pub current_action: Action,
    /// Session that represents `current_action`; may still be waiting to start.
    pub head: Option<SessionId>,
    /// Session whose sequence is running.
    pub current_operation: Option<SessionId>,
    /// Callers waiting on each primary session, keyed by its action.
    pub callback_stacks: BTreeMap<(Action, SessionId), Vec<SessionId>>,
    /// Primary sessions waiting to start, in start order.
    pub pending: VecDeque<SessionId>,
    pub last_show_args: Option<ShowArgs>,
    pub last_load_args: Option<LoadArgs>,
    pub last_position: Option<Position>,
    /// Recorded when a resize sequence starts; the resize job applies it.
    pub last_resize_args: Option<ResizeParams>,
    pub sequence: Option<StepSequence<Step>>,
    /// Identifies the active sequence; timers and loads carry it.
    pub generation: u64,
    pub wait: Option<Wait>,
    /// Outstanding loader ticket of the active sequence.
    pub ticket: Option<LoadTicket>,
    /// Content delivered (by the loader or `set_element`) but not yet attached.
    pub content: Option<Result<Vec<ElementId>, LoadError>>,
    /// Failure carried to the `onError` step.
    pub error: Option<LoadError>,
    /// The reveal job of the active sequence made the pane visible.
    pub revealed_now: bool,
    pub start_armed: bool,
    pub drive_armed: bool,
    pub z_index: Option<i32>,
    pub owns_backdrop: bool,
    /// Classes applied by the last placement.
    pub position_classes: Vec<String>,
    /// Bumped by every show/hide/unload submission.
    pub visibility_epoch: u64,
    pub bus: EventBus,
}

impl PaneStateRecord {
    pub fn new(id: PaneId, settings: PaneSettings) -> Self {
        Self {
            id,
            settings,
            flags: StateFlags::empty(),
            element: None,
            current_action: Action::None,
            head: None,
            current_operation: None,
            callback_stacks: BTreeMap::new(),
            pending: VecDeque::new(),
            last_show_args: None,
            last_load_args: None,
            last_position: None,
            last_resize_args: None,
            sequence: None,
            generation: 0,
            wait: None,
            ticket: None,
            content: None,
            error: None,
            revealed_now: false,
            start_armed: false,
            drive_armed: false,
            z_index: None,
            owns_backdrop: false,
            position_classes: Vec::new(),
            visibility_epoch: 0,
            bus: EventBus::new(),
        }
    }

    pub fn snapshot(&self) -> PaneSnapshot {
        PaneSnapshot {
            id: self.id.clone(),
            flags: self.flags,
            element: self.element,
            current_action: self.current_action,
            position: self.last_position.clone(),
            z_index: self.z_index,
            pending: self.pending.len(),
        }
    }
}

/// Read-only view of a pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneSnapshot {
    pub id: PaneId,
    pub flags: StateFlags,
    pub element: Option<ElementId>,
    pub current_action: Action,
    pub position: Option<Position>,
    pub z_index: Option<i32>,
    /// Sessions waiting behind the current one.
    pub pending: usize,
}

impl PaneSnapshot {
    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.flags.contains(StateFlags::LOADED)
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.flags.contains(StateFlags::VISIBLE)
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.flags.contains(StateFlags::INITIALIZED)
    }

    #[inline]
    pub fn is_positioned(&self) -> bool {
        self.flags.contains(StateFlags::POSITIONED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposites_pair_up() {
        assert_eq!(Action::Show.opposite(), Some(Action::Hide));
        assert_eq!(Action::Hide.opposite(), Some(Action::Show));
        assert_eq!(Action::Load.opposite(), Some(Action::Unload));
        assert_eq!(Action::Unload.opposite(), Some(Action::Load));
        assert_eq!(Action::Move.opposite(), None);
        assert_eq!(Action::None.opposite(), None);
    }

    #[test]
    fn fresh_record_has_no_work() {
        let id = PaneId::new("menu").unwrap();
        let record = PaneStateRecord::new(id, PaneSettings::default());
        assert!(record.current_operation.is_none() && record.head.is_none());
        let snap = record.snapshot();
        assert_eq!(snap.pending, 0);
        assert!(!snap.is_loaded());
        assert!(!snap.is_visible());
        assert_eq!(snap.current_action, Action::None);
    }
}
