#![forbid(unsafe_code)]

//! Operation sessions: one per public call.
//!
//! Sessions live in a [`SessionArena`] owned by the manager and are removed
//! when the callback stack holding them drains. They are never reused.

use std::collections::HashMap;
use std::fmt;

use fpane_core::PaneId;

use crate::args::OperationArgs;
use crate::state::{Action, StateFlags};

/// Arena key of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub(crate) u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op#{}", self.0)
    }
}

/// How a session relates to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLink {
    /// Started on its own.
    Direct,
    /// Extends a prior sequence (load that continues into show).
    ContinuedFrom(SessionId),
    /// Waited for a prior sequence to finish.
    QueuedAfter(SessionId),
}

/// Completion callback; receives the success flag.
pub type Callback = Box<dyn FnOnce(bool)>;

/// Metadata of a single request.
pub struct OperationSession {
    pub id: SessionId,
    pub pane: PaneId,
    pub action: Action,
    pub args: OperationArgs,
    /// Manager-wide creation order.
    pub ordinal: u64,
    /// A handler asked this session's sequence to stop.
    pub cancel: bool,
    /// The sequence this session drives continues into another one.
    pub continued_to: Option<SessionId>,
    /// Waiting in the pane's pending queue.
    pub queued: bool,
    /// Pre-empted before it could finish.
    pub was_canceled: bool,
    /// The move/resize job took effect.
    pub applied: bool,
    pub link: SessionLink,
    pub callback: Option<Callback>,
}

impl fmt::Debug for OperationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationSession")
            .field("id", &self.id)
            .field("pane", &self.pane)
            .field("action", &self.action)
            .field("ordinal", &self.ordinal)
            .field("cancel", &self.cancel)
            .field("continued_to", &self.continued_to)
            .field("queued", &self.queued)
            .field("was_canceled", &self.was_canceled)
            .field("applied", &self.applied)
            .field("link", &self.link)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

/// Success of `action` given the flags observed when its stack drains.
///
/// `applied` is the owning primary session's job outcome and only matters
/// for move/resize.
pub fn success_for(action: Action, flags: StateFlags, applied: bool) -> bool {
    match action {
        Action::Show => flags.contains(StateFlags::VISIBLE),
        Action::Hide => !flags.contains(StateFlags::VISIBLE),
        Action::Load => flags.contains(StateFlags::LOADED),
        Action::Unload => !flags.contains(StateFlags::LOADED),
        Action::Move | Action::Resize => flags.contains(StateFlags::VISIBLE) && applied,
        Action::None => true,
    }
}

/// Owner of every live session.
#[derive(Debug, Default)]
pub struct SessionArena {
    sessions: HashMap<SessionId, OperationSession>,
    next_id: u64,
    next_ordinal: u64,
}

impl SessionArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with the next ordinal.
    pub fn create(
        &mut self,
        pane: PaneId,
        action: Action,
        args: OperationArgs,
        callback: Option<Callback>,
    ) -> SessionId {
        self.next_id += 1;
        self.next_ordinal += 1;
        let id = SessionId(self.next_id);
        self.sessions.insert(
            id,
            OperationSession {
                id,
                pane,
                action,
                args,
                ordinal: self.next_ordinal,
                cancel: false,
                continued_to: None,
                queued: false,
                was_canceled: false,
                applied: false,
                link: SessionLink::Direct,
                callback,
            },
        );
        id
    }

    pub fn get(&self, id: SessionId) -> Option<&OperationSession> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut OperationSession> {
        self.sessions.get_mut(&id)
    }

    pub fn remove(&mut self, id: SessionId) -> Option<OperationSession> {
        self.sessions.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Mark `id` canceled, then every session it continues from or into.
    pub fn mark_canceled(&mut self, id: SessionId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(session) = self.sessions.get_mut(&next) else {
                continue;
            };
            if session.was_canceled {
                continue;
            }
            session.was_canceled = true;
            if let SessionLink::ContinuedFrom(prior) = session.link {
                stack.push(prior);
            }
            if let Some(to) = session.continued_to {
                stack.push(to);
            }
        }
    }

    /// Every session `id` continues into, nearest first.
    pub fn continued_into(&self, id: SessionId) -> Vec<SessionId> {
        let mut chain = Vec::new();
        let mut cursor = self.get(id).and_then(|s| s.continued_to);
        while let Some(next) = cursor {
            if next == id || chain.contains(&next) {
                break;
            }
            chain.push(next);
            cursor = self.get(next).and_then(|s| s.continued_to);
        }
        chain
    }

    /// `id` followed by every session it continues from, deepest first.
    pub fn continuation_chain(&self, id: SessionId) -> Vec<SessionId> {
        let mut chain = vec![id];
        let mut cursor = id;
        while let Some(SessionLink::ContinuedFrom(prior)) = self.get(cursor).map(|s| s.link) {
            if chain.contains(&prior) {
                break;
            }
            chain.push(prior);
            cursor = prior;
        }
        chain
    }
}
