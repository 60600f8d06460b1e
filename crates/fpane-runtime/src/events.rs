#![forbid(unsafe_code)]

//! Lifecycle events and listener buses.
//!
//! Every pane owns a local bus; the manager owns a global one. For each event
//! the local bus fires first. Handler failures never abort a sequence: an
//! `Err` or a panic is logged at `warn` and the next handler runs.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use fpane_core::{ElementId, LoadError, PaneId};
use fpane_position::Position;
use thiserror::Error;

use crate::state::{Action, StateFlags};

/// Named lifecycle events, in the order a full show/hide cycle fires them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LifecycleEvent {
    Load,
    Loaded,
    Initialize,
    Show,
    Position,
    Shown,
    Hide,
    Hidden,
    Unload,
    Unloaded,
    Move,
    Moved,
    Resize,
    Resized,
    Error,
}

impl LifecycleEvent {
    /// Handler-facing name (`onShown`).
    pub const fn handler_name(self) -> &'static str {
        match self {
            Self::Load => "onLoad",
            Self::Loaded => "onLoaded",
            Self::Initialize => "onInitialize",
            Self::Show => "onShow",
            Self::Position => "onPosition",
            Self::Shown => "onShown",
            Self::Hide => "onHide",
            Self::Hidden => "onHidden",
            Self::Unload => "onUnload",
            Self::Unloaded => "onUnloaded",
            Self::Move => "onMove",
            Self::Moved => "onMoved",
            Self::Resize => "onResize",
            Self::Resized => "onResized",
            Self::Error => "onError",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.handler_name())
    }
}

/// Which bus an event is being delivered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Local,
    Global,
}

/// Failure reported by an event handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl From<&str> for HandlerError {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for HandlerError {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Token that reopens a sequence paused by a handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResumeToken {
    pub(crate) pane: PaneId,
    pub(crate) generation: u64,
}

impl ResumeToken {
    pub fn pane(&self) -> &PaneId {
        &self.pane
    }
}

/// What a handler sees, and the two requests it can make.
#[derive(Debug)]
pub struct EventContext<'a> {
    pane: &'a PaneId,
    event: LifecycleEvent,
    scope: Scope,
    action: Action,
    flags: StateFlags,
    element: Option<ElementId>,
    position: Option<&'a Position>,
    error: Option<&'a LoadError>,
    generation: u64,
    pause: Option<ResumeToken>,
    cancel: bool,
}

impl<'a> EventContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        pane: &'a PaneId,
        event: LifecycleEvent,
        scope: Scope,
        action: Action,
        flags: StateFlags,
        element: Option<ElementId>,
        position: Option<&'a Position>,
        error: Option<&'a LoadError>,
        generation: u64,
    ) -> Self {
        Self {
            pane,
            event,
            scope,
            action,
            flags,
            element,
            position,
            error,
            generation,
            pause: None,
            cancel: false,
        }
    }

    pub fn pane(&self) -> &PaneId {
        self.pane
    }

    pub fn event(&self) -> LifecycleEvent {
        self.event
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Action of the sequence delivering this event.
    pub fn action(&self) -> Action {
        self.action
    }

    pub fn flags(&self) -> StateFlags {
        self.flags
    }

    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    /// Last calculated placement.
    pub fn position(&self) -> Option<&Position> {
        self.position
    }

    /// Collaborator failure, set for [`LifecycleEvent::Error`].
    pub fn error(&self) -> Option<&LoadError> {
        self.error
    }

    /// Suspend the sequence after this step.
    ///
    /// Hand the token to [`PaneManager::resume`](crate::PaneManager::resume)
    /// to continue. Calling this twice returns the same token.
    pub fn pause(&mut self) -> ResumeToken {
        self.pause
            .get_or_insert_with(|| ResumeToken {
                pane: self.pane.clone(),
                generation: self.generation,
            })
            .clone()
    }

    /// Skip the rest of the sequence; callbacks still drain.
    pub fn cancel(&mut self) {
        self.cancel = true;
    }

    pub(crate) fn pause_requested(&self) -> bool {
        self.pause.is_some()
    }

    pub(crate) fn cancel_requested(&self) -> bool {
        self.cancel
    }
}

/// Boxed lifecycle handler.
pub type Handler = Box<dyn FnMut(&mut EventContext<'_>) -> Result<(), HandlerError>>;

/// Identifies a registered listener for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Listener {
    id: ListenerId,
    /// `None` listens to every event.
    event: Option<LifecycleEvent>,
    handler: Handler,
}

/// Ordered listener list for one scope.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen to one event.
    pub fn on<F>(&mut self, event: LifecycleEvent, handler: F) -> ListenerId
    where
        F: FnMut(&mut EventContext<'_>) -> Result<(), HandlerError> + 'static,
    {
        self.insert(Some(event), Box::new(handler))
    }

    /// Listen to every event.
    pub fn on_any<F>(&mut self, handler: F) -> ListenerId
    where
        F: FnMut(&mut EventContext<'_>) -> Result<(), HandlerError> + 'static,
    {
        self.insert(None, Box::new(handler))
    }

    fn insert(&mut self, event: Option<LifecycleEvent>, handler: Handler) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push(Listener { id, event, handler });
        id
    }

    /// Remove a listener. Returns `false` if it was not registered here.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver `ctx` to every matching listener, in registration order.
    ///
    /// Returns the number of handlers invoked.
    pub fn emit(&mut self, ctx: &mut EventContext<'_>) -> usize {
        let mut invoked = 0;
        for listener in &mut self.listeners {
            if listener.event.is_some_and(|e| e != ctx.event) {
                continue;
            }
            invoked += 1;
            match catch_unwind(AssertUnwindSafe(|| (listener.handler)(ctx))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(
                        target: "fpane.events",
                        pane = %ctx.pane,
                        event = %ctx.event,
                        scope = ?ctx.scope,
                        error = %err,
                        "event handler failed"
                    );
                }
                Err(payload) => {
                    tracing::warn!(
                        target: "fpane.events",
                        pane = %ctx.pane,
                        event = %ctx.event,
                        scope = ?ctx.scope,
                        panic = panic_message(payload.as_ref()),
                        "event handler panicked"
                    );
                }
            }
        }
        invoked
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ctx(pane: &PaneId, event: LifecycleEvent) -> EventContext<'_> {
        EventContext::new(
            pane,
            event,
            Scope::Local,
            Action::Show,
            StateFlags::empty(),
            None,
            None,
            None,
            7,
        )
    }

    #[test]
    fn filters_by_event() {
        let pane = PaneId::new("p").unwrap();
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let h = hits.clone();
        bus.on(LifecycleEvent::Shown, move |c| {
            h.borrow_mut().push(c.event());
            Ok(())
        });
        let h = hits.clone();
        bus.on_any(move |c| {
            h.borrow_mut().push(c.event());
            Ok(())
        });

        assert_eq!(bus.emit(&mut ctx(&pane, LifecycleEvent::Show)), 1);
        assert_eq!(bus.emit(&mut ctx(&pane, LifecycleEvent::Shown)), 2);
        assert_eq!(
            *hits.borrow(),
            vec![LifecycleEvent::Show, LifecycleEvent::Shown, LifecycleEvent::Shown]
        );
    }

    #[test]
    fn errors_and_panics_do_not_stop_delivery() {
        let pane = PaneId::new("p").unwrap();
        let reached = Rc::new(RefCell::new(false));
        let mut bus = EventBus::new();
        bus.on_any(|_| Err("boom".into()));
        bus.on_any(|_| panic!("handler exploded"));
        let r = reached.clone();
        bus.on_any(move |_| {
            *r.borrow_mut() = true;
            Ok(())
        });
        assert_eq!(bus.emit(&mut ctx(&pane, LifecycleEvent::Load)), 3);
        assert!(*reached.borrow());
    }

    #[test]
    fn off_removes_listener() {
        let mut bus = EventBus::new();
        let id = bus.on_any(|_| Ok(()));
        assert_eq!(bus.len(), 1);
        assert!(bus.off(id));
        assert!(!bus.off(id));
        assert!(bus.is_empty());
    }

    #[test]
    fn pause_token_is_stable() {
        let pane = PaneId::new("p").unwrap();
        let mut c = ctx(&pane, LifecycleEvent::Show);
        let a = c.pause();
        let b = c.pause();
        assert_eq!(a, b);
        assert_eq!(a.generation, 7);
        assert!(c.pause_requested());
        c.cancel();
        assert!(c.cancel_requested());
    }
}
