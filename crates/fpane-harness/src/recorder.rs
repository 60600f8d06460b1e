#![forbid(unsafe_code)]

//! Recorders for lifecycle events and completion callbacks.

use std::cell::RefCell;
use std::rc::Rc;

use fpane_core::{PaneError, PaneId};
use fpane_runtime::{EventBus, LifecycleEvent, PaneManager, Scope};

/// One delivered event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub pane: PaneId,
    pub event: LifecycleEvent,
    pub scope: Scope,
}

/// Records every event delivered on the buses it is attached to.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    log: Rc<RefCell<Vec<Delivery>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen on `bus` for every event.
    pub fn attach(&self, bus: &mut EventBus) {
        let log = Rc::clone(&self.log);
        bus.on_any(move |ctx| {
            log.borrow_mut().push(Delivery {
                pane: ctx.pane().clone(),
                event: ctx.event(),
                scope: ctx.scope(),
            });
            Ok(())
        });
    }

    /// Listen on the manager's global bus.
    pub fn attach_global(&self, manager: &mut PaneManager) {
        self.attach(manager.events());
    }

    /// Listen on one pane's local bus.
    pub fn attach_local(&self, manager: &mut PaneManager, pane: &PaneId) -> Result<(), PaneError> {
        self.attach(manager.pane_events(pane)?);
        Ok(())
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.log.borrow().clone()
    }

    /// Events delivered for `pane` on `scope`, in order.
    pub fn events(&self, pane: &PaneId, scope: Scope) -> Vec<LifecycleEvent> {
        self.log
            .borrow()
            .iter()
            .filter(|d| &d.pane == pane && d.scope == scope)
            .map(|d| d.event)
            .collect()
    }

    /// How often `event` was delivered for `pane` on any bus.
    pub fn count(&self, pane: &PaneId, event: LifecycleEvent) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|d| &d.pane == pane && d.event == event)
            .count()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

/// Records completion callbacks as `(label, success)` in invocation order.
#[derive(Debug, Clone, Default)]
pub struct CallbackLog {
    entries: Rc<RefCell<Vec<(String, bool)>>>,
}

impl CallbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that appends `(label, success)` when invoked.
    pub fn callback(&self, label: impl Into<String>) -> impl FnOnce(bool) + 'static {
        let entries = Rc::clone(&self.entries);
        let label = label.into();
        move |success| entries.borrow_mut().push((label, success))
    }

    pub fn entries(&self) -> Vec<(String, bool)> {
        self.entries.borrow().clone()
    }

    /// Labels in invocation order.
    pub fn labels(&self) -> Vec<String> {
        self.entries.borrow().iter().map(|(l, _)| l.clone()).collect()
    }

    /// The result recorded for `label`, if it was invoked.
    pub fn result(&self, label: &str) -> Option<bool> {
        self.entries
            .borrow()
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, ok)| *ok)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_log_keeps_invocation_order() {
        let log = CallbackLog::new();
        let a = log.callback("a");
        let b = log.callback("b");
        b(false);
        a(true);
        assert_eq!(log.labels(), vec!["b", "a"]);
        assert_eq!(log.result("a"), Some(true));
        assert_eq!(log.result("b"), Some(false));
        assert_eq!(log.result("c"), None);
    }
}
