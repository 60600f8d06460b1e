#![forbid(unsafe_code)]

//! Scripted [`ContentLoader`].
//!
//! Each [`LoadSpec`] is routed to a sticky response: ready content, a
//! failure, or a deferred load the test resolves later through
//! [`PaneManager::resolve_load`](fpane_runtime::PaneManager::resolve_load).
//! Unrouted specs fail with [`LoadError::Fetch`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use fpane_core::{ElementId, LoadError};
use fpane_runtime::{ContentLoader, LoadPoll, LoadSpec, LoadTicket};

#[derive(Debug, Clone)]
enum Route {
    Ready(Result<Vec<ElementId>, LoadError>),
    Deferred,
}

#[derive(Debug, Default)]
struct Script {
    routes: HashMap<LoadSpec, Route>,
    requests: Vec<LoadSpec>,
    tickets: Vec<(LoadTicket, LoadSpec)>,
    next_ticket: u64,
}

/// Loader whose answers are set by the test.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLoader {
    script: Rc<RefCell<Script>>,
}

impl ScriptedLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every fetch of `spec` with `result`.
    pub fn respond(&self, spec: LoadSpec, result: Result<Vec<ElementId>, LoadError>) {
        self.script
            .borrow_mut()
            .routes
            .insert(spec, Route::Ready(result));
    }

    /// Answer every fetch of `spec` with exactly `element`.
    pub fn serve(&self, spec: LoadSpec, element: ElementId) {
        self.respond(spec, Ok(vec![element]));
    }

    /// Answer every fetch of `spec` with a fresh pending ticket.
    pub fn defer(&self, spec: LoadSpec) {
        self.script.borrow_mut().routes.insert(spec, Route::Deferred);
    }

    /// Every spec fetched so far, in order.
    pub fn requests(&self) -> Vec<LoadSpec> {
        self.script.borrow().requests.clone()
    }

    /// Tickets handed out for deferred loads, oldest first.
    pub fn tickets(&self) -> Vec<LoadTicket> {
        self.script
            .borrow()
            .tickets
            .iter()
            .map(|(ticket, _)| *ticket)
            .collect()
    }

    /// The most recent ticket, if any load was deferred.
    pub fn last_ticket(&self) -> Option<LoadTicket> {
        self.script.borrow().tickets.last().map(|(ticket, _)| *ticket)
    }
}

impl ContentLoader for ScriptedLoader {
    fn fetch(&mut self, spec: &LoadSpec) -> LoadPoll {
        let mut script = self.script.borrow_mut();
        script.requests.push(spec.clone());
        match script.routes.get(spec).cloned() {
            Some(Route::Ready(result)) => LoadPoll::Ready(result),
            Some(Route::Deferred) => {
                script.next_ticket += 1;
                let ticket = LoadTicket(script.next_ticket);
                script.tickets.push((ticket, spec.clone()));
                LoadPoll::Pending(ticket)
            }
            None => LoadPoll::Ready(Err(LoadError::Fetch(format!("no route for {spec}")))),
        }
    }
}
