#![forbid(unsafe_code)]

//! The operation scheduler.
//!
//! [`PaneManager`] owns every pane record, the session arena, the two
//! collaborator services, the shared backdrop and a logical clock. Public
//! operations never execute anything: they classify the request against the
//! pane's in-flight action and leave work on the ready queue. The host then
//! drives the manager in turns:
//!
//! - [`PaneManager::pump`] runs the tasks that were ready when the turn
//!   began; anything they schedule waits for the next turn.
//! - [`PaneManager::run_until_idle`] pumps until the ready queue is empty.
//! - [`PaneManager::advance`] moves the clock, fires due timers (transition
//!   ends, auto-hide) and runs until idle after each.
//!
//! Deferring every start by one turn is what lets several calls made in the
//! same turn cancel, merge or queue each other before anything observable
//! happens.
//!
//! # Invariants
//!
//! - At most one step sequence executes per pane.
//! - Every accepted callback is invoked exactly once, including when its
//!   pane is removed.
//! - Callbacks of one pane fire in session creation order.
//!
//! # Failure Modes
//!
//! - Usage errors (`UnknownPane`, `NotVisible`, `IllegalState`) are returned
//!   before any session exists; nothing is queued.
//! - Loader and renderer failures run the `onError` step and resolve the
//!   callbacks with `false`.
//! - A handler that pauses and never resumes leaves its pane busy; later
//!   requests queue or cancel behind it as usual.

mod drive;
mod jobs;
mod ops;
mod submit;
mod timers;

use std::collections::{HashMap, VecDeque};
use std::panic::{AssertUnwindSafe, catch_unwind};

use fpane_core::{ElementId, LoadError, PaneError, PaneId};
use web_time::Duration;

use crate::args::OperationArgs;
use crate::backdrop::{BACKDROP_SELECTOR, BackdropCoordinator};
use crate::collab::{ContentLoader, LoadTicket, Renderer, Stylesheet};
use crate::config::ManagerConfig;
use crate::events::{EventBus, ResumeToken};
use crate::session::{Callback, SessionArena, SessionId};
use crate::settings::PaneSettings;
use crate::state::{PaneSnapshot, PaneStateRecord, StateFlags, Wait};

use self::timers::{TimerKind, TimerWheel};

/// Work item on the ready queue.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Task {
    /// Pop the pane's next pending session and run its sequence.
    Start(PaneId),
    /// Continue the pane's active sequence.
    Drive(PaneId),
}

/// Registry, scheduler and clock for a set of panes.
pub struct PaneManager {
    config: ManagerConfig,
    renderer: Box<dyn Renderer>,
    stylesheet: Box<dyn Stylesheet>,
    loader: Box<dyn ContentLoader>,
    panes: HashMap<PaneId, PaneStateRecord>,
    sessions: SessionArena,
    ready: VecDeque<Task>,
    timers: TimerWheel,
    now: Duration,
    bus: EventBus,
    backdrop: BackdropCoordinator,
    /// Loader tickets in flight, with the sequence that asked.
    pending_loads: HashMap<LoadTicket, (PaneId, u64)>,
    generation: u64,
}

impl std::fmt::Debug for PaneManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaneManager")
            .field("panes", &self.panes.len())
            .field("sessions", &self.sessions.len())
            .field("ready", &self.ready.len())
            .field("timers", &self.timers.len())
            .field("now", &self.now)
            .field("backdrop", &self.backdrop.phase())
            .finish()
    }
}

impl PaneManager {
    /// Create a manager and register the panes declared in `config`.
    pub fn new(
        config: ManagerConfig,
        renderer: impl Renderer + 'static,
        stylesheet: impl Stylesheet + 'static,
        loader: impl ContentLoader + 'static,
    ) -> Result<Self, PaneError> {
        let backdrop = BackdropCoordinator::new(config.backdrop.to_backdrop_config());
        let declared = config.panes.clone();
        let mut manager = Self {
            config,
            renderer: Box::new(renderer),
            stylesheet: Box::new(stylesheet),
            loader: Box::new(loader),
            panes: HashMap::new(),
            sessions: SessionArena::new(),
            ready: VecDeque::new(),
            timers: TimerWheel::default(),
            now: Duration::ZERO,
            bus: EventBus::new(),
            backdrop,
            pending_loads: HashMap::new(),
            generation: 0,
        };
        for decl in declared {
            manager.register(decl.id.as_str(), decl.settings)?;
        }
        Ok(manager)
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    // --- Registry -----------------------------------------------------------

    /// Register a pane.
    pub fn register(
        &mut self,
        id: impl TryInto<PaneId, Error = PaneError>,
        settings: PaneSettings,
    ) -> Result<PaneId, PaneError> {
        let id = id.try_into()?;
        if self.panes.contains_key(&id) {
            return Err(PaneError::DuplicatePane(id));
        }
        tracing::debug!(target: "fpane.scheduler", pane = %id, "pane registered");
        self.panes
            .insert(id.clone(), PaneStateRecord::new(id.clone(), settings));
        Ok(id)
    }

    /// Remove a pane, tearing down its element and backdrop reservation.
    ///
    /// Callbacks still waiting on the pane resolve with `false`.
    pub fn remove(&mut self, id: impl TryInto<PaneId, Error = PaneError>) -> Result<(), PaneError> {
        let id = id.try_into()?;
        let mut record = self
            .panes
            .remove(&id)
            .ok_or_else(|| PaneError::UnknownPane(id.clone()))?;

        if let Some(el) = record.element.take() {
            let selector = self.renderer.selector(el);
            self.stylesheet
                .remove_rules(&self.config.stylesheet, &selector);
            self.renderer.remove(el);
        }
        if self.backdrop.is_owner(&id) {
            self.backdrop.release_now(&id);
            self.sync_backdrop();
        }
        self.pending_loads.retain(|_, (pane, _)| pane != &id);

        let mut orphans: Vec<SessionId> = record
            .callback_stacks
            .into_values()
            .flatten()
            .collect();
        orphans.sort_by_key(|sid| self.sessions.get(*sid).map_or(u64::MAX, |s| s.ordinal));
        let callbacks: Vec<Callback> = orphans
            .into_iter()
            .filter_map(|sid| self.sessions.remove(sid))
            .filter_map(|s| s.callback)
            .collect();
        tracing::info!(
            target: "fpane.scheduler",
            pane = %id,
            dropped_callbacks = callbacks.len(),
            "pane removed"
        );
        for callback in callbacks {
            invoke(&id, callback, false);
        }
        Ok(())
    }

    pub fn contains(&self, id: &PaneId) -> bool {
        self.panes.contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn pane_ids(&self) -> Vec<PaneId> {
        let mut ids: Vec<PaneId> = self.panes.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Read-only view of a pane.
    pub fn pane(&self, id: impl TryInto<PaneId, Error = PaneError>) -> Result<PaneSnapshot, PaneError> {
        let id = id.try_into()?;
        self.record(&id).map(PaneStateRecord::snapshot)
    }

    pub fn settings(&self, id: &PaneId) -> Result<&PaneSettings, PaneError> {
        self.record(id).map(|r| &r.settings)
    }

    /// Replace a pane's settings. Takes effect for sequences that start later.
    pub fn set_settings(&mut self, id: &PaneId, settings: PaneSettings) -> Result<(), PaneError> {
        self.record_mut(id)?.settings = settings;
        Ok(())
    }

    /// Supply the pane's element directly instead of through the loader.
    ///
    /// The element is attached by the next load (or show) like fetched
    /// content would be. It can be set once per load cycle; unload resets it.
    pub fn set_element(&mut self, id: &PaneId, element: ElementId) -> Result<(), PaneError> {
        let record = self.record_mut(id)?;
        if record.element.is_some() || matches!(record.content, Some(Ok(_))) {
            return Err(PaneError::ElementAlreadySet(id.clone()));
        }
        record.content = Some(Ok(vec![element]));
        tracing::debug!(target: "fpane.scheduler", pane = %id, %element, "element supplied");
        Ok(())
    }

    // --- Events -------------------------------------------------------------

    /// The manager-wide bus. Its handlers run after each pane's own.
    pub fn events(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// A pane's own bus.
    pub fn pane_events(&mut self, id: &PaneId) -> Result<&mut EventBus, PaneError> {
        self.record_mut(id).map(|r| &mut r.bus)
    }

    /// Continue a sequence paused by a handler.
    ///
    /// Returns `Ok(false)` if the token is stale (the sequence finished or
    /// was replaced) or the sequence is not paused.
    pub fn resume(&mut self, token: &ResumeToken) -> Result<bool, PaneError> {
        let record = self.record_mut(&token.pane)?;
        if record.generation != token.generation {
            return Ok(false);
        }
        let resumed = record
            .sequence
            .as_mut()
            .is_some_and(|sequence| sequence.resume());
        if resumed {
            tracing::debug!(target: "fpane.sequence", pane = %token.pane, "sequence resumed");
            self.arm_drive(&token.pane);
        }
        Ok(resumed)
    }

    /// Deliver the outcome of a deferred load.
    ///
    /// Returns `false` when the ticket is unknown or its sequence no longer
    /// waits for it; delivered elements are then removed from the document.
    pub fn resolve_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<ElementId>, LoadError>,
    ) -> bool {
        let waiting = self.pending_loads.remove(&ticket).and_then(|(pane, generation)| {
            self.panes
                .get(&pane)
                .filter(|r| r.generation == generation && r.wait == Some(Wait::Content(ticket)))
                .map(|_| pane)
        });

        let Some(pane) = waiting else {
            tracing::debug!(target: "fpane.scheduler", ticket = ticket.0, "stale load discarded");
            if let Ok(elements) = result {
                for el in elements {
                    self.renderer.remove(el);
                }
            }
            return false;
        };

        if let Some(record) = self.panes.get_mut(&pane) {
            record.content = Some(result);
            record.wait = None;
            record.ticket = None;
        }
        self.arm_drive(&pane);
        true
    }

    // --- Backdrop -----------------------------------------------------------

    pub fn backdrop(&self) -> &BackdropCoordinator {
        &self.backdrop
    }

    /// Write the backdrop's depth and opacity, or drop its rules when hidden.
    fn sync_backdrop(&mut self) {
        let sheet = &self.config.stylesheet;
        match self.backdrop.z_index() {
            Some(z) if self.backdrop.phase().is_visible() => {
                let rules = vec![
                    ("z-index".to_owned(), z.to_string()),
                    ("opacity".to_owned(), format!("{:.3}", self.backdrop.opacity())),
                ];
                self.stylesheet.set_rules(sheet, BACKDROP_SELECTOR, &rules);
            }
            _ => self.stylesheet.remove_rules(sheet, BACKDROP_SELECTOR),
        }
    }

    // --- Turns and clock ----------------------------------------------------

    /// Logical time elapsed through [`advance`](Self::advance).
    pub fn now(&self) -> Duration {
        self.now
    }

    /// No task is ready to run. Timers may still be pending.
    pub fn is_idle(&self) -> bool {
        self.ready.is_empty()
    }

    /// Run one turn. Returns the number of tasks executed.
    pub fn pump(&mut self) -> usize {
        let batch: Vec<Task> = self.ready.drain(..).collect();
        for task in &batch {
            match task {
                Task::Start(id) => self.start(id),
                Task::Drive(id) => {
                    if let Some(record) = self.panes.get_mut(id) {
                        record.drive_armed = false;
                        self.drive(id);
                    }
                }
            }
        }
        batch.len()
    }

    /// Pump until no task is ready. Returns the number of turns run.
    pub fn run_until_idle(&mut self) -> usize {
        let mut turns = 0;
        while !self.ready.is_empty() {
            if turns >= self.config.max_turns {
                tracing::warn!(
                    target: "fpane.scheduler",
                    turns,
                    ready = self.ready.len(),
                    "turn limit reached with work still ready"
                );
                break;
            }
            self.pump();
            turns += 1;
        }
        turns
    }

    /// Move the clock forward by `delta`, firing timers in deadline order.
    ///
    /// Runs until idle before the first timer and after each deadline.
    pub fn advance(&mut self, delta: Duration) -> usize {
        let target = self.now.saturating_add(delta);
        let mut turns = self.run_until_idle();
        while let Some(deadline) = self.timers.next_deadline(target) {
            self.tick_to(deadline);
            for timer in self.timers.take_due(deadline) {
                self.fire(timer);
            }
            turns += self.run_until_idle();
        }
        self.tick_to(target);
        turns + self.run_until_idle()
    }

    fn tick_to(&mut self, instant: Duration) {
        let delta = instant.saturating_sub(self.now);
        self.now = instant;
        if self.backdrop.phase().is_animating() {
            self.backdrop.tick(delta);
            self.sync_backdrop();
        }
    }

    fn fire(&mut self, timer: TimerKind) {
        match timer {
            TimerKind::TransitionDone { pane, generation } => {
                let Some(record) = self.panes.get_mut(&pane) else {
                    return;
                };
                if record.generation == generation && record.wait == Some(Wait::Transition) {
                    record.wait = None;
                    self.arm_drive(&pane);
                }
            }
            TimerKind::AutoHide { pane, epoch } => {
                let due = self.panes.get(&pane).is_some_and(|r| {
                    r.visibility_epoch == epoch && r.flags.contains(StateFlags::VISIBLE)
                });
                if due {
                    tracing::debug!(target: "fpane.scheduler", pane = %pane, "auto-hide elapsed");
                    if let Err(err) = self.submit(&pane, OperationArgs::Hide, None) {
                        tracing::warn!(target: "fpane.scheduler", pane = %pane, error = %err, "auto-hide refused");
                    }
                }
            }
        }
    }

    // --- Internals ----------------------------------------------------------

    fn record(&self, id: &PaneId) -> Result<&PaneStateRecord, PaneError> {
        self.panes
            .get(id)
            .ok_or_else(|| PaneError::UnknownPane(id.clone()))
    }

    fn record_mut(&mut self, id: &PaneId) -> Result<&mut PaneStateRecord, PaneError> {
        self.panes
            .get_mut(id)
            .ok_or_else(|| PaneError::UnknownPane(id.clone()))
    }

    fn arm_start(&mut self, id: &PaneId) {
        if let Some(record) = self.panes.get_mut(id) {
            if !record.start_armed {
                record.start_armed = true;
                self.ready.push_back(Task::Start(id.clone()));
            }
        }
    }

    fn arm_drive(&mut self, id: &PaneId) {
        if let Some(record) = self.panes.get_mut(id) {
            if !record.drive_armed {
                record.drive_armed = true;
                self.ready.push_back(Task::Drive(id.clone()));
            }
        }
    }
}

/// Run a caller's completion callback, containing panics.
fn invoke(pane: &PaneId, callback: Callback, success: bool) {
    if catch_unwind(AssertUnwindSafe(|| callback(success))).is_err() {
        tracing::warn!(target: "fpane.scheduler", pane = %pane, success, "completion callback panicked");
    }
}
