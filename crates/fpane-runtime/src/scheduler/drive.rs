#![forbid(unsafe_code)]

//! Starting, stepping and completing sequences.

use fpane_core::{LoadError, PaneId};

use crate::events::{EventContext, LifecycleEvent, Scope};
use crate::plan::{self, Step};
use crate::sequence::StepSequence;
use crate::session::{SessionId, success_for};
use crate::state::{Action, StateFlags};

use super::jobs::JobOutcome;
use super::submit::set_head;
use super::timers::TimerKind;
use super::{PaneManager, invoke};

impl PaneManager {
    /// Pop the pane's next pending session and run it.
    pub(super) fn start(&mut self, id: &PaneId) {
        let Some(record) = self.panes.get_mut(id) else {
            return;
        };
        record.start_armed = false;
        if record.current_operation.is_some() {
            return;
        }
        let Some(sid) = record.pending.pop_front() else {
            return;
        };
        let Some(session) = self.sessions.get_mut(sid) else {
            return;
        };
        session.queued = false;
        record.current_operation = Some(sid);

        if session.was_canceled {
            tracing::debug!(target: "fpane.scheduler", pane = %id, session = %sid, "canceled before start");
            self.complete(id, sid);
            return;
        }

        let action = session.action;
        let reload = session.args.is_reload();
        match &session.args {
            crate::args::OperationArgs::Show(args) => record.last_show_args = Some(args.clone()),
            crate::args::OperationArgs::Load(args) => record.last_load_args = Some(args.clone()),
            crate::args::OperationArgs::Resize(args) => record.last_resize_args = Some(*args),
            _ => {}
        }

        self.generation += 1;
        record.generation = self.generation;
        record.error = None;
        record.revealed_now = false;
        set_head(record, &self.sessions, Some(sid));

        let steps = plan::assemble(action, record.flags, &record.settings, reload);
        tracing::debug!(
            target: "fpane.sequence",
            pane = %id,
            session = %sid,
            %action,
            reload,
            steps = steps.len(),
            "sequence started"
        );
        record.sequence = Some(StepSequence::new(steps));
        self.drive(id);
    }

    /// Run the active sequence until it suspends, pauses or completes.
    pub(super) fn drive(&mut self, id: &PaneId) {
        let _span = tracing::debug_span!(target: "fpane.sequence", "sequence.drive", pane = %id).entered();
        loop {
            let Some(record) = self.panes.get_mut(id) else {
                return;
            };
            if record.wait.is_some() {
                return;
            }
            let Some(op) = record.current_operation else {
                return;
            };
            let Some(step) = record.sequence.as_mut().and_then(StepSequence::next) else {
                return;
            };
            tracing::trace!(target: "fpane.sequence", pane = %id, ?step, "step");

            match step {
                Step::Local(event) => self.emit(id, event, Scope::Local),
                Step::Global(event) => self.emit(id, event, Scope::Global),
                Step::Job(job) => match self.run_job(id, op, job) {
                    JobOutcome::Done => {}
                    JobOutcome::Suspend(wait) => {
                        if let Some(record) = self.panes.get_mut(id) {
                            record.wait = Some(wait);
                        }
                        tracing::debug!(target: "fpane.sequence", pane = %id, ?wait, "sequence suspended");
                        return;
                    }
                    JobOutcome::Failed(err) => self.fail(id, job, err),
                },
                Step::Complete => {
                    self.complete(id, op);
                    return;
                }
            }
        }
    }

    /// Deliver `event` on one bus and apply the handlers' requests.
    fn emit(&mut self, id: &PaneId, event: LifecycleEvent, scope: Scope) {
        let Some(record) = self.panes.get_mut(id) else {
            return;
        };
        let action = record
            .current_operation
            .and_then(|op| self.sessions.get(op))
            .map_or(Action::None, |s| s.action);

        let mut local = match scope {
            Scope::Local => Some(std::mem::take(&mut record.bus)),
            Scope::Global => None,
        };
        let mut ctx = EventContext::new(
            &record.id,
            event,
            scope,
            action,
            record.flags,
            record.element,
            record.last_position.as_ref(),
            record.error.as_ref(),
            record.generation,
        );
        let invoked = match local.as_mut() {
            Some(bus) => bus.emit(&mut ctx),
            None => self.bus.emit(&mut ctx),
        };
        let pause = ctx.pause_requested();
        let cancel = ctx.cancel_requested();
        if let Some(bus) = local {
            record.bus = bus;
        }

        if invoked > 0 {
            tracing::trace!(target: "fpane.sequence", pane = %id, %event, ?scope, invoked, "event delivered");
        }
        if cancel {
            if let Some(session) = record
                .current_operation
                .and_then(|op| self.sessions.get_mut(op))
            {
                session.cancel = true;
            }
        }
        if let Some(sequence) = record.sequence.as_mut() {
            if cancel {
                tracing::debug!(target: "fpane.sequence", pane = %id, %event, "handler canceled sequence");
                sequence.seek_terminal();
            }
            if pause {
                tracing::debug!(target: "fpane.sequence", pane = %id, %event, "handler paused sequence");
                sequence.pause();
            }
        }
    }

    /// Roll the pane back and divert the sequence through `onError`.
    fn fail(&mut self, id: &PaneId, job: crate::plan::Job, err: LoadError) {
        tracing::warn!(target: "fpane.scheduler", pane = %id, ?job, error = %err, "collaborator failure");
        self.rollback(id);
        if let Some(record) = self.panes.get_mut(id) {
            record.error = Some(err);
            if let Some(sequence) = record.sequence.as_mut() {
                sequence.divert(plan::error_steps());
            }
        }
    }

    /// The terminal step of `op`'s sequence.
    ///
    /// A sequence that continues into another resolves nothing; the last
    /// sequence of a chain drains every stack along it. A sequence that
    /// failed or was canceled by a handler ends its chain: the sessions it
    /// would continue into are canceled and drained with it.
    pub(super) fn complete(&mut self, id: &PaneId, op: SessionId) {
        let Some(record) = self.panes.get_mut(id) else {
            return;
        };
        record.sequence = None;
        record.current_operation = None;
        record.wait = None;
        record.ticket = None;

        let (mut continued, action, canceled, halted) = match self.sessions.get(op) {
            Some(s) => (s.continued_to, s.action, s.was_canceled, s.cancel),
            None => (None, Action::None, true, false),
        };
        let mut last = op;
        if continued.is_some() && (halted || record.error.is_some()) {
            let chain = self.sessions.continued_into(op);
            for &next in &chain {
                self.sessions.mark_canceled(next);
            }
            record.pending.retain(|p| !chain.contains(p));
            last = chain.last().copied().unwrap_or(op);
            continued = None;
            tracing::debug!(
                target: "fpane.sequence",
                pane = %id,
                session = %op,
                dropped = chain.len(),
                "continuation abandoned"
            );
        }

        if record.head == Some(op) {
            set_head(record, &self.sessions, continued);
        }
        if record.head.is_none() {
            let next = record
                .pending
                .iter()
                .copied()
                .find(|&p| self.sessions.get(p).is_some_and(|s| !s.was_canceled));
            set_head(record, &self.sessions, next);
        }

        if action == Action::Show && !canceled && record.flags.contains(StateFlags::VISIBLE) {
            if let Some(delay) = record.settings.auto_hide() {
                let kind = TimerKind::AutoHide {
                    pane: id.clone(),
                    epoch: record.visibility_epoch,
                };
                self.timers.schedule(self.now.saturating_add(delay), kind);
            }
        }
        let more = !record.pending.is_empty();

        match continued {
            Some(next) => {
                tracing::debug!(target: "fpane.sequence", pane = %id, session = %op, into = %next, "sequence continues");
            }
            None => self.drain(id, last),
        }
        if more {
            self.arm_start(id);
        }
    }

    /// Resolve every callback stack along `last`'s continuation chain.
    fn drain(&mut self, id: &PaneId, last: SessionId) {
        let Some(record) = self.panes.get_mut(id) else {
            return;
        };
        let flags = record.flags;

        let mut resolved = Vec::new();
        for primary in self.sessions.continuation_chain(last) {
            let Some(owner) = self.sessions.get(primary) else {
                continue;
            };
            let applied = owner.applied;
            let stack = record
                .callback_stacks
                .remove(&(owner.action, primary))
                .unwrap_or_default();
            for sid in stack {
                if let Some(session) = self.sessions.remove(sid) {
                    resolved.push((session, applied));
                }
            }
            // A primary is always in its own stack; drop it if not.
            self.sessions.remove(primary);
        }
        resolved.sort_by_key(|(session, _)| session.ordinal);

        tracing::debug!(
            target: "fpane.scheduler",
            pane = %id,
            session = %last,
            callbacks = resolved.len(),
            ?flags,
            "callbacks drained"
        );
        for (session, applied) in resolved {
            let success = success_for(session.action, flags, applied);
            if let Some(callback) = session.callback {
                invoke(id, callback, success);
            }
        }
    }
}
