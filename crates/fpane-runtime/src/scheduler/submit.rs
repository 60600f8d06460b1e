#![forbid(unsafe_code)]

//! Applying a classification to the pane's session bookkeeping.

use fpane_core::{PaneError, PaneId};

use crate::args::OperationArgs;
use crate::classify::{Classification, GeometryRefusal, check_geometry, classify};
use crate::session::{Callback, SessionArena, SessionId, SessionLink};
use crate::state::{Action, PaneStateRecord};

use super::PaneManager;

impl PaneManager {
    /// Accept a request for `pane`.
    ///
    /// Nothing runs before the next turn. The returned id identifies the
    /// session that carries `callback`.
    pub fn submit(
        &mut self,
        pane: &PaneId,
        args: OperationArgs,
        callback: Option<Callback>,
    ) -> Result<SessionId, PaneError> {
        let action = args.action();
        let record = self.record(pane)?;
        let head = record.head;
        let current = record.current_action;
        let continues_to_show = head.is_some_and(|h| continues_into(&self.sessions, h, Action::Show));

        if action.is_geometry() {
            let showing = current == Action::Show || continues_to_show;
            check_geometry(current, record.flags, showing).map_err(|refusal| match refusal {
                GeometryRefusal::IllegalState(in_flight) => PaneError::IllegalState {
                    pane: pane.clone(),
                    action: action.as_str(),
                    current: in_flight.progressive(),
                },
                GeometryRefusal::NotVisible => PaneError::NotVisible {
                    pane: pane.clone(),
                    action: action.as_str(),
                },
            })?;
        }

        let classification = classify(current, action, args.is_reload(), continues_to_show);
        let sid = self.sessions.create(pane.clone(), action, args, callback);

        let Self {
            panes, sessions, ..
        } = self;
        let Some(record) = panes.get_mut(pane) else {
            return Err(PaneError::UnknownPane(pane.clone()));
        };
        if matches!(action, Action::Show | Action::Hide | Action::Unload) {
            record.visibility_epoch += 1;
        }

        let mut start = false;
        let mut drive = false;
        match classification {
            Classification::Run => {
                enqueue(record, sessions, sid, SessionLink::Direct);
                set_head(record, sessions, Some(sid));
                start = true;
            }
            Classification::Duplicate => {
                if let Some(h) = head {
                    start = join_duplicate(record, sessions, h, sid);
                }
            }
            Classification::Continue => {
                start = continue_or_queue(record, sessions, head, sid);
            }
            Classification::Queue => {
                start = queue(record, sessions, head, sid);
            }
            Classification::CancelAndReplace => {
                drive = cancel_in_flight(record, sessions);
                let link = head.map_or(SessionLink::Direct, SessionLink::QueuedAfter);
                enqueue(record, sessions, sid, link);
                set_head(record, sessions, Some(sid));
                start = record.current_operation.is_none();
            }
        }

        tracing::debug!(
            target: "fpane.scheduler",
            pane = %pane,
            session = %sid,
            action = %action,
            ?classification,
            pending = record.pending.len(),
            "operation submitted"
        );

        if start && record.current_operation.is_none() {
            self.arm_start(pane);
        }
        if drive {
            self.arm_drive(pane);
        }
        Ok(sid)
    }
}

/// `session` is a primary whose sequence extends into a session of `action`.
fn continues_into(sessions: &SessionArena, session: SessionId, action: Action) -> bool {
    sessions
        .get(session)
        .and_then(|s| s.continued_to)
        .and_then(|next| sessions.get(next))
        .is_some_and(|next| next.action == action)
}

/// Point `head` and `current_action` at `head`.
pub(super) fn set_head(record: &mut PaneStateRecord, sessions: &SessionArena, head: Option<SessionId>) {
    record.head = head;
    record.current_action = head
        .and_then(|h| sessions.get(h))
        .map_or(Action::None, |s| s.action);
}

/// Give `sid` its own stack and append it to the pending queue.
fn enqueue(record: &mut PaneStateRecord, sessions: &mut SessionArena, sid: SessionId, link: SessionLink) {
    if let Some(session) = sessions.get_mut(sid) {
        session.link = link;
        session.queued = true;
        record.callback_stacks.insert((session.action, sid), vec![sid]);
    }
    record.pending.push_back(sid);
}

/// Add `sid` to the stack owned by `primary`.
fn push_stack(record: &mut PaneStateRecord, sessions: &SessionArena, primary: SessionId, sid: SessionId) {
    let Some(owner) = sessions.get(primary) else {
        return;
    };
    record
        .callback_stacks
        .entry((owner.action, primary))
        .or_insert_with(|| vec![primary])
        .push(sid);
}

/// Join `sid` to the stack of the session it duplicates.
///
/// Live sessions already waiting behind the head's chain were created
/// earlier and must resolve first: `sid` then folds into the last pending
/// session when that one has the same action, and queues otherwise.
/// Returns whether a start must be armed.
fn join_duplicate(
    record: &mut PaneStateRecord,
    sessions: &mut SessionArena,
    head: SessionId,
    sid: SessionId,
) -> bool {
    let chain = sessions.continued_into(head);
    let skip = record
        .pending
        .iter()
        .position(|&p| p == head)
        .map_or(0, |i| i + 1);
    let waiting: Vec<SessionId> = record
        .pending
        .iter()
        .skip(skip)
        .copied()
        .filter(|p| !chain.contains(p))
        .filter(|&p| sessions.get(p).is_some_and(|s| !s.was_canceled))
        .collect();

    let Some(&last) = waiting.last() else {
        push_stack(record, sessions, head, sid);
        return false;
    };
    let action = sessions.get(sid).map_or(Action::None, |s| s.action);
    let foldable = record.pending.back() == Some(&last)
        && sessions
            .get(last)
            .is_some_and(|s| s.action == action && s.queued);
    if foldable {
        push_stack(record, sessions, last, sid);
        tracing::trace!(target: "fpane.scheduler", into = %last, session = %sid, "duplicate joined queued session");
        return false;
    }
    queue(record, sessions, Some(head), sid)
}

/// Sessions waiting behind `head` that will still run.
fn live_behind(record: &PaneStateRecord, sessions: &SessionArena, head: SessionId) -> bool {
    let skip = record
        .pending
        .iter()
        .position(|&p| p == head)
        .map_or(0, |i| i + 1);
    record
        .pending
        .iter()
        .skip(skip)
        .any(|&p| sessions.get(p).is_some_and(|s| !s.was_canceled))
}

/// Extend the head's sequence into `sid`, or queue it if that would reorder
/// callbacks. Returns whether a start must be armed.
fn continue_or_queue(
    record: &mut PaneStateRecord,
    sessions: &mut SessionArena,
    head: Option<SessionId>,
    sid: SessionId,
) -> bool {
    let Some(h) = head else {
        return queue(record, sessions, head, sid);
    };
    let action = sessions.get(sid).map_or(Action::None, |s| s.action);

    match sessions.get(h).and_then(|s| s.continued_to) {
        Some(existing) if sessions.get(existing).is_some_and(|s| s.action == action) => {
            push_stack(record, sessions, existing, sid);
            return false;
        }
        Some(_) => return queue(record, sessions, head, sid),
        None => {}
    }
    if live_behind(record, sessions, h) {
        return queue(record, sessions, head, sid);
    }

    if let Some(session) = sessions.get_mut(sid) {
        session.link = SessionLink::ContinuedFrom(h);
        session.queued = true;
    }
    if let Some(prior) = sessions.get_mut(h) {
        prior.continued_to = Some(sid);
    }
    record.callback_stacks.insert((action, sid), vec![sid]);
    let at = if record.current_operation == Some(h) {
        0
    } else {
        record
            .pending
            .iter()
            .position(|&p| p == h)
            .map_or(record.pending.len(), |i| i + 1)
    };
    record.pending.insert(at, sid);
    false
}

/// Queue `sid` behind everything pending.
///
/// Move and resize keep one waiting successor per type: a request whose
/// type matches the last queued, not yet started session is folded into it
/// and the latest arguments win.
fn queue(
    record: &mut PaneStateRecord,
    sessions: &mut SessionArena,
    head: Option<SessionId>,
    sid: SessionId,
) -> bool {
    let action = sessions.get(sid).map_or(Action::None, |s| s.action);
    let last = record.pending.back().copied();

    if action.is_geometry() {
        if let Some(last) = last.filter(|&l| Some(l) != head) {
            let foldable = sessions
                .get(last)
                .is_some_and(|s| s.action == action && s.queued && !s.was_canceled);
            if foldable {
                let args = sessions.get(sid).map(|s| s.args.clone());
                if let (Some(target), Some(args)) = (sessions.get_mut(last), args) {
                    target.args = args;
                }
                push_stack(record, sessions, last, sid);
                tracing::trace!(target: "fpane.scheduler", into = %last, session = %sid, "request coalesced");
                return false;
            }
        }
    }

    let after = last.or(head);
    enqueue(
        record,
        sessions,
        sid,
        after.map_or(SessionLink::Direct, SessionLink::QueuedAfter),
    );
    true
}

/// Cancel the head, the running session and everything pending.
///
/// Returns whether the running sequence was redirected to its terminal step
/// and needs driving.
fn cancel_in_flight(record: &mut PaneStateRecord, sessions: &mut SessionArena) -> bool {
    let victims: Vec<SessionId> = record
        .head
        .into_iter()
        .chain(record.current_operation)
        .chain(record.pending.iter().copied())
        .collect();
    for victim in victims {
        sessions.mark_canceled(victim);
    }

    if record.current_operation.is_none() {
        return false;
    }
    let Some(sequence) = record.sequence.as_mut() else {
        return false;
    };
    sequence.seek_terminal();
    sequence.resume();
    record.wait = None;
    record.ticket = None;
    tracing::debug!(target: "fpane.scheduler", pane = %record.id, "in-flight sequence canceled");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::MoveParams;

    fn pane() -> PaneId {
        PaneId::new("p").unwrap()
    }

    fn record() -> PaneStateRecord {
        PaneStateRecord::new(pane(), Default::default())
    }

    fn moving(sessions: &mut SessionArena, dx: i32) -> SessionId {
        sessions.create(
            pane(),
            Action::Move,
            OperationArgs::Move(MoveParams::By { dx, dy: 0 }),
            None,
        )
    }

    #[test]
    fn third_move_folds_into_queued_one() {
        let mut sessions = SessionArena::new();
        let mut rec = record();
        let running = moving(&mut sessions, 1);
        enqueue(&mut rec, &mut sessions, running, SessionLink::Direct);
        set_head(&mut rec, &sessions, Some(running));
        rec.pending.pop_front();
        rec.current_operation = Some(running);

        let second = moving(&mut sessions, 2);
        assert!(queue(&mut rec, &mut sessions, Some(running), second));
        let third = moving(&mut sessions, 3);
        assert!(!queue(&mut rec, &mut sessions, Some(running), third));

        assert_eq!(rec.pending.len(), 1);
        assert_eq!(
            sessions.get(second).unwrap().args,
            OperationArgs::Move(MoveParams::By { dx: 3, dy: 0 })
        );
        assert_eq!(rec.callback_stacks[&(Action::Move, second)], vec![second, third]);
    }

    #[test]
    fn continuation_lands_right_after_head() {
        let mut sessions = SessionArena::new();
        let mut rec = record();
        let load = sessions.create(pane(), Action::Load, OperationArgs::Unload, None);
        enqueue(&mut rec, &mut sessions, load, SessionLink::Direct);
        set_head(&mut rec, &sessions, Some(load));

        let show = sessions.create(pane(), Action::Show, OperationArgs::Hide, None);
        continue_or_queue(&mut rec, &mut sessions, Some(load), show);

        assert_eq!(rec.pending, [load, show]);
        assert_eq!(sessions.get(load).unwrap().continued_to, Some(show));
        assert_eq!(sessions.get(show).unwrap().link, SessionLink::ContinuedFrom(load));
        assert_eq!(rec.current_action, Action::Load);

        let again = sessions.create(pane(), Action::Show, OperationArgs::Hide, None);
        continue_or_queue(&mut rec, &mut sessions, Some(load), again);
        assert_eq!(rec.pending.len(), 2);
        assert_eq!(rec.callback_stacks[&(Action::Show, show)], vec![show, again]);
    }

    #[test]
    fn cancel_marks_everything_pending() {
        let mut sessions = SessionArena::new();
        let mut rec = record();
        let a = sessions.create(pane(), Action::Show, OperationArgs::Hide, None);
        let b = sessions.create(pane(), Action::Move, OperationArgs::Hide, None);
        enqueue(&mut rec, &mut sessions, a, SessionLink::Direct);
        enqueue(&mut rec, &mut sessions, b, SessionLink::QueuedAfter(a));
        set_head(&mut rec, &sessions, Some(a));

        assert!(!cancel_in_flight(&mut rec, &mut sessions));
        assert!(sessions.get(a).unwrap().was_canceled);
        assert!(sessions.get(b).unwrap().was_canceled);
    }
}
