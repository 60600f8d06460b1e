#![forbid(unsafe_code)]

//! Logical-clock timers.

use std::collections::BTreeMap;

use fpane_core::PaneId;
use web_time::Duration;

/// What happens when a timer elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TimerKind {
    /// A show/hide transition of sequence `generation` finished.
    TransitionDone { pane: PaneId, generation: u64 },
    /// Hide the pane unless its visibility changed since `epoch`.
    AutoHide { pane: PaneId, epoch: u64 },
}

/// Timers ordered by deadline, then by insertion.
#[derive(Debug, Default)]
pub(crate) struct TimerWheel {
    timers: BTreeMap<(Duration, u64), TimerKind>,
    seq: u64,
}

impl TimerWheel {
    pub fn schedule(&mut self, deadline: Duration, kind: TimerKind) {
        self.seq += 1;
        self.timers.insert((deadline, self.seq), kind);
    }

    /// Earliest deadline at or before `limit`.
    pub fn next_deadline(&self, limit: Duration) -> Option<Duration> {
        self.timers
            .keys()
            .next()
            .map(|&(deadline, _)| deadline)
            .filter(|&deadline| deadline <= limit)
    }

    /// Remove and return every timer due at or before `now`, in order.
    pub fn take_due(&mut self, now: Duration) -> Vec<TimerKind> {
        let mut due = Vec::new();
        while let Some(entry) = self.timers.first_entry() {
            if entry.key().0 > now {
                break;
            }
            due.push(entry.remove());
        }
        due
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }
}
