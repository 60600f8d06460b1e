#![forbid(unsafe_code)]

//! Ordered step list with a cursor and a pause gate.
//!
//! The scheduler polls [`StepSequence::next`] between steps; nothing here
//! runs steps itself. The last step is the terminal step: it is never
//! skipped by [`seek_terminal`](StepSequence::seek_terminal) or
//! [`divert`](StepSequence::divert), which is what lets a canceled or failed
//! sequence still drain its callbacks.
//!
//! # Invariants
//!
//! - `cursor <= steps.len()`.
//! - A paused sequence yields nothing until resumed.

use std::fmt;

/// Ordered steps with a cursor.
#[derive(Clone)]
pub struct StepSequence<S> {
    steps: Vec<S>,
    cursor: usize,
    paused: bool,
}

impl<S: fmt::Debug> fmt::Debug for StepSequence<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepSequence")
            .field("cursor", &self.cursor)
            .field("len", &self.steps.len())
            .field("paused", &self.paused)
            .field("next", &self.steps.get(self.cursor))
            .finish()
    }
}

impl<S: Clone> StepSequence<S> {
    /// A sequence over `steps`; the final element is the terminal step.
    pub fn new(steps: Vec<S>) -> Self {
        Self {
            steps,
            cursor: 0,
            paused: false,
        }
    }

    /// Take the next step and advance. `None` when paused or finished.
    pub fn next(&mut self) -> Option<S> {
        if self.paused {
            return None;
        }
        let step = self.steps.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(step)
    }

    /// Step that [`next`](Self::next) would return, ignoring the pause gate.
    pub fn peek(&self) -> Option<&S> {
        self.steps.get(self.cursor)
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Reopen the gate. Returns `false` if it was not paused.
    pub fn resume(&mut self) -> bool {
        std::mem::replace(&mut self.paused, false)
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Move the cursor to `index` (clamped to the end).
    pub fn seek(&mut self, index: usize) {
        self.cursor = index.min(self.steps.len());
    }

    /// Skip everything up to the terminal step.
    ///
    /// A sequence already past its terminal step stays finished.
    pub fn seek_terminal(&mut self) {
        let terminal = self.steps.len().saturating_sub(1);
        if self.cursor < terminal {
            self.cursor = terminal;
        }
    }

    /// Replace every remaining non-terminal step with `steps`.
    pub fn divert(&mut self, steps: Vec<S>) {
        if self.is_finished() {
            return;
        }
        let terminal = self.steps.len().saturating_sub(1);
        let start = self.cursor.min(terminal);
        self.steps.splice(start..terminal, steps);
        self.cursor = start;
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps not yet taken.
    pub fn remaining(&self) -> &[S] {
        &self.steps[self.cursor.min(self.steps.len())..]
    }
}
