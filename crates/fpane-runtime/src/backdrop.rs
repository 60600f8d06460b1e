#![forbid(unsafe_code)]

//! Shared backdrop coordination.
//!
//! One backdrop element sits beneath whichever backdrop-owning pane is top
//! most. Owners are kept in a stack of `{owner, z_index}`; the backdrop is
//! drawn at the highest entry's depth.
//!
//! # Phases
//!
//! `Hidden → Showing → Shown → Hiding → Hidden`. Showing while hiding
//! reverses the transition and keeps the elapsed share, so a rapid
//! hide/show never flashes.
//!
//! # Invariants
//!
//! - `progress` is always in `[0.0, 1.0]`.
//! - While other owners remain, hiding one owner only re-points the depth;
//!   the fade-out runs only for the last owner.
//! - The last owner's entry is removed when its hide transition completes,
//!   or immediately if another owner shows first.
//!
//! # Failure Modes
//!
//! - Zero-length transitions complete on the next `tick`.

use fpane_core::PaneId;
use web_time::Duration;

/// Selector of the shared backdrop element.
pub const BACKDROP_SELECTOR: &str = "#fpane-backdrop";

/// Lifecycle phase of the backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackdropPhase {
    #[default]
    Hidden,
    Showing,
    Shown,
    Hiding,
}

impl BackdropPhase {
    #[inline]
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    #[inline]
    pub fn is_animating(self) -> bool {
        matches!(self, Self::Showing | Self::Hiding)
    }
}

/// Transition lengths and full opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropConfig {
    pub show_duration: Duration,
    pub hide_duration: Duration,
    /// Opacity when fully shown, in `[0.0, 1.0]`.
    pub opacity: f64,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            show_duration: Duration::from_millis(150),
            hide_duration: Duration::from_millis(150),
            opacity: 0.6,
        }
    }
}

/// One owner's reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackdropEntry {
    pub owner: PaneId,
    pub z_index: i32,
}

/// Result of a [`BackdropCoordinator::hide`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackdropRelease {
    /// The owner held no reservation.
    NotOwner,
    /// Other owners remain; the backdrop now sits at this depth.
    Repointed(i32),
    /// Last owner: the fade-out started.
    Fading,
}

/// Owner stack plus the shared element's transition state.
#[derive(Debug, Clone)]
pub struct BackdropCoordinator {
    config: BackdropConfig,
    stack: Vec<BackdropEntry>,
    phase: BackdropPhase,
    progress: f64,
    /// Owner whose fade-out is running.
    retiring: Option<PaneId>,
}

impl BackdropCoordinator {
    pub fn new(config: BackdropConfig) -> Self {
        Self {
            config,
            stack: Vec::new(),
            phase: BackdropPhase::Hidden,
            progress: 0.0,
            retiring: None,
        }
    }

    pub fn phase(&self) -> BackdropPhase {
        self.phase
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn entries(&self) -> &[BackdropEntry] {
        &self.stack
    }

    pub fn is_owner(&self, owner: &PaneId) -> bool {
        self.stack.iter().any(|e| &e.owner == owner)
    }

    /// Depth of the backdrop: the highest reserved z-index.
    pub fn z_index(&self) -> Option<i32> {
        self.stack.iter().map(|e| e.z_index).max()
    }

    /// Current opacity given the phase and progress.
    pub fn opacity(&self) -> f64 {
        let full = self.config.opacity.clamp(0.0, 1.0);
        match self.phase {
            BackdropPhase::Hidden => 0.0,
            BackdropPhase::Showing => full * self.progress,
            BackdropPhase::Shown => full,
            BackdropPhase::Hiding => full * (1.0 - self.progress),
        }
    }

    /// Reserve the backdrop for `owner` at `z_index`.
    ///
    /// Reverses a running fade-out and drops the retiring owner's entry.
    pub fn show(&mut self, owner: PaneId, z_index: i32) {
        if let Some(retiring) = self.retiring.take() {
            if retiring != owner {
                self.stack.retain(|e| e.owner != retiring);
            }
        }

        match self.stack.iter_mut().find(|e| e.owner == owner) {
            Some(entry) => entry.z_index = z_index,
            None => self.stack.push(BackdropEntry { owner, z_index }),
        }

        match self.phase {
            BackdropPhase::Hidden => {
                self.phase = BackdropPhase::Showing;
                self.progress = 0.0;
            }
            BackdropPhase::Hiding => {
                self.phase = BackdropPhase::Showing;
                self.progress = 1.0 - self.progress;
            }
            BackdropPhase::Showing | BackdropPhase::Shown => {}
        }

        tracing::debug!(
            target: "fpane.backdrop",
            z_index,
            owners = self.stack.len(),
            phase = ?self.phase,
            "backdrop reserved"
        );
    }

    /// Release `owner`'s reservation.
    pub fn hide(&mut self, owner: &PaneId) -> BackdropRelease {
        if !self.is_owner(owner) || self.retiring.as_ref() == Some(owner) {
            return BackdropRelease::NotOwner;
        }

        if self.stack.len() > 1 {
            self.stack.retain(|e| &e.owner != owner);
            let z = self.set_z_index_to_next_highest().unwrap_or_default();
            tracing::debug!(target: "fpane.backdrop", z_index = z, "backdrop re-pointed");
            return BackdropRelease::Repointed(z);
        }

        self.retiring = Some(owner.clone());
        match self.phase {
            BackdropPhase::Shown => {
                self.phase = BackdropPhase::Hiding;
                self.progress = 0.0;
            }
            BackdropPhase::Showing => {
                self.phase = BackdropPhase::Hiding;
                self.progress = 1.0 - self.progress;
            }
            BackdropPhase::Hiding | BackdropPhase::Hidden => {}
        }
        tracing::debug!(target: "fpane.backdrop", phase = ?self.phase, "backdrop fading");
        BackdropRelease::Fading
    }

    /// Drop `owner` immediately, skipping any transition.
    pub fn release_now(&mut self, owner: &PaneId) {
        self.stack.retain(|e| &e.owner != owner);
        if self.retiring.as_ref() == Some(owner) {
            self.retiring = None;
        }
        if self.stack.is_empty() {
            self.phase = BackdropPhase::Hidden;
            self.progress = 0.0;
        }
    }

    /// Order the stack by depth and return the depth now in effect.
    pub fn set_z_index_to_next_highest(&mut self) -> Option<i32> {
        self.stack.sort_by_key(|e| e.z_index);
        self.stack.last().map(|e| e.z_index)
    }

    /// Advance the running transition by `delta`.
    ///
    /// Returns `true` if the phase changed.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let duration = match self.phase {
            BackdropPhase::Showing => self.config.show_duration,
            BackdropPhase::Hiding => self.config.hide_duration,
            BackdropPhase::Hidden | BackdropPhase::Shown => return false,
        };

        let secs = duration.as_secs_f64();
        if secs > 0.0 {
            self.progress += delta.as_secs_f64() / secs;
        } else {
            self.progress = 1.0;
        }
        self.progress = self.progress.min(1.0);
        if self.progress < 1.0 {
            return false;
        }

        match self.phase {
            BackdropPhase::Showing => {
                self.phase = BackdropPhase::Shown;
                self.progress = 1.0;
            }
            BackdropPhase::Hiding => {
                if let Some(retiring) = self.retiring.take() {
                    self.stack.retain(|e| e.owner != retiring);
                }
                self.phase = BackdropPhase::Hidden;
                self.progress = 0.0;
            }
            BackdropPhase::Hidden | BackdropPhase::Shown => {}
        }
        tracing::debug!(target: "fpane.backdrop", phase = ?self.phase, "backdrop transition finished");
        true
    }

    /// Time left in the running transition.
    pub fn remaining(&self) -> Option<Duration> {
        let duration = match self.phase {
            BackdropPhase::Showing => self.config.show_duration,
            BackdropPhase::Hiding => self.config.hide_duration,
            BackdropPhase::Hidden | BackdropPhase::Shown => return None,
        };
        Some(duration.mul_f64((1.0 - self.progress).max(0.0)))
    }
}

impl Default for BackdropCoordinator {
    fn default() -> Self {
        Self::new(BackdropConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> PaneId {
        PaneId::new(s).unwrap()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn coordinator() -> BackdropCoordinator {
        BackdropCoordinator::new(BackdropConfig {
            show_duration: ms(100),
            hide_duration: ms(100),
            opacity: 0.5,
        })
    }

    #[test]
    fn show_then_tick_to_shown() {
        let mut b = coordinator();
        b.show(id("a"), 1000);
        assert_eq!(b.phase(), BackdropPhase::Showing);
        assert!(!b.tick(ms(50)));
        assert!((b.opacity() - 0.25).abs() < 1e-9);
        assert!(b.tick(ms(60)));
        assert_eq!(b.phase(), BackdropPhase::Shown);
        assert_eq!(b.z_index(), Some(1000));
    }

    #[test]
    fn last_owner_fades_then_is_removed() {
        let mut b = coordinator();
        b.show(id("a"), 1000);
        b.tick(ms(100));
        assert_eq!(b.hide(&id("a")), BackdropRelease::Fading);
        assert!(b.is_owner(&id("a")));
        assert!(b.tick(ms(100)));
        assert_eq!(b.phase(), BackdropPhase::Hidden);
        assert!(b.entries().is_empty());
    }

    #[test]
    fn hiding_non_top_owner_repoints() {
        let mut b = coordinator();
        b.show(id("a"), 1000);
        b.show(id("b"), 1010);
        b.tick(ms(100));
        assert_eq!(b.hide(&id("b")), BackdropRelease::Repointed(1000));
        assert_eq!(b.phase(), BackdropPhase::Shown);
        assert_eq!(b.z_index(), Some(1000));
    }

    #[test]
    fn show_during_fade_reverses() {
        let mut b = coordinator();
        b.show(id("a"), 1000);
        b.tick(ms(100));
        b.hide(&id("a"));
        b.tick(ms(30));
        b.show(id("b"), 1020);
        assert_eq!(b.phase(), BackdropPhase::Showing);
        assert!((b.progress() - 0.7).abs() < 1e-9);
        assert!(!b.is_owner(&id("a")));
        assert_eq!(b.z_index(), Some(1020));
    }

    #[test]
    fn reshow_same_owner_cancels_retirement() {
        let mut b = coordinator();
        b.show(id("a"), 1000);
        b.tick(ms(100));
        b.hide(&id("a"));
        b.show(id("a"), 1004);
        b.tick(ms(100));
        assert_eq!(b.phase(), BackdropPhase::Shown);
        assert_eq!(b.entries().len(), 1);
        assert_eq!(b.z_index(), Some(1004));
    }

    #[test]
    fn unknown_owner_is_ignored() {
        let mut b = coordinator();
        assert_eq!(b.hide(&id("ghost")), BackdropRelease::NotOwner);
    }

    #[test]
    fn zero_duration_completes_on_tick() {
        let mut b = BackdropCoordinator::new(BackdropConfig {
            show_duration: Duration::ZERO,
            hide_duration: Duration::ZERO,
            opacity: 1.0,
        });
        b.show(id("a"), 5);
        assert!(b.tick(Duration::ZERO));
        assert_eq!(b.phase(), BackdropPhase::Shown);
    }

    #[test]
    fn release_now_clears_phase() {
        let mut b = coordinator();
        b.show(id("a"), 1);
        b.release_now(&id("a"));
        assert_eq!(b.phase(), BackdropPhase::Hidden);
        assert_eq!(b.remaining(), None);
    }
}
