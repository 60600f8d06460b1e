#![forbid(unsafe_code)]

//! Declarative per-pane settings.

use fpane_core::Size;
use web_time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::args::ShowArgs;
use crate::collab::LoadSpec;

/// Size limits applied by `resize`. `None` leaves a side unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ResizeLimits {
    pub min_width: Option<i32>,
    pub max_width: Option<i32>,
    pub min_height: Option<i32>,
    pub max_height: Option<i32>,
}

impl ResizeLimits {
    /// Clamp a requested size. Negative sizes collapse to zero first.
    pub fn clamp(&self, size: Size) -> Size {
        fn limit(value: i32, min: Option<i32>, max: Option<i32>) -> i32 {
            let mut v = value.max(0);
            if let Some(max) = max {
                v = v.min(max);
            }
            if let Some(min) = min {
                v = v.max(min);
            }
            v
        }
        Size::new(
            limit(size.width, self.min_width, self.max_width),
            limit(size.height, self.min_height, self.max_height),
        )
    }

    /// Problems with inverted ranges, prefixed by `path`.
    pub(crate) fn violations(&self, path: &str) -> Vec<String> {
        let mut errors = Vec::new();
        if let (Some(min), Some(max)) = (self.min_width, self.max_width) {
            if min > max {
                errors.push(format!("{path}.min_width ({min}) exceeds max_width ({max})"));
            }
        }
        if let (Some(min), Some(max)) = (self.min_height, self.max_height) {
            if min > max {
                errors.push(format!("{path}.min_height ({min}) exceeds max_height ({max})"));
            }
        }
        errors
    }
}

/// Behaviour of one pane.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PaneSettings {
    /// Where content comes from. `None` requires
    /// [`PaneManager::set_element`](crate::PaneManager::set_element).
    pub load: Option<LoadSpec>,
    /// Defaults merged under every `show` call.
    pub show: ShowArgs,
    /// Draw the shared backdrop beneath this pane.
    pub backdrop: bool,
    /// Length of the show transition in milliseconds.
    pub show_transition_ms: u64,
    /// Length of the hide transition in milliseconds.
    pub hide_transition_ms: u64,
    /// Unload content whenever the pane is hidden.
    pub unload_on_hide: bool,
    /// Hide automatically this many milliseconds after being shown.
    pub auto_hide_ms: Option<u64>,
    pub resize: ResizeLimits,
    /// Extra classes applied while the pane is visible.
    pub class_names: Vec<String>,
}

impl PaneSettings {
    pub fn show_transition(&self) -> Duration {
        Duration::from_millis(self.show_transition_ms)
    }

    pub fn hide_transition(&self) -> Duration {
        Duration::from_millis(self.hide_transition_ms)
    }

    pub fn auto_hide(&self) -> Option<Duration> {
        self.auto_hide_ms.map(Duration::from_millis)
    }

    /// Builder: content source.
    #[must_use]
    pub fn with_load(mut self, spec: LoadSpec) -> Self {
        self.load = Some(spec);
        self
    }

    /// Builder: stored show defaults.
    #[must_use]
    pub fn with_show(mut self, show: ShowArgs) -> Self {
        self.show = show;
        self
    }

    /// Builder: backdrop flag.
    #[must_use]
    pub fn with_backdrop(mut self, backdrop: bool) -> Self {
        self.backdrop = backdrop;
        self
    }

    /// Builder: show and hide transition lengths.
    #[must_use]
    pub fn with_transitions(mut self, show: Duration, hide: Duration) -> Self {
        self.show_transition_ms = show.as_millis() as u64;
        self.hide_transition_ms = hide.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_unload_on_hide(mut self, unload: bool) -> Self {
        self.unload_on_hide = unload;
        self
    }

    #[must_use]
    pub fn with_auto_hide(mut self, delay: Duration) -> Self {
        self.auto_hide_ms = Some(delay.as_millis() as u64);
        self
    }

    #[must_use]
    pub fn with_resize_limits(mut self, limits: ResizeLimits) -> Self {
        self.resize = limits;
        self
    }

    /// Validation errors, prefixed by `path`. Empty when valid.
    pub fn validate(&self, path: &str) -> Vec<String> {
        let mut errors = self.resize.violations(&format!("{path}.resize"));
        if self.auto_hide_ms == Some(0) {
            errors.push(format!("{path}.auto_hide_ms must be > 0 when set"));
        }
        errors
    }
}
