#![forbid(unsafe_code)]

//! Manager configuration as data.
//!
//! [`ManagerConfig`] gathers every tunable of the manager plus the panes to
//! register at construction. With the `config` feature it loads from TOML or
//! JSON:
//!
//! ```toml
//! base_z_index = 2000
//! default_overflow = "clip"
//!
//! [backdrop]
//! show_ms = 200
//!
//! [[panes]]
//! id = "cart"
//! [panes.settings]
//! backdrop = true
//! load = { url = "/fragments/cart.html" }
//! ```
//!
//! ```rust,ignore
//! let config = ManagerConfig::from_toml_file("floatpane.toml")?;
//! ```
//!
//! # Defaults
//!
//! `ManagerConfig::default()` stacks panes from z-index 1000, shifts
//! overflowing panes back on screen and runs 150 ms backdrop transitions.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use fpane_core::Sides;
use fpane_position::OverflowMode;
use thiserror::Error;
use web_time::Duration;

use crate::backdrop::BackdropConfig;
use crate::settings::PaneSettings;

/// Top-level manager configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ManagerConfig {
    /// Lowest z-index handed to a pane.
    pub base_z_index: i32,
    /// Stylesheet token all pane rules are written under.
    pub stylesheet: String,
    /// Overflow correction when a show does not pick one.
    pub default_overflow: OverflowMode,
    /// Inset of the clip bounds.
    pub clip_margin: Sides,
    pub backdrop: BackdropSettings,
    /// Keep hidden panes in the staging area (measurable) instead of
    /// detaching them from the render tree.
    pub stage_hidden: bool,
    /// Upper bound on turns a single `run_until_idle` may execute.
    pub max_turns: usize,
    /// Panes registered at construction.
    pub panes: Vec<PaneDecl>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            base_z_index: 1000,
            stylesheet: "fpane".to_owned(),
            default_overflow: OverflowMode::Shift,
            clip_margin: Sides::default(),
            backdrop: BackdropSettings::default(),
            stage_hidden: true,
            max_turns: 10_000,
            panes: Vec::new(),
        }
    }
}

/// Backdrop transition settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct BackdropSettings {
    pub show_ms: u64,
    pub hide_ms: u64,
    pub opacity: f64,
}

impl Default for BackdropSettings {
    fn default() -> Self {
        Self {
            show_ms: 150,
            hide_ms: 150,
            opacity: 0.6,
        }
    }
}

impl BackdropSettings {
    pub fn to_backdrop_config(&self) -> BackdropConfig {
        BackdropConfig {
            show_duration: Duration::from_millis(self.show_ms),
            hide_duration: Duration::from_millis(self.hide_ms),
            opacity: self.opacity,
        }
    }
}

/// A pane declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct PaneDecl {
    pub id: String,
    #[cfg_attr(feature = "config", serde(default))]
    pub settings: PaneSettings,
}

impl ManagerConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate every parameter.
    ///
    /// Returns a list of problems; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.stylesheet.trim().is_empty() {
            errors.push("stylesheet must not be empty".into());
        }
        if self.max_turns == 0 {
            errors.push("max_turns must be > 0".into());
        }
        if !(0.0..=1.0).contains(&self.backdrop.opacity) {
            errors.push(format!(
                "backdrop.opacity must be in [0, 1], got {}",
                self.backdrop.opacity
            ));
        }
        let m = self.clip_margin;
        if m.top < 0 || m.right < 0 || m.bottom < 0 || m.left < 0 {
            errors.push(format!("clip_margin must be non-negative, got {m:?}"));
        }

        let mut seen = Vec::new();
        for (i, decl) in self.panes.iter().enumerate() {
            let path = format!("panes[{i}]");
            match fpane_core::PaneId::new(&decl.id) {
                Ok(id) => {
                    if seen.contains(&id) {
                        errors.push(format!("{path}.id {:?} is declared twice", decl.id));
                    }
                    seen.push(id);
                }
                Err(err) => errors.push(format!("{path}.id: {err}")),
            }
            errors.extend(decl.settings.validate(&path));
        }

        errors
    }

    /// Validate and fail on the first problem set.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Builder: declare a pane.
    #[must_use]
    pub fn with_pane(mut self, id: impl Into<String>, settings: PaneSettings) -> Self {
        self.panes.push(PaneDecl {
            id: id.into(),
            settings,
        });
        self
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(toml::de::Error),
    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ResizeLimits;

    #[test]
    fn default_validates_clean() {
        let errors = ManagerConfig::default().validate();
        assert!(errors.is_empty(), "default should validate: {errors:?}");
    }

    #[test]
    fn validate_catches_bad_values() {
        let mut config = ManagerConfig {
            max_turns: 0,
            stylesheet: " ".into(),
            ..ManagerConfig::default()
        };
        config.backdrop.opacity = 1.5;
        config.clip_margin = Sides::all(-1);
        let errors = config.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
    }

    #[test]
    fn validate_checks_panes() {
        let config = ManagerConfig::default()
            .with_pane("menu", PaneSettings::default())
            .with_pane("MENU", PaneSettings::default())
            .with_pane("bad id", PaneSettings::default())
            .with_pane(
                "sized",
                PaneSettings::default().with_resize_limits(ResizeLimits {
                    min_height: Some(10),
                    max_height: Some(5),
                    ..ResizeLimits::default()
                }),
            );
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("declared twice")));
        assert!(errors.iter().any(|e| e.starts_with("panes[2].id")));
        assert!(errors.iter().any(|e| e.contains("panes[3].resize.min_height")));
    }

    #[test]
    fn validated_wraps_errors() {
        let config = ManagerConfig {
            max_turns: 0,
            ..ManagerConfig::default()
        };
        let err = config.validated().unwrap_err();
        assert!(err.to_string().contains("max_turns"));
    }

    #[test]
    fn backdrop_settings_convert() {
        let b = BackdropSettings {
            show_ms: 10,
            hide_ms: 20,
            opacity: 0.3,
        }
        .to_backdrop_config();
        assert_eq!(b.show_duration, Duration::from_millis(10));
        assert_eq!(b.hide_duration, Duration::from_millis(20));
    }
}
