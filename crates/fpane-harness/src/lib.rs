#![forbid(unsafe_code)]

//! FloatPane Harness
//!
//! In-memory collaborators and recorders for exercising a
//! [`PaneManager`] without a real document.
//!
//! # Key Components
//!
//! - [`MockDocument`] - shared element tree implementing `Renderer` and
//!   `Stylesheet`
//! - [`ScriptedLoader`] - `ContentLoader` with per-spec canned answers
//! - [`EventRecorder`] / [`CallbackLog`] - what fired, and in which order
//! - [`trace::capture`] - tracing output as data
//! - [`Fixture`] - all of the above wired to one manager

pub mod document;
pub mod loader;
pub mod recorder;
pub mod trace;

pub use document::{DocRenderer, DocStylesheet, MockDocument};
pub use loader::ScriptedLoader;
pub use recorder::{CallbackLog, Delivery, EventRecorder};

use fpane_core::{ElementId, PaneError, PaneId, Size};
use fpane_runtime::{LoadSpec, ManagerConfig, PaneManager, PaneSettings};

/// A manager over a [`MockDocument`] and a [`ScriptedLoader`], with a
/// global [`EventRecorder`] attached.
pub struct Fixture {
    pub manager: PaneManager,
    pub doc: MockDocument,
    pub loader: ScriptedLoader,
    pub events: EventRecorder,
    pub callbacks: CallbackLog,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(ManagerConfig::default())
    }

    /// # Panics
    ///
    /// Panics if `config` declares invalid panes.
    pub fn with_config(config: ManagerConfig) -> Self {
        let doc = MockDocument::desktop();
        let loader = ScriptedLoader::new();
        let mut manager = PaneManager::new(config, doc.renderer(), doc.stylesheet(), loader.clone())
            .unwrap_or_else(|err| panic!("fixture config rejected: {err}"));
        let events = EventRecorder::new();
        events.attach_global(&mut manager);
        Self {
            manager,
            doc,
            loader,
            events,
            callbacks: CallbackLog::new(),
        }
    }

    /// Register `id` with content served from `/{id}` as a fresh element of
    /// `size`.
    pub fn pane_with(
        &mut self,
        id: &str,
        size: Size,
        settings: PaneSettings,
    ) -> Result<(PaneId, ElementId), PaneError> {
        let spec = LoadSpec::Url(format!("/{id}"));
        let element = self.doc.create_element(size);
        self.loader.serve(spec.clone(), element);
        let pane = self.manager.register(id, settings.with_load(spec))?;
        Ok((pane, element))
    }

    /// [`pane_with`](Self::pane_with) using default settings and a 200x100
    /// element.
    pub fn pane(&mut self, id: &str) -> Result<(PaneId, ElementId), PaneError> {
        self.pane_with(id, Size::new(200, 100), PaneSettings::default())
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
