#![forbid(unsafe_code)]

//! FloatPane Runtime
//!
//! Lifecycle scheduling for floating panes: dropdowns, dialogs, modals and
//! tooltips layered over a host document.
//!
//! # Key Components
//!
//! - [`PaneManager`] - registry, operation scheduler and logical clock
//! - [`PaneSettings`] / [`ManagerConfig`] - declarative configuration
//! - [`EventBus`] / [`LifecycleEvent`] - pane-local and global lifecycle hooks
//! - [`BackdropCoordinator`] - the shared backdrop beneath the top-most owner
//! - [`Renderer`], [`Stylesheet`], [`ContentLoader`] - collaborator contracts
//!
//! # Role in FloatPane
//! `fpane-runtime` is the orchestrator. It turns `show`/`hide`/`load`/
//! `unload`/`move`/`resize` requests into step sequences, serializes them per
//! pane, and delegates geometry to `fpane-position`.
//!
//! # How it fits in the system
//! The host implements the three collaborator traits over its document and
//! drives the manager with [`PaneManager::pump`] or
//! [`PaneManager::advance`]. `fpane-harness` provides in-memory doubles for
//! tests.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut manager = PaneManager::new(ManagerConfig::default(), renderer, sheet, loader)?;
//! manager.register("cart", PaneSettings::default().with_load(LoadSpec::Url("/cart".into())))?;
//! let shown = manager.show_async("cart", ShowParams::Default)?;
//! manager.run_until_idle();
//! assert_eq!(shown.result(), Some(true));
//! ```

pub mod args;
pub mod backdrop;
pub mod classify;
pub mod collab;
pub mod completion;
pub mod config;
pub mod events;
pub mod plan;
mod scheduler;
pub mod sequence;
pub mod session;
pub mod settings;
pub mod state;
pub mod zorder;

pub use args::{
    AnchorTargets, LoadArgs, LoadParams, MoveParams, OperationArgs, RelativeTo, ResizeParams,
    ShowArgs, ShowOverrides, ShowParams, resolve_show,
};
pub use backdrop::{
    BACKDROP_SELECTOR, BackdropConfig, BackdropCoordinator, BackdropEntry, BackdropPhase,
    BackdropRelease,
};
pub use classify::{Classification, classify};
pub use collab::{
    Container, ContentLoader, LoadPoll, LoadSpec, LoadTicket, Renderer, RuleSet, Stylesheet,
};
pub use completion::Completion;
pub use config::{BackdropSettings, ConfigError, ManagerConfig, PaneDecl};
pub use events::{
    EventBus, EventContext, Handler, HandlerError, LifecycleEvent, ListenerId, ResumeToken, Scope,
};
pub use scheduler::PaneManager;
pub use sequence::StepSequence;
pub use session::{Callback, SessionId, SessionLink};
pub use settings::{PaneSettings, ResizeLimits};
pub use state::{Action, PaneSnapshot, StateFlags};
