#![forbid(unsafe_code)]

//! FloatPane public facade crate.
//!
//! This crate provides the stable surface area for hosts. It re-exports the
//! common types from the internal crates and offers a lightweight prelude
//! for day-to-day usage.
//!
//! # Features
//!
//! - `config` - load [`ManagerConfig`] from TOML or JSON files
//! - `tracing-json` - [`init_tracing`] installs a JSON subscriber filtered by
//!   `RUST_LOG`

// --- Core re-exports -------------------------------------------------------

pub use fpane_core::{
    Align, Axis, Bounds, ElementId, LoadError, Orientation, PaneError, PaneId, Point,
    RelativeAlign, Sides, Size,
};

// --- Position re-exports ---------------------------------------------------

pub use fpane_position::{
    Anchor, AnchorSet, OverflowMode, Position, PositionArgs, PositionMode, RelativeTarget,
};

// --- Runtime re-exports ----------------------------------------------------

pub use fpane_runtime::{
    Action, Completion, ConfigError, Container, ContentLoader, EventContext, HandlerError,
    LifecycleEvent, ListenerId, LoadParams, LoadPoll, LoadSpec, LoadTicket, ManagerConfig,
    MoveParams, PaneManager, PaneSettings, PaneSnapshot, Renderer, ResizeLimits, ResizeParams,
    ResumeToken, RuleSet, Scope, ShowOverrides, ShowParams, Stylesheet,
};

/// Crate-level modules, for callers that need more than the prelude.
pub mod core {
    pub use fpane_core::*;
}

pub mod position {
    pub use fpane_position::*;
}

pub mod runtime {
    pub use fpane_runtime::*;
}

/// Standard result type for FloatPane usage errors.
pub type Result<T> = std::result::Result<T, PaneError>;

/// Everything a host needs to drive panes.
pub mod prelude {
    pub use crate::{
        Bounds, Completion, ContentLoader, ElementId, EventContext, LifecycleEvent, LoadParams,
        LoadPoll, LoadSpec, ManagerConfig, MoveParams, PaneError, PaneId, PaneManager,
        PaneSettings, Point, Renderer, ResizeParams, ShowParams, Size, Stylesheet,
    };
}

/// Error from [`init_tracing`].
#[cfg(feature = "tracing-json")]
pub type TracingInitError = tracing_subscriber::util::TryInitError;

/// Install a global JSON `tracing` subscriber.
///
/// The filter comes from `RUST_LOG`, falling back to `fpane=info`. Every
/// FloatPane target starts with `fpane.`, so `RUST_LOG=fpane.scheduler=debug`
/// narrows output to scheduling decisions.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub fn init_tracing() -> std::result::Result<(), TracingInitError> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fpane=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true),
        )
        .try_init()?;
    tracing::debug!(target: "fpane.scheduler", "json tracing installed");
    Ok(())
}
