#![forbid(unsafe_code)]

//! Collaborator contracts.
//!
//! The scheduler never touches a document directly. It measures, moves and
//! styles elements through [`Renderer`], writes positioned rules through
//! [`Stylesheet`], and obtains content through [`ContentLoader`].

use std::fmt;

use fpane_core::{Bounds, ElementId, LoadError};

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Where an element lives in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    /// Invisible but measurable holding area.
    Staging,
    /// Top layer where visible panes are drawn.
    Overlay,
    /// Not in the render tree.
    Detached,
}

/// Ordered CSS-like declarations (`property`, `value`).
pub type RuleSet = Vec<(String, String)>;

/// Element service.
pub trait Renderer {
    /// Current bounding box, or `None` if the element is not in the render
    /// tree. Elements in [`Container::Staging`] must still report real bounds.
    fn measure(&self, element: ElementId) -> Option<Bounds>;

    /// The area panes are clipped to by default.
    fn viewport(&self) -> Bounds;

    /// Insert a freshly produced element into `container`.
    fn insert(&mut self, element: ElementId, container: Container) -> Result<(), LoadError>;

    /// Move an existing element to another container.
    fn move_to(&mut self, element: ElementId, container: Container);

    fn add_classes(&mut self, element: ElementId, classes: &[String]);

    fn remove_classes(&mut self, element: ElementId, classes: &[String]);

    /// Rendered stacking depth, read from live state.
    fn z_index(&self, element: ElementId) -> Option<i32>;

    /// Remove the element from the document for good.
    fn remove(&mut self, element: ElementId);

    /// Selector that addresses exactly this element in a stylesheet.
    fn selector(&self, element: ElementId) -> String;
}

/// Rule materialization service.
pub trait Stylesheet {
    fn set_rules(&mut self, sheet: &str, selector: &str, rules: &RuleSet);

    fn remove_rules(&mut self, sheet: &str, selector: &str);
}

/// What to load for a pane.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum LoadSpec {
    /// Fetch markup from a URL.
    Url(String),
    /// Resolve a named placeholder.
    Placeholder(String),
}

impl fmt::Display for LoadSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "url:{url}"),
            Self::Placeholder(name) => write!(f, "placeholder:{name}"),
        }
    }
}

/// Handle for a load that completes later through
/// [`PaneManager::resolve_load`](crate::PaneManager::resolve_load).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(pub u64);

/// Outcome of [`ContentLoader::fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPoll {
    /// Content is available now. The vector holds the produced root elements.
    Ready(Result<Vec<ElementId>, LoadError>),
    /// Content will be delivered later under this ticket.
    Pending(LoadTicket),
}

/// Remote content service.
pub trait ContentLoader {
    fn fetch(&mut self, spec: &LoadSpec) -> LoadPoll;
}

/// Validate loader output: exactly one root element.
pub(crate) fn single_element(result: Result<Vec<ElementId>, LoadError>) -> Result<ElementId, LoadError> {
    let elements = result?;
    match elements.as_slice() {
        [one] => Ok(*one),
        [] => Err(LoadError::NoContent),
        many => Err(LoadError::MultipleElements(many.len())),
    }
}
