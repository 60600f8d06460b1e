#![forbid(unsafe_code)]

//! Stacking order.

use fpane_core::ElementId;

use crate::collab::Renderer;

/// One above the highest rendered z-index among `elements`, and at least `base`.
///
/// Depths are read from the renderer each time, never cached, so panes
/// restyled outside the manager still stack correctly.
pub fn next_z_index<I>(renderer: &dyn Renderer, elements: I, base: i32) -> i32
where
    I: IntoIterator<Item = ElementId>,
{
    elements
        .into_iter()
        .filter_map(|el| renderer.z_index(el))
        .map(|z| z.saturating_add(1))
        .fold(base, i32::max)
}

/// Depths for a pane shown at `next`: `(pane, backdrop)`.
///
/// With a backdrop the pane takes `next + 1` and leaves `next` for the
/// backdrop, directly beneath it.
pub fn reserve(next: i32, backdrop: bool) -> (i32, Option<i32>) {
    if backdrop {
        (next.saturating_add(1), Some(next))
    } else {
        (next, None)
    }
}
