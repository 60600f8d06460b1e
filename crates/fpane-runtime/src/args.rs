#![forbid(unsafe_code)]

//! Per-operation parameters.
//!
//! Each public operation takes one small tagged union. Show parameters are
//! merged field by field with the pane's stored defaults by [`resolve_show`];
//! the result ([`ShowArgs`]) is what the position job turns into
//! [`PositionArgs`] after measuring the referenced elements.

use fpane_core::{Align, Bounds, ElementId, Orientation, Point, RelativeAlign, Sides, Size};
use fpane_position::{Anchor, AnchorSet, OverflowMode, PositionArgs, RelativeTarget};

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::collab::{LoadSpec, Renderer};
use crate::state::Action;

/// What a relatively positioned pane opens next to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum RelativeTo {
    Point(Point),
    Element(ElementId),
}

/// Elements bounding each side of an anchored pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct AnchorTargets {
    pub top: Option<ElementId>,
    pub left: Option<ElementId>,
    pub bottom: Option<ElementId>,
    pub right: Option<ElementId>,
}

impl AnchorTargets {
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.left.is_none() && self.bottom.is_none() && self.right.is_none()
    }

    /// Measure each anchor. Elements outside the render tree are detached.
    fn measure(&self, renderer: &dyn Renderer) -> AnchorSet {
        let anchor = |el: Option<ElementId>| {
            el.map(|el| match renderer.measure(el) {
                Some(bounds) => Anchor::new(bounds),
                None => Anchor::detached(Bounds::default()),
            })
        };
        AnchorSet {
            top: anchor(self.top),
            left: anchor(self.left),
            bottom: anchor(self.bottom),
            right: anchor(self.right),
        }
    }
}

/// Fully resolved show settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ShowArgs {
    pub class_names: Vec<String>,
    pub absolute: Point,
    pub relative_to: Option<RelativeTo>,
    pub orientation: Orientation,
    pub relative_align: RelativeAlign,
    pub anchors: AnchorTargets,
    pub align_x: Align,
    pub align_y: Align,
    pub insert: bool,
    pub fullscreen: bool,
    pub center: bool,
    /// `None` uses the manager default.
    pub overflow: Option<OverflowMode>,
    pub scroll_on_clip: bool,
    /// `None` clips to the viewport.
    pub clip_bounds: Option<Bounds>,
    pub offset: Point,
}

impl ShowArgs {
    /// Measure referenced elements and build engine input.
    pub fn to_position_args(
        &self,
        renderer: &dyn Renderer,
        default_overflow: OverflowMode,
        margin: Sides,
        z_index: i32,
    ) -> PositionArgs {
        let relative = self.relative_to.map(|target| match target {
            RelativeTo::Point(p) => RelativeTarget::Point(p),
            RelativeTo::Element(el) => RelativeTarget::Element(renderer.measure(el)),
        });
        PositionArgs {
            class_names: self.class_names.clone(),
            absolute: self.absolute,
            relative,
            orientation: self.orientation,
            relative_align: self.relative_align,
            anchors: self.anchors.measure(renderer),
            align_x: self.align_x,
            align_y: self.align_y,
            insert: self.insert,
            fullscreen: self.fullscreen,
            center: self.center,
            overflow: self.overflow.unwrap_or(default_overflow),
            scroll_on_clip: self.scroll_on_clip,
            clip_bounds: self.clip_bounds.unwrap_or_else(|| renderer.viewport()),
            margin,
            offset: self.offset,
            z_index,
        }
    }
}

/// Caller overrides; `None` keeps the stored default.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShowOverrides {
    pub class_names: Option<Vec<String>>,
    pub absolute: Option<Point>,
    pub relative_to: Option<RelativeTo>,
    pub orientation: Option<Orientation>,
    pub relative_align: Option<RelativeAlign>,
    pub anchors: Option<AnchorTargets>,
    pub align_x: Option<Align>,
    pub align_y: Option<Align>,
    pub insert: Option<bool>,
    pub fullscreen: Option<bool>,
    pub center: Option<bool>,
    pub overflow: Option<OverflowMode>,
    pub scroll_on_clip: Option<bool>,
    pub clip_bounds: Option<Bounds>,
    pub offset: Option<Point>,
}

/// Parameters of `show`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ShowParams {
    /// Stored defaults.
    #[default]
    Default,
    /// Absolute top-left.
    At(Point),
    /// Next to an element.
    RelativeTo(ElementId),
    /// Bounded by anchor elements.
    Anchored(AnchorTargets),
    Custom(ShowOverrides),
}

impl From<Point> for ShowParams {
    fn from(value: Point) -> Self {
        Self::At(value)
    }
}

impl From<ElementId> for ShowParams {
    fn from(value: ElementId) -> Self {
        Self::RelativeTo(value)
    }
}

impl From<ShowOverrides> for ShowParams {
    fn from(value: ShowOverrides) -> Self {
        Self::Custom(value)
    }
}

/// Merge stored defaults with caller parameters.
///
/// Shorthand variants replace the placement strategy outright: `At` clears
/// any relative target, `RelativeTo` clears the absolute point.
pub fn resolve_show(defaults: &ShowArgs, params: ShowParams) -> ShowArgs {
    let mut out = defaults.clone();
    match params {
        ShowParams::Default => {}
        ShowParams::At(point) => {
            out.absolute = point;
            out.relative_to = None;
        }
        ShowParams::RelativeTo(el) => {
            out.absolute = Point::default();
            out.relative_to = Some(RelativeTo::Element(el));
        }
        ShowParams::Anchored(anchors) => {
            out.absolute = Point::default();
            out.relative_to = None;
            out.anchors = anchors;
        }
        ShowParams::Custom(o) => {
            if let Some(v) = o.class_names {
                out.class_names = v;
            }
            if let Some(v) = o.absolute {
                out.absolute = v;
            }
            if let Some(v) = o.relative_to {
                out.relative_to = Some(v);
            }
            if let Some(v) = o.orientation {
                out.orientation = v;
            }
            if let Some(v) = o.relative_align {
                out.relative_align = v;
            }
            if let Some(v) = o.anchors {
                out.anchors = v;
            }
            if let Some(v) = o.align_x {
                out.align_x = v;
            }
            if let Some(v) = o.align_y {
                out.align_y = v;
            }
            if let Some(v) = o.insert {
                out.insert = v;
            }
            if let Some(v) = o.fullscreen {
                out.fullscreen = v;
            }
            if let Some(v) = o.center {
                out.center = v;
            }
            if let Some(v) = o.overflow {
                out.overflow = Some(v);
            }
            if let Some(v) = o.scroll_on_clip {
                out.scroll_on_clip = v;
            }
            if let Some(v) = o.clip_bounds {
                out.clip_bounds = Some(v);
            }
            if let Some(v) = o.offset {
                out.offset = v;
            }
        }
    }
    out
}

/// Parameters of `load`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadParams {
    #[default]
    Default,
    /// Discard current content and load again.
    Reload,
    /// Load from a specific source instead of the configured one.
    Spec(LoadSpec),
}

/// Resolved load settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadArgs {
    pub spec: Option<LoadSpec>,
    pub reload: bool,
}

impl LoadArgs {
    pub fn resolve(configured: Option<&LoadSpec>, params: &LoadParams) -> Self {
        match params {
            LoadParams::Default => Self {
                spec: configured.cloned(),
                reload: false,
            },
            LoadParams::Reload => Self {
                spec: configured.cloned(),
                reload: true,
            },
            LoadParams::Spec(spec) => Self {
                spec: Some(spec.clone()),
                reload: false,
            },
        }
    }
}

/// Parameters of `move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveParams {
    By { dx: i32, dy: i32 },
    To(Point),
}

impl MoveParams {
    /// New top-left for a pane currently at `bounds`.
    pub fn target(self, bounds: Bounds) -> Point {
        match self {
            Self::By { dx, dy } => {
                Point::new(bounds.left.saturating_add(dx), bounds.top.saturating_add(dy))
            }
            Self::To(p) => p,
        }
    }
}

/// Parameters of `resize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeParams {
    By { dw: i32, dh: i32 },
    To(Size),
}

impl ResizeParams {
    /// Requested size for a pane currently `size`, before limits.
    pub fn target(self, size: Size) -> Size {
        match self {
            Self::By { dw, dh } => {
                Size::new(size.width.saturating_add(dw), size.height.saturating_add(dh))
            }
            Self::To(s) => s,
        }
    }
}

/// Per-operation payload stored on a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationArgs {
    Show(ShowArgs),
    Hide,
    Load(LoadArgs),
    Unload,
    Move(MoveParams),
    Resize(ResizeParams),
}

impl OperationArgs {
    /// The lifecycle action these arguments belong to.
    pub fn action(&self) -> Action {
        match self {
            Self::Show(_) => Action::Show,
            Self::Hide => Action::Hide,
            Self::Load(_) => Action::Load,
            Self::Unload => Action::Unload,
            Self::Move(_) => Action::Move,
            Self::Resize(_) => Action::Resize,
        }
    }

    /// A forced reload.
    pub fn is_reload(&self) -> bool {
        matches!(self, Self::Load(LoadArgs { reload: true, .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> ShowArgs {
        ShowArgs {
            center: true,
            relative_to: Some(RelativeTo::Point(Point::new(3, 4))),
            offset: Point::new(1, 1),
            ..ShowArgs::default()
        }
    }

    #[test]
    fn default_params_keep_defaults() {
        assert_eq!(resolve_show(&defaults(), ShowParams::Default), defaults());
    }

    #[test]
    fn at_replaces_relative_target() {
        let r = resolve_show(&defaults(), ShowParams::At(Point::new(50, 60)));
        assert_eq!(r.absolute, Point::new(50, 60));
        assert!(r.relative_to.is_none());
        assert!(r.center);
    }

    #[test]
    fn relative_to_clears_absolute() {
        let base = ShowArgs {
            absolute: Point::new(9, 9),
            ..ShowArgs::default()
        };
        let r = resolve_show(&base, ElementId(4).into());
        assert_eq!(r.absolute, Point::default());
        assert_eq!(r.relative_to, Some(RelativeTo::Element(ElementId(4))));
    }

    #[test]
    fn overrides_merge_field_by_field() {
        let r = resolve_show(
            &defaults(),
            ShowOverrides {
                overflow: Some(OverflowMode::Clip),
                center: Some(false),
                ..ShowOverrides::default()
            }
            .into(),
        );
        assert_eq!(r.overflow, Some(OverflowMode::Clip));
        assert!(!r.center);
        assert_eq!(r.offset, Point::new(1, 1));
        assert_eq!(r.relative_to, Some(RelativeTo::Point(Point::new(3, 4))));
    }

    #[test]
    fn load_args_resolution() {
        let configured = LoadSpec::Url("/a".into());
        let a = LoadArgs::resolve(Some(&configured), &LoadParams::Default);
        assert_eq!(a.spec, Some(configured.clone()));
        assert!(!a.reload);
        assert!(LoadArgs::resolve(Some(&configured), &LoadParams::Reload).reload);
        let b = LoadArgs::resolve(None, &LoadParams::Spec(LoadSpec::Placeholder("x".into())));
        assert_eq!(b.spec, Some(LoadSpec::Placeholder("x".into())));
    }

    #[test]
    fn move_and_resize_targets() {
        let b = Bounds::new(10, 20, 50, 120);
        assert_eq!(MoveParams::By { dx: 5, dy: -5 }.target(b), Point::new(25, 5));
        assert_eq!(MoveParams::To(Point::new(1, 2)).target(b), Point::new(1, 2));
        assert_eq!(
            ResizeParams::By { dw: 10, dh: 0 }.target(b.size()),
            Size::new(110, 40)
        );
    }

    #[test]
    fn extreme_deltas_saturate() {
        let b = Bounds::new(10, 20, 50, 120);
        assert_eq!(
            MoveParams::By { dx: i32::MAX, dy: i32::MAX }.target(b),
            Point::new(i32::MAX, i32::MAX)
        );
        assert_eq!(
            ResizeParams::By { dw: i32::MAX, dh: i32::MAX }.target(b.size()),
            Size::new(i32::MAX, i32::MAX)
        );
    }
}
