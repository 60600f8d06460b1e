#![forbid(unsafe_code)]

//! Move/resize scheduling, usage errors, stacking and the shared backdrop.
//!
//! Run:
//!   cargo test -p fpane-runtime --test geometry

use std::time::Duration;

use fpane_core::{Bounds, PaneError, PaneId, Point, Size};
use fpane_harness::Fixture;
use fpane_position::OverflowMode;
use fpane_runtime::{
    BackdropPhase, LifecycleEvent as E, ManagerConfig, MoveParams, PaneSettings, ResizeLimits,
    ResizeParams, ShowParams,
};
use proptest::prelude::*;

fn show(fx: &mut Fixture, id: &PaneId) {
    fx.manager.show(id, ShowParams::Default, |_| {}).unwrap();
    fx.manager.run_until_idle();
}

fn visible_pane(fx: &mut Fixture, name: &str) -> PaneId {
    let (id, _) = fx.pane(name).unwrap();
    show(fx, &id);
    id
}

// ============================================================================
// Move / resize
// ============================================================================

#[test]
fn move_to_writes_absolute_rules() {
    let mut fx = Fixture::new();
    let id = visible_pane(&mut fx, "menu");
    let el = fx.manager.pane(&id).unwrap().element.unwrap();

    fx.manager
        .move_pane(&id, MoveParams::To(Point::new(40, 25)), fx.callbacks.callback("move"))
        .unwrap();
    fx.manager.run_until_idle();

    assert_eq!(fx.callbacks.result("move"), Some(true));
    assert_eq!(fx.doc.bounds(el), Some(Bounds::new(25, 40, 125, 240)));
    let position = fx.manager.pane(&id).unwrap().position.unwrap();
    assert_eq!(position.bounds(), Bounds::new(25, 40, 125, 240));
    assert_eq!(fx.events.count(&id, E::Move), 1);
    assert_eq!(fx.events.count(&id, E::Moved), 1);
}

#[test]
fn move_by_is_relative_to_current_placement() {
    let mut fx = Fixture::new();
    let id = visible_pane(&mut fx, "menu");

    fx.manager
        .move_pane(&id, MoveParams::To(Point::new(100, 100)), |_| {})
        .unwrap();
    fx.manager.run_until_idle();
    fx.manager
        .move_pane(&id, MoveParams::By { dx: -30, dy: 20 }, |_| {})
        .unwrap();
    fx.manager.run_until_idle();

    let position = fx.manager.pane(&id).unwrap().position.unwrap();
    assert_eq!((position.left, position.top), (70, 120));
}

#[test]
fn back_to_back_moves_resolve_in_order() {
    let mut fx = Fixture::new();
    let id = visible_pane(&mut fx, "menu");

    for (label, x) in [("m1", 10), ("m2", 20), ("m3", 30)] {
        fx.manager
            .move_pane(&id, MoveParams::To(Point::new(x, x)), fx.callbacks.callback(label))
            .unwrap();
    }
    fx.manager.run_until_idle();

    assert_eq!(fx.callbacks.labels(), vec!["m1", "m2", "m3"]);
    assert!(fx.callbacks.entries().iter().all(|(_, ok)| *ok));
    // The third request folded into the queued second one.
    assert_eq!(fx.events.count(&id, E::Moved), 2);
    let position = fx.manager.pane(&id).unwrap().position.unwrap();
    assert_eq!((position.left, position.top), (30, 30));
}

#[test]
fn move_past_viewport_is_shifted_back_inside() {
    let mut fx = Fixture::new();
    let id = visible_pane(&mut fx, "menu");

    fx.manager
        .move_pane(
            &id,
            MoveParams::To(Point::new(5_000, 5_000)),
            fx.callbacks.callback("move"),
        )
        .unwrap();
    fx.manager.run_until_idle();

    let position = fx.manager.pane(&id).unwrap().position.unwrap();
    assert_eq!(position.bounds(), Bounds::new(668, 824, 768, 1024));
    assert_eq!(fx.callbacks.result("move"), Some(true));
}

#[test]
fn move_outside_clip_without_correction_fails() {
    let config = ManagerConfig {
        default_overflow: OverflowMode::Overflow,
        ..ManagerConfig::default()
    };
    let mut fx = Fixture::with_config(config);
    let id = visible_pane(&mut fx, "menu");
    let before = fx.manager.pane(&id).unwrap().position;

    fx.manager
        .move_pane(
            &id,
            MoveParams::To(Point::new(5_000, 5_000)),
            fx.callbacks.callback("move"),
        )
        .unwrap();
    fx.manager.run_until_idle();

    assert_eq!(fx.callbacks.result("move"), Some(false));
    assert_eq!(fx.manager.pane(&id).unwrap().position, before);
    assert!(fx.manager.pane(&id).unwrap().is_visible());
}

#[test]
fn resize_respects_limits() {
    let mut fx = Fixture::new();
    let limits = ResizeLimits {
        max_width: Some(250),
        min_height: Some(80),
        ..ResizeLimits::default()
    };
    let (id, el) = fx
        .pane_with(
            "dialog",
            Size::new(200, 100),
            PaneSettings::default().with_resize_limits(limits),
        )
        .unwrap();
    show(&mut fx, &id);

    fx.manager
        .resize(&id, ResizeParams::To(Size::new(300, 150)), fx.callbacks.callback("grow"))
        .unwrap();
    fx.manager.run_until_idle();
    assert_eq!(fx.doc.bounds(el).map(|b| b.size()), Some(Size::new(250, 150)));

    fx.manager
        .resize(&id, ResizeParams::By { dw: -100, dh: -100 }, fx.callbacks.callback("shrink"))
        .unwrap();
    fx.manager.run_until_idle();
    assert_eq!(fx.doc.bounds(el).map(|b| b.size()), Some(Size::new(150, 80)));

    assert_eq!(fx.callbacks.result("grow"), Some(true));
    assert_eq!(fx.callbacks.result("shrink"), Some(true));
    assert_eq!(fx.events.count(&id, E::Resized), 2);
}

#[test]
fn queued_resizes_fold_and_apply_latest_delta() {
    let mut fx = Fixture::new();
    let id = visible_pane(&mut fx, "dialog");
    let el = fx.manager.pane(&id).unwrap().element.unwrap();

    for (label, dw, dh) in [("r1", 10, 10), ("r2", 20, 0), ("r3", 5, 5)] {
        fx.manager
            .resize(&id, ResizeParams::By { dw, dh }, fx.callbacks.callback(label))
            .unwrap();
    }
    fx.manager.run_until_idle();

    // r1 runs alone; r3 replaced r2's delta and rode on its sequence.
    assert_eq!(fx.doc.bounds(el).map(|b| b.size()), Some(Size::new(215, 115)));
    assert_eq!(fx.callbacks.labels(), vec!["r1", "r2", "r3"]);
    assert!(fx.callbacks.entries().iter().all(|(_, ok)| *ok));
    assert_eq!(fx.events.count(&id, E::Resized), 2);
}

#[test]
fn move_while_showing_waits_for_show() {
    let mut fx = Fixture::new();
    let (id, _) = fx.pane("menu").unwrap();

    fx.manager
        .show(&id, ShowParams::Default, fx.callbacks.callback("show"))
        .unwrap();
    fx.manager
        .move_pane(&id, MoveParams::To(Point::new(50, 60)), fx.callbacks.callback("move"))
        .unwrap();
    fx.manager.run_until_idle();

    assert_eq!(
        fx.callbacks.entries(),
        vec![("show".to_owned(), true), ("move".to_owned(), true)]
    );
    let position = fx.manager.pane(&id).unwrap().position.unwrap();
    assert_eq!((position.left, position.top), (50, 60));
}

#[test]
fn hide_cancels_queued_move() {
    let mut fx = Fixture::new();
    let id = visible_pane(&mut fx, "menu");

    fx.manager
        .move_pane(&id, MoveParams::By { dx: 5, dy: 5 }, fx.callbacks.callback("move"))
        .unwrap();
    fx.manager.hide(&id, fx.callbacks.callback("hide")).unwrap();
    fx.manager.run_until_idle();

    assert_eq!(
        fx.callbacks.entries(),
        vec![("move".to_owned(), false), ("hide".to_owned(), true)]
    );
    assert_eq!(fx.events.count(&id, E::Moved), 0);
}

// ============================================================================
// Usage errors
// ============================================================================

#[test]
fn geometry_on_hidden_pane_is_refused() {
    let mut fx = Fixture::new();
    let (id, _) = fx.pane("menu").unwrap();

    let err = fx
        .manager
        .resize(&id, ResizeParams::To(Size::new(10, 10)), |_| {})
        .unwrap_err();
    assert_eq!(
        err,
        PaneError::NotVisible {
            pane: id.clone(),
            action: "resize"
        }
    );
    assert!(fx.manager.move_pane(&id, MoveParams::By { dx: 1, dy: 1 }, |_| {}).is_err());
}

#[test]
fn geometry_while_hiding_is_illegal() {
    let mut fx = Fixture::new();
    let id = visible_pane(&mut fx, "menu");
    fx.manager.hide(&id, |_| {}).unwrap();

    let err = fx
        .manager
        .move_pane(&id, MoveParams::By { dx: 1, dy: 1 }, |_| {})
        .unwrap_err();
    assert_eq!(
        err,
        PaneError::IllegalState {
            pane: id.clone(),
            action: "move",
            current: "hiding"
        }
    );
    assert_eq!(err.to_string(), "cannot move pane menu while it is hiding");
}

#[test]
fn unknown_and_invalid_ids_are_refused() {
    let mut fx = Fixture::new();
    assert!(matches!(
        fx.manager.show("ghost", ShowParams::Default, |_| {}),
        Err(PaneError::UnknownPane(_))
    ));
    assert!(matches!(
        fx.manager.hide("two words", |_| {}),
        Err(PaneError::InvalidId(_))
    ));
    assert!(matches!(
        fx.manager.register("", PaneSettings::default()),
        Err(PaneError::InvalidId(_))
    ));
}

#[test]
fn duplicate_registration_is_refused() {
    let mut fx = Fixture::new();
    let (id, _) = fx.pane("menu").unwrap();
    assert_eq!(
        fx.manager.register("MENU", PaneSettings::default()),
        Err(PaneError::DuplicatePane(id))
    );
}

// ============================================================================
// Stacking
// ============================================================================

#[test]
fn reshowing_raises_above_others() {
    let mut fx = Fixture::new();
    let a = visible_pane(&mut fx, "a");
    let b = visible_pane(&mut fx, "b");
    assert_eq!(fx.manager.pane(&a).unwrap().z_index, Some(1000));
    assert_eq!(fx.manager.pane(&b).unwrap().z_index, Some(1001));

    show(&mut fx, &a);
    assert_eq!(fx.manager.pane(&a).unwrap().z_index, Some(1002));
    // Already visible: no second load or initialize.
    assert_eq!(fx.events.count(&a, E::Load), 1);
    assert_eq!(fx.events.count(&a, E::Initialize), 1);
    assert_eq!(fx.events.count(&a, E::Shown), 2);
}

#[test]
fn hidden_panes_do_not_hold_depth() {
    let mut fx = Fixture::new();
    let a = visible_pane(&mut fx, "a");
    fx.manager.hide(&a, |_| {}).unwrap();
    fx.manager.run_until_idle();

    let b = visible_pane(&mut fx, "b");
    assert_eq!(fx.manager.pane(&b).unwrap().z_index, Some(1000));
}

proptest! {
    #[test]
    fn sequential_shows_stack_strictly_upward(count in 1usize..8) {
        let mut fx = Fixture::new();
        let mut depths = Vec::new();
        for i in 0..count {
            let id = visible_pane(&mut fx, &format!("pane{i}"));
            depths.push(fx.manager.pane(&id).unwrap().z_index.unwrap());
        }
        for pair in depths.windows(2) {
            prop_assert!(pair[1] > pair[0], "{depths:?}");
        }
    }
}

// ============================================================================
// Backdrop
// ============================================================================

fn modal(fx: &mut Fixture, name: &str) -> PaneId {
    let (id, _) = fx
        .pane_with(name, Size::new(300, 200), PaneSettings::default().with_backdrop(true))
        .unwrap();
    id
}

#[test]
fn backdrop_sits_directly_beneath_its_owner() {
    let mut fx = Fixture::new();
    let _plain = visible_pane(&mut fx, "plain");
    let dialog = modal(&mut fx, "dialog");
    show(&mut fx, &dialog);

    assert_eq!(fx.manager.pane(&dialog).unwrap().z_index, Some(1002));
    assert_eq!(fx.doc.backdrop_z_index(), Some(1001));
    assert_eq!(fx.manager.backdrop().phase(), BackdropPhase::Showing);

    fx.manager.advance(Duration::from_millis(150));
    assert_eq!(fx.manager.backdrop().phase(), BackdropPhase::Shown);
    assert_eq!(fx.doc.backdrop_opacity(), Some(0.6));
}

#[test]
fn backdrop_repoints_to_remaining_owner() {
    let mut fx = Fixture::new();
    let first = modal(&mut fx, "first");
    let second = modal(&mut fx, "second");
    show(&mut fx, &first);
    show(&mut fx, &second);
    fx.manager.advance(Duration::from_millis(150));
    assert_eq!(fx.doc.backdrop_z_index(), Some(1002));

    fx.manager.hide(&second, |_| {}).unwrap();
    fx.manager.run_until_idle();
    assert_eq!(fx.doc.backdrop_z_index(), Some(1000));
    assert_eq!(fx.manager.backdrop().phase(), BackdropPhase::Shown);

    fx.manager.hide(&first, |_| {}).unwrap();
    fx.manager.run_until_idle();
    assert_eq!(fx.manager.backdrop().phase(), BackdropPhase::Hiding);

    fx.manager.advance(Duration::from_millis(150));
    assert_eq!(fx.manager.backdrop().phase(), BackdropPhase::Hidden);
    assert_eq!(fx.doc.backdrop_z_index(), None);
}

#[test]
fn reshow_during_fade_out_reverses_it() {
    let mut fx = Fixture::new();
    let dialog = modal(&mut fx, "dialog");
    show(&mut fx, &dialog);
    fx.manager.advance(Duration::from_millis(150));

    fx.manager.hide(&dialog, |_| {}).unwrap();
    fx.manager.run_until_idle();
    fx.manager.advance(Duration::from_millis(50));
    assert_eq!(fx.manager.backdrop().phase(), BackdropPhase::Hiding);

    show(&mut fx, &dialog);
    assert_eq!(fx.manager.backdrop().phase(), BackdropPhase::Showing);
    assert!(fx.manager.backdrop().is_owner(&dialog));
    fx.manager.advance(Duration::from_millis(150));
    assert_eq!(fx.manager.backdrop().phase(), BackdropPhase::Shown);
}
