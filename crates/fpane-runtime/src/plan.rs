#![forbid(unsafe_code)]

//! Step-sequence assembly.
//!
//! Each action expands to `Local(event) → Global(event) → Job` runs built
//! from the pane's flags at the moment the sequence starts. Show implies
//! load and initialize when needed; unload implies hide when visible; hide
//! may trail an unload. [`Step::Complete`] is always last.

use crate::events::LifecycleEvent;
use crate::settings::PaneSettings;
use crate::state::{Action, StateFlags};

/// Unit of work executed by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Job {
    /// Ask the loader for content.
    Fetch,
    /// Suspend until fetched content is available.
    AwaitContent,
    /// Validate and insert the content into the staging area.
    Attach,
    Initialize,
    /// Assign a z-index, claim the backdrop and move to the overlay.
    Reveal,
    /// Run the position engine and write the result.
    Position,
    AwaitShowTransition,
    /// Release the backdrop and start the hide transition.
    Conceal,
    AwaitHideTransition,
    /// Return the element to staging and clear placement rules.
    Detach,
    /// Remove the element from the document.
    Unload,
    Move,
    Resize,
}

/// One entry of a step sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Deliver on the pane's own bus.
    Local(LifecycleEvent),
    /// Deliver on the manager's bus.
    Global(LifecycleEvent),
    Job(Job),
    /// Drain callbacks and start whatever is queued next.
    Complete,
}

fn fire(steps: &mut Vec<Step>, event: LifecycleEvent) {
    steps.push(Step::Local(event));
    steps.push(Step::Global(event));
}

fn load_steps(steps: &mut Vec<Step>) {
    fire(steps, LifecycleEvent::Load);
    steps.push(Step::Job(Job::Fetch));
    steps.push(Step::Job(Job::AwaitContent));
    steps.push(Step::Job(Job::Attach));
    fire(steps, LifecycleEvent::Loaded);
}

fn init_steps(steps: &mut Vec<Step>) {
    fire(steps, LifecycleEvent::Initialize);
    steps.push(Step::Job(Job::Initialize));
}

fn show_steps(steps: &mut Vec<Step>) {
    fire(steps, LifecycleEvent::Show);
    steps.push(Step::Job(Job::Reveal));
    fire(steps, LifecycleEvent::Position);
    steps.push(Step::Job(Job::Position));
    steps.push(Step::Job(Job::AwaitShowTransition));
    fire(steps, LifecycleEvent::Shown);
}

fn hide_steps(steps: &mut Vec<Step>) {
    fire(steps, LifecycleEvent::Hide);
    steps.push(Step::Job(Job::Conceal));
    steps.push(Step::Job(Job::AwaitHideTransition));
    steps.push(Step::Job(Job::Detach));
    fire(steps, LifecycleEvent::Hidden);
}

fn unload_steps(steps: &mut Vec<Step>) {
    fire(steps, LifecycleEvent::Unload);
    steps.push(Step::Job(Job::Unload));
    fire(steps, LifecycleEvent::Unloaded);
}

/// Steps that carry the error event.
pub fn error_steps() -> Vec<Step> {
    vec![
        Step::Local(LifecycleEvent::Error),
        Step::Global(LifecycleEvent::Error),
    ]
}

/// Build the sequence for `action` given the flags at start time.
///
/// `reload` discards existing content first (hiding if visible) and
/// re-shows a pane that was visible.
pub fn assemble(
    action: Action,
    flags: StateFlags,
    settings: &PaneSettings,
    reload: bool,
) -> Vec<Step> {
    let loaded = flags.contains(StateFlags::LOADED);
    let visible = flags.contains(StateFlags::VISIBLE);
    let initialized = flags.contains(StateFlags::INITIALIZED);
    let mut steps = Vec::new();

    match action {
        Action::Load if reload => {
            if visible {
                hide_steps(&mut steps);
            }
            if loaded {
                unload_steps(&mut steps);
            }
            load_steps(&mut steps);
            if visible {
                init_steps(&mut steps);
                show_steps(&mut steps);
            }
        }
        Action::Load => {
            if !loaded {
                load_steps(&mut steps);
            }
        }
        Action::Show => {
            if !loaded {
                load_steps(&mut steps);
            }
            // Unload clears INITIALIZED together with LOADED.
            if !initialized || !loaded {
                init_steps(&mut steps);
            }
            show_steps(&mut steps);
        }
        Action::Hide => {
            if visible {
                hide_steps(&mut steps);
            }
            if settings.unload_on_hide && loaded {
                unload_steps(&mut steps);
            }
        }
        Action::Unload => {
            if visible {
                hide_steps(&mut steps);
            }
            if loaded {
                unload_steps(&mut steps);
            }
        }
        Action::Move => {
            fire(&mut steps, LifecycleEvent::Move);
            steps.push(Step::Job(Job::Move));
            fire(&mut steps, LifecycleEvent::Moved);
        }
        Action::Resize => {
            fire(&mut steps, LifecycleEvent::Resize);
            steps.push(Step::Job(Job::Resize));
            fire(&mut steps, LifecycleEvent::Resized);
        }
        Action::None => {}
    }

    steps.push(Step::Complete);
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleEvent as E;

    fn local_events(steps: &[Step]) -> Vec<LifecycleEvent> {
        steps
            .iter()
            .filter_map(|s| match s {
                Step::Local(e) => Some(*e),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn show_on_fresh_pane_loads_and_initializes() {
        let steps = assemble(Action::Show, StateFlags::empty(), &PaneSettings::default(), false);
        assert_eq!(
            local_events(&steps),
            vec![E::Load, E::Loaded, E::Initialize, E::Show, E::Position, E::Shown]
        );
        assert_eq!(steps.last(), Some(&Step::Complete));
    }

    #[test]
    fn show_on_loaded_pane_skips_load() {
        let flags = StateFlags::LOADED | StateFlags::INITIALIZED;
        let steps = assemble(Action::Show, flags, &PaneSettings::default(), false);
        assert_eq!(local_events(&steps), vec![E::Show, E::Position, E::Shown]);
    }

    #[test]
    fn local_precedes_global_precedes_job() {
        let steps = assemble(Action::Move, StateFlags::VISIBLE, &PaneSettings::default(), false);
        assert_eq!(
            steps,
            vec![
                Step::Local(E::Move),
                Step::Global(E::Move),
                Step::Job(Job::Move),
                Step::Local(E::Moved),
                Step::Global(E::Moved),
                Step::Complete,
            ]
        );
    }

    #[test]
    fn hide_trails_unload_when_configured() {
        let settings = PaneSettings::default().with_unload_on_hide(true);
        let flags = StateFlags::LOADED | StateFlags::VISIBLE | StateFlags::INITIALIZED;
        let steps = assemble(Action::Hide, flags, &settings, false);
        assert_eq!(
            local_events(&steps),
            vec![E::Hide, E::Hidden, E::Unload, E::Unloaded]
        );
    }

    #[test]
    fn unload_hides_first() {
        let flags = StateFlags::LOADED | StateFlags::VISIBLE;
        let steps = assemble(Action::Unload, flags, &PaneSettings::default(), false);
        assert_eq!(
            local_events(&steps),
            vec![E::Hide, E::Hidden, E::Unload, E::Unloaded]
        );
    }

    #[test]
    fn noop_actions_are_just_complete() {
        let s = PaneSettings::default();
        assert_eq!(assemble(Action::Hide, StateFlags::empty(), &s, false), vec![Step::Complete]);
        assert_eq!(assemble(Action::Unload, StateFlags::empty(), &s, false), vec![Step::Complete]);
        assert_eq!(assemble(Action::Load, StateFlags::LOADED, &s, false), vec![Step::Complete]);
    }

    #[test]
    fn reload_of_visible_pane_reshows() {
        let flags = StateFlags::LOADED | StateFlags::VISIBLE | StateFlags::INITIALIZED;
        let steps = assemble(Action::Load, flags, &PaneSettings::default(), true);
        assert_eq!(
            local_events(&steps),
            vec![
                E::Hide,
                E::Hidden,
                E::Unload,
                E::Unloaded,
                E::Load,
                E::Loaded,
                E::Initialize,
                E::Show,
                E::Position,
                E::Shown,
            ]
        );
    }
}
