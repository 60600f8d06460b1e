#![forbid(unsafe_code)]

//! Job bodies: the only places a sequence touches the collaborators.

use fpane_core::{Bounds, ElementId, LoadError, PaneId};
use fpane_position::{Position, PositionMode, calculate, calculate_auto};

use crate::args::OperationArgs;
use crate::collab::{Container, LoadPoll, RuleSet, single_element};
use crate::plan::Job;
use crate::session::SessionId;
use crate::state::{StateFlags, Wait};
use crate::zorder;

use super::PaneManager;
use super::timers::TimerKind;

/// Result of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum JobOutcome {
    Done,
    Suspend(Wait),
    Failed(LoadError),
}

fn px(value: i32) -> String {
    format!("{value}px")
}

/// Stylesheet rules for a placement.
///
/// Class and insert placements keep their flow geometry and only stack.
fn placement_rules(position: &Position) -> RuleSet {
    let mut rules = vec![("z-index".to_owned(), position.z_index.to_string())];
    if !matches!(position.mode, PositionMode::Class | PositionMode::Insert) {
        let size = position.size();
        rules.extend([
            ("position".to_owned(), "absolute".to_owned()),
            ("top".to_owned(), px(position.top)),
            ("left".to_owned(), px(position.left)),
            ("width".to_owned(), px(size.width)),
            ("height".to_owned(), px(size.height)),
        ]);
    }
    rules
}

impl PaneManager {
    pub(super) fn run_job(&mut self, id: &PaneId, op: SessionId, job: Job) -> JobOutcome {
        match job {
            Job::Fetch => self.fetch(id),
            Job::AwaitContent => self.await_content(id),
            Job::Attach => self.attach(id),
            Job::Initialize => {
                if let Some(record) = self.panes.get_mut(id) {
                    record.flags.insert(StateFlags::INITIALIZED);
                }
                JobOutcome::Done
            }
            Job::Reveal => self.reveal(id),
            Job::Position => self.position(id),
            Job::AwaitShowTransition => {
                let delay = self
                    .panes
                    .get(id)
                    .filter(|r| r.revealed_now)
                    .map(|r| r.settings.show_transition());
                self.await_transition(id, delay)
            }
            Job::Conceal => self.conceal(id),
            Job::AwaitHideTransition => {
                let delay = self.panes.get(id).map(|r| r.settings.hide_transition());
                self.await_transition(id, delay)
            }
            Job::Detach => {
                self.detach(id);
                JobOutcome::Done
            }
            Job::Unload => {
                self.unload_content(id);
                JobOutcome::Done
            }
            Job::Move => self.move_job(id, op),
            Job::Resize => self.resize_job(id, op),
        }
    }

    fn fetch(&mut self, id: &PaneId) -> JobOutcome {
        let Some(record) = self.panes.get_mut(id) else {
            return JobOutcome::Done;
        };
        if record.content.is_some() {
            return JobOutcome::Done;
        }
        let spec = record
            .last_load_args
            .as_ref()
            .and_then(|args| args.spec.clone())
            .or_else(|| record.settings.load.clone());
        let Some(spec) = spec else {
            return JobOutcome::Failed(LoadError::NoContent);
        };

        tracing::debug!(target: "fpane.scheduler", pane = %id, %spec, "fetching content");
        match self.loader.fetch(&spec) {
            LoadPoll::Ready(result) => record.content = Some(result),
            LoadPoll::Pending(ticket) => {
                record.ticket = Some(ticket);
                self.pending_loads
                    .insert(ticket, (id.clone(), record.generation));
            }
        }
        JobOutcome::Done
    }

    fn await_content(&mut self, id: &PaneId) -> JobOutcome {
        let Some(record) = self.panes.get(id) else {
            return JobOutcome::Done;
        };
        match (&record.content, record.ticket) {
            (Some(_), _) => JobOutcome::Done,
            (None, Some(ticket)) => JobOutcome::Suspend(Wait::Content(ticket)),
            (None, None) => JobOutcome::Failed(LoadError::NoContent),
        }
    }

    fn attach(&mut self, id: &PaneId) -> JobOutcome {
        let Some(record) = self.panes.get_mut(id) else {
            return JobOutcome::Done;
        };
        let content = record.content.take().unwrap_or(Err(LoadError::NoContent));
        let element = match single_element(content) {
            Ok(el) => el,
            Err(err) => return JobOutcome::Failed(err),
        };
        if let Err(err) = self.renderer.insert(element, Container::Staging) {
            return JobOutcome::Failed(err);
        }
        record.element = Some(element);
        record.flags.insert(StateFlags::LOADED);
        tracing::debug!(target: "fpane.scheduler", pane = %id, %element, "content attached");
        JobOutcome::Done
    }

    /// Bring the pane to the front, claim the backdrop and move it to the
    /// overlay.
    fn reveal(&mut self, id: &PaneId) -> JobOutcome {
        let others: Vec<ElementId> = self
            .panes
            .values()
            .filter(|r| &r.id != id)
            .filter_map(|r| r.element)
            .collect();
        let next = zorder::next_z_index(self.renderer.as_ref(), others, self.config.base_z_index);

        let Some(record) = self.panes.get_mut(id) else {
            return JobOutcome::Done;
        };
        let Some(element) = record.element else {
            return JobOutcome::Failed(LoadError::NoContent);
        };
        let (z, backdrop_z) = zorder::reserve(next, record.settings.backdrop);
        let newly = !record.flags.contains(StateFlags::VISIBLE);

        if let Some(backdrop_z) = backdrop_z {
            self.backdrop.show(id.clone(), backdrop_z);
            record.owns_backdrop = true;
        }
        if newly {
            self.renderer.move_to(element, Container::Overlay);
            self.renderer.add_classes(element, &record.settings.class_names);
        }
        let selector = self.renderer.selector(element);
        let rules = vec![("z-index".to_owned(), z.to_string())];
        self.stylesheet
            .set_rules(&self.config.stylesheet, &selector, &rules);

        record.z_index = Some(z);
        record.revealed_now = newly;
        record.flags.insert(StateFlags::VISIBLE);
        tracing::debug!(
            target: "fpane.scheduler",
            pane = %id,
            z_index = z,
            backdrop_z_index = ?backdrop_z,
            "pane revealed"
        );
        if backdrop_z.is_some() {
            self.sync_backdrop();
        }
        JobOutcome::Done
    }

    fn position(&mut self, id: &PaneId) -> JobOutcome {
        let Some(record) = self.panes.get(id) else {
            return JobOutcome::Done;
        };
        let Some(element) = record.element else {
            return JobOutcome::Failed(LoadError::NoContent);
        };
        let show = record
            .last_show_args
            .clone()
            .unwrap_or_else(|| record.settings.show.clone());
        let z = record.z_index.unwrap_or(self.config.base_z_index);
        let args = show.to_position_args(
            self.renderer.as_ref(),
            self.config.default_overflow,
            self.config.clip_margin,
            z,
        );
        let Some(current) = self.renderer.measure(element) else {
            tracing::debug!(target: "fpane.position", pane = %id, "pane not measurable; left unpositioned");
            return JobOutcome::Done;
        };

        match calculate_auto(&args, current) {
            Some(position) => self.apply_position(id, element, position),
            None => {
                tracing::debug!(target: "fpane.position", pane = %id, "no placement; left unpositioned");
            }
        }
        JobOutcome::Done
    }

    /// Write a placement and remember it.
    fn apply_position(&mut self, id: &PaneId, element: ElementId, position: Position) {
        let Some(record) = self.panes.get_mut(id) else {
            return;
        };
        let selector = self.renderer.selector(element);
        self.stylesheet
            .set_rules(&self.config.stylesheet, &selector, &placement_rules(&position));
        if !record.position_classes.is_empty() {
            self.renderer
                .remove_classes(element, &record.position_classes);
        }
        if !position.class_names.is_empty() {
            self.renderer.add_classes(element, &position.class_names);
        }
        tracing::debug!(
            target: "fpane.position",
            pane = %id,
            mode = %position.mode,
            top = position.top,
            left = position.left,
            bottom = position.bottom,
            right = position.right,
            "pane positioned"
        );
        record.position_classes = position.class_names.clone();
        record.last_position = Some(position);
        record.flags.insert(StateFlags::POSITIONED);
    }

    fn await_transition(
        &mut self,
        id: &PaneId,
        delay: Option<web_time::Duration>,
    ) -> JobOutcome {
        let Some(delay) = delay.filter(|d| !d.is_zero()) else {
            return JobOutcome::Done;
        };
        let Some(record) = self.panes.get(id) else {
            return JobOutcome::Done;
        };
        let kind = TimerKind::TransitionDone {
            pane: id.clone(),
            generation: record.generation,
        };
        self.timers.schedule(self.now.saturating_add(delay), kind);
        JobOutcome::Suspend(Wait::Transition)
    }

    fn conceal(&mut self, id: &PaneId) -> JobOutcome {
        let Some(record) = self.panes.get_mut(id) else {
            return JobOutcome::Done;
        };
        if std::mem::take(&mut record.owns_backdrop) {
            let release = self.backdrop.hide(id);
            tracing::debug!(target: "fpane.backdrop", pane = %id, ?release, "backdrop released");
            self.sync_backdrop();
        }
        JobOutcome::Done
    }

    /// Return the element to staging and drop its placement.
    fn detach(&mut self, id: &PaneId) {
        let Some(record) = self.panes.get_mut(id) else {
            return;
        };
        if let Some(element) = record.element {
            let container = if self.config.stage_hidden {
                Container::Staging
            } else {
                Container::Detached
            };
            self.renderer.move_to(element, container);
            let selector = self.renderer.selector(element);
            self.stylesheet
                .remove_rules(&self.config.stylesheet, &selector);
            let mut classes = std::mem::take(&mut record.position_classes);
            classes.extend(record.settings.class_names.iter().cloned());
            if !classes.is_empty() {
                self.renderer.remove_classes(element, &classes);
            }
        }
        record.flags.remove(StateFlags::VISIBLE | StateFlags::POSITIONED);
        record.z_index = None;
        record.last_position = None;
        record.revealed_now = false;
    }

    fn unload_content(&mut self, id: &PaneId) {
        let Some(record) = self.panes.get_mut(id) else {
            return;
        };
        if let Some(element) = record.element.take() {
            self.renderer.remove(element);
            tracing::debug!(target: "fpane.scheduler", pane = %id, %element, "content removed");
        }
        record.content = None;
        record.flags.remove(StateFlags::LOADED | StateFlags::INITIALIZED);
    }

    /// Leave the pane unloaded and hidden after a collaborator failure.
    pub(super) fn rollback(&mut self, id: &PaneId) {
        let owned = self
            .panes
            .get_mut(id)
            .is_some_and(|r| std::mem::take(&mut r.owns_backdrop));
        if owned {
            self.backdrop.release_now(id);
            self.sync_backdrop();
        }
        self.detach(id);
        self.unload_content(id);
        if let Some(record) = self.panes.get_mut(id) {
            record.ticket = None;
        }
    }

    fn move_job(&mut self, id: &PaneId, op: SessionId) -> JobOutcome {
        let Some(OperationArgs::Move(params)) = self.sessions.get(op).map(|s| s.args.clone()) else {
            return JobOutcome::Done;
        };
        let Some(record) = self.panes.get(id) else {
            return JobOutcome::Done;
        };
        let Some(element) = record.element else {
            return JobOutcome::Done;
        };
        let Some(current) = self.current_bounds(id, element) else {
            return JobOutcome::Done;
        };
        let show = record
            .last_show_args
            .clone()
            .unwrap_or_else(|| record.settings.show.clone());
        let z = record.z_index.unwrap_or(self.config.base_z_index);

        let mut args = show.to_position_args(
            self.renderer.as_ref(),
            self.config.default_overflow,
            self.config.clip_margin,
            z,
        );
        args.absolute = params.target(current);
        args.offset = Default::default();

        match calculate(PositionMode::Absolute, &args, current) {
            Some(position) => {
                self.apply_position(id, element, position);
                self.mark_applied(op);
            }
            None => {
                tracing::debug!(target: "fpane.position", pane = %id, ?params, "move target outside clip bounds");
            }
        }
        JobOutcome::Done
    }

    /// Apply the resize recorded when the sequence started.
    fn resize_job(&mut self, id: &PaneId, op: SessionId) -> JobOutcome {
        let Some(record) = self.panes.get(id) else {
            return JobOutcome::Done;
        };
        let Some(params) = record.last_resize_args else {
            return JobOutcome::Done;
        };
        let Some(element) = record.element else {
            return JobOutcome::Done;
        };
        let Some(current) = self.current_bounds(id, element) else {
            return JobOutcome::Done;
        };
        let base = record.last_position.clone().unwrap_or_else(|| Position {
            mode: PositionMode::Absolute,
            top: current.top,
            left: current.left,
            bottom: current.bottom,
            right: current.right,
            z_index: record.z_index.unwrap_or(self.config.base_z_index),
            ..Position::default()
        });
        let size = record.settings.resize.clamp(params.target(current.size()));
        self.apply_position(id, element, base.resized(size));
        self.mark_applied(op);
        JobOutcome::Done
    }

    /// Last written placement, else what the renderer measures.
    fn current_bounds(&self, id: &PaneId, element: ElementId) -> Option<Bounds> {
        self.panes
            .get(id)
            .and_then(|r| r.last_position.as_ref())
            .map(Position::bounds)
            .or_else(|| self.renderer.measure(element))
    }

    fn mark_applied(&mut self, op: SessionId) {
        if let Some(session) = self.sessions.get_mut(op) {
            session.applied = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_rules_carry_geometry() {
        let position = Position {
            mode: PositionMode::Absolute,
            top: 10,
            left: 20,
            bottom: 50,
            right: 120,
            z_index: 1001,
            ..Position::default()
        };
        let rules = placement_rules(&position);
        assert!(rules.contains(&("top".to_owned(), "10px".to_owned())));
        assert!(rules.contains(&("width".to_owned(), "100px".to_owned())));
        assert!(rules.contains(&("height".to_owned(), "40px".to_owned())));
        assert_eq!(rules[0], ("z-index".to_owned(), "1001".to_owned()));
    }

    #[test]
    fn flow_placements_only_stack() {
        let position = Position {
            mode: PositionMode::Insert,
            z_index: 7,
            ..Position::default()
        };
        assert_eq!(
            placement_rules(&position),
            vec![("z-index".to_owned(), "7".to_owned())]
        );
    }
}
