#![forbid(unsafe_code)]

//! In-memory document implementing [`Renderer`] and [`Stylesheet`].
//!
//! Both services share one [`DocState`], so a test keeps a [`MockDocument`]
//! handle and inspects what the manager wrote. Measurement follows the
//! rules: an element with `top/left/width/height` rules measures there,
//! otherwise at the viewport origin with its intrinsic size. Fixed elements
//! (anchors, reference targets) always measure at their bounds.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use fpane_core::{Bounds, ElementId, LoadError, Point, Size};
use fpane_runtime::{BACKDROP_SELECTOR, Container, Renderer, RuleSet, Stylesheet};

#[derive(Debug, Clone)]
struct ElementState {
    size: Size,
    /// Bounds of an element the panes do not own.
    fixed: Option<Bounds>,
    container: Option<Container>,
    classes: BTreeSet<String>,
}

/// Shared state behind every handle.
#[derive(Debug, Default)]
pub struct DocState {
    viewport: Bounds,
    elements: HashMap<ElementId, ElementState>,
    rules: HashMap<(String, String), RuleSet>,
    next_id: u64,
    removed: Vec<ElementId>,
    reject_inserts: bool,
    rule_writes: usize,
}

impl DocState {
    fn rule(&self, selector: &str, name: &str) -> Option<String> {
        self.rules
            .iter()
            .filter(|((_, sel), _)| sel == selector)
            .find_map(|(_, rules)| {
                rules
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| value.clone())
            })
    }

    fn rule_px(&self, selector: &str, name: &str) -> Option<i32> {
        self.rule(selector, name)?.trim_end_matches("px").parse().ok()
    }
}

fn selector_for(element: ElementId) -> String {
    format!("#fpane-el-{}", element.0)
}

/// Test handle over a shared document.
#[derive(Debug, Clone)]
pub struct MockDocument {
    state: Rc<RefCell<DocState>>,
}

impl MockDocument {
    pub fn new(viewport: Bounds) -> Self {
        Self {
            state: Rc::new(RefCell::new(DocState {
                viewport,
                ..DocState::default()
            })),
        }
    }

    /// A 1024x768 viewport at the origin.
    pub fn desktop() -> Self {
        Self::new(Bounds::from_origin(Point::new(0, 0), Size::new(1024, 768)))
    }

    pub fn renderer(&self) -> DocRenderer {
        DocRenderer {
            state: Rc::clone(&self.state),
        }
    }

    pub fn stylesheet(&self) -> DocStylesheet {
        DocStylesheet {
            state: Rc::clone(&self.state),
        }
    }

    /// A detached element of intrinsic `size`, as a loader would produce.
    pub fn create_element(&self, size: Size) -> ElementId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = ElementId(state.next_id);
        state.elements.insert(
            id,
            ElementState {
                size,
                fixed: None,
                container: None,
                classes: BTreeSet::new(),
            },
        );
        id
    }

    /// A rendered element at fixed bounds (a button, an anchor bar).
    pub fn create_fixed(&self, bounds: Bounds) -> ElementId {
        let id = self.create_element(bounds.size());
        if let Some(el) = self.state.borrow_mut().elements.get_mut(&id) {
            el.fixed = Some(bounds);
        }
        id
    }

    pub fn set_viewport(&self, viewport: Bounds) {
        self.state.borrow_mut().viewport = viewport;
    }

    /// Make every later `insert` fail.
    pub fn reject_inserts(&self, reject: bool) {
        self.state.borrow_mut().reject_inserts = reject;
    }

    pub fn container(&self, element: ElementId) -> Option<Container> {
        self.state
            .borrow()
            .elements
            .get(&element)
            .and_then(|el| el.container)
    }

    pub fn is_attached(&self, element: ElementId) -> bool {
        self.container(element).is_some()
    }

    pub fn classes(&self, element: ElementId) -> Vec<String> {
        self.state
            .borrow()
            .elements
            .get(&element)
            .map(|el| el.classes.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.classes(element).iter().any(|c| c == class)
    }

    /// Rules written for `element` under any sheet.
    pub fn element_rules(&self, element: ElementId) -> Option<RuleSet> {
        let selector = selector_for(element);
        let state = self.state.borrow();
        state
            .rules
            .iter()
            .find(|((_, sel), _)| *sel == selector)
            .map(|(_, rules)| rules.clone())
    }

    pub fn rules(&self, sheet: &str, selector: &str) -> Option<RuleSet> {
        self.state
            .borrow()
            .rules
            .get(&(sheet.to_owned(), selector.to_owned()))
            .cloned()
    }

    pub fn z_index(&self, element: ElementId) -> Option<i32> {
        self.renderer().z_index(element)
    }

    pub fn bounds(&self, element: ElementId) -> Option<Bounds> {
        self.renderer().measure(element)
    }

    pub fn backdrop_z_index(&self) -> Option<i32> {
        self.state
            .borrow()
            .rule(BACKDROP_SELECTOR, "z-index")?
            .parse()
            .ok()
    }

    pub fn backdrop_opacity(&self) -> Option<f64> {
        self.state
            .borrow()
            .rule(BACKDROP_SELECTOR, "opacity")?
            .parse()
            .ok()
    }

    /// Elements removed from the document, in removal order.
    pub fn removed(&self) -> Vec<ElementId> {
        self.state.borrow().removed.clone()
    }

    /// Number of `set_rules` calls seen.
    pub fn rule_writes(&self) -> usize {
        self.state.borrow().rule_writes
    }
}

/// [`Renderer`] half of a [`MockDocument`].
#[derive(Debug, Clone)]
pub struct DocRenderer {
    state: Rc<RefCell<DocState>>,
}

impl Renderer for DocRenderer {
    fn measure(&self, element: ElementId) -> Option<Bounds> {
        let state = self.state.borrow();
        let el = state.elements.get(&element)?;
        if let Some(fixed) = el.fixed {
            return Some(fixed);
        }
        match el.container? {
            Container::Detached => None,
            Container::Staging | Container::Overlay => {
                let selector = selector_for(element);
                let origin = match (
                    state.rule_px(&selector, "left"),
                    state.rule_px(&selector, "top"),
                ) {
                    (Some(left), Some(top)) => Point::new(left, top),
                    _ => state.viewport.origin(),
                };
                let size = Size::new(
                    state.rule_px(&selector, "width").unwrap_or(el.size.width),
                    state.rule_px(&selector, "height").unwrap_or(el.size.height),
                );
                Some(Bounds::from_origin(origin, size))
            }
        }
    }

    fn viewport(&self) -> Bounds {
        self.state.borrow().viewport
    }

    fn insert(&mut self, element: ElementId, container: Container) -> Result<(), LoadError> {
        let mut state = self.state.borrow_mut();
        if state.reject_inserts {
            return Err(LoadError::Construct(format!("insert of {element} rejected")));
        }
        let el = state
            .elements
            .get_mut(&element)
            .ok_or_else(|| LoadError::Construct(format!("{element} does not exist")))?;
        el.container = Some(container);
        Ok(())
    }

    fn move_to(&mut self, element: ElementId, container: Container) {
        if let Some(el) = self.state.borrow_mut().elements.get_mut(&element) {
            el.container = Some(container);
        }
    }

    fn add_classes(&mut self, element: ElementId, classes: &[String]) {
        if let Some(el) = self.state.borrow_mut().elements.get_mut(&element) {
            el.classes.extend(classes.iter().cloned());
        }
    }

    fn remove_classes(&mut self, element: ElementId, classes: &[String]) {
        if let Some(el) = self.state.borrow_mut().elements.get_mut(&element) {
            for class in classes {
                el.classes.remove(class);
            }
        }
    }

    fn z_index(&self, element: ElementId) -> Option<i32> {
        let state = self.state.borrow();
        state.elements.get(&element)?.container?;
        state.rule(&selector_for(element), "z-index")?.parse().ok()
    }

    fn remove(&mut self, element: ElementId) {
        let mut state = self.state.borrow_mut();
        if let Some(el) = state.elements.get_mut(&element) {
            el.container = None;
            el.classes.clear();
            state.removed.push(element);
        }
    }

    fn selector(&self, element: ElementId) -> String {
        selector_for(element)
    }
}

/// [`Stylesheet`] half of a [`MockDocument`].
#[derive(Debug, Clone)]
pub struct DocStylesheet {
    state: Rc<RefCell<DocState>>,
}

impl Stylesheet for DocStylesheet {
    fn set_rules(&mut self, sheet: &str, selector: &str, rules: &RuleSet) {
        let mut state = self.state.borrow_mut();
        state.rule_writes += 1;
        state
            .rules
            .insert((sheet.to_owned(), selector.to_owned()), rules.clone());
    }

    fn remove_rules(&mut self, sheet: &str, selector: &str) {
        self.state
            .borrow_mut()
            .rules
            .remove(&(sheet.to_owned(), selector.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_element_measures_at_origin() {
        let doc = MockDocument::desktop();
        let el = doc.create_element(Size::new(100, 40));
        assert_eq!(doc.bounds(el), None);

        doc.renderer().insert(el, Container::Staging).unwrap();
        assert_eq!(doc.bounds(el), Some(Bounds::new(0, 0, 40, 100)));
    }

    #[test]
    fn rules_drive_measurement_and_depth() {
        let doc = MockDocument::desktop();
        let el = doc.create_element(Size::new(100, 40));
        doc.renderer().insert(el, Container::Overlay).unwrap();
        let rules = vec![
            ("z-index".to_owned(), "1003".to_owned()),
            ("top".to_owned(), "10px".to_owned()),
            ("left".to_owned(), "20px".to_owned()),
            ("width".to_owned(), "50px".to_owned()),
            ("height".to_owned(), "30px".to_owned()),
        ];
        doc.stylesheet().set_rules("fpane", &selector_for(el), &rules);
        assert_eq!(doc.bounds(el), Some(Bounds::new(10, 20, 40, 70)));
        assert_eq!(doc.z_index(el), Some(1003));

        doc.stylesheet().remove_rules("fpane", &selector_for(el));
        assert_eq!(doc.z_index(el), None);
    }

    #[test]
    fn removed_elements_stop_measuring() {
        let doc = MockDocument::desktop();
        let el = doc.create_element(Size::new(10, 10));
        let mut renderer = doc.renderer();
        renderer.insert(el, Container::Staging).unwrap();
        renderer.remove(el);
        assert_eq!(doc.bounds(el), None);
        assert_eq!(doc.removed(), vec![el]);
    }

    #[test]
    fn rejected_insert_is_a_construct_error() {
        let doc = MockDocument::desktop();
        let el = doc.create_element(Size::new(10, 10));
        doc.reject_inserts(true);
        assert!(matches!(
            doc.renderer().insert(el, Container::Staging),
            Err(LoadError::Construct(_))
        ));
    }
}
