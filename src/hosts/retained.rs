//! An in-memory page: rendered templates become shared element records that
//! a host can draw, measure and deliver events to.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::types::control::{ControlRole, Trigger};
use crate::types::error::PlayerError;
use crate::ui::page::{Control, Listener, MediaSurface, Page};
use crate::ui::template::{Node, Template};

struct ElementState {
    tag: &'static str,
    classes: Vec<&'static str>,
    role: Option<ControlRole>,
    attrs: Vec<(&'static str, String)>,
    text: String,
    styles: BTreeMap<String, String>,
    width: f64,
    listeners: Vec<(Trigger, Listener)>,
}

#[derive(Clone)]
pub struct RetainedElement(Rc<RefCell<ElementState>>);

impl RetainedElement {
    fn from_node(node: &Node) -> Self {
        RetainedElement(Rc::new(RefCell::new(ElementState {
            tag: node.tag,
            classes: node.classes.clone(),
            role: node.role,
            attrs: node.attrs.clone(),
            text: node.text.clone().unwrap_or_default(),
            styles: BTreeMap::new(),
            width: 0.0,
            listeners: Vec::new(),
        })))
    }

    pub fn tag(&self) -> &'static str {
        self.0.borrow().tag
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| *c == class)
    }

    pub fn role(&self) -> Option<ControlRole> {
        self.0.borrow().role
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.0
            .borrow()
            .attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.clone())
    }

    pub fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.0.borrow().styles.get(property).cloned()
    }

    /// Records the width the host laid this element out at.
    pub fn set_width(&self, width: f64) {
        self.0.borrow_mut().width = width;
    }

    pub fn listener_count(&self) -> usize {
        self.0.borrow().listeners.len()
    }

    /// Calls every listener registered for `trigger`. Returns how many ran.
    pub fn fire(&self, trigger: Trigger, offset_x: f64) -> usize {
        // Listeners may write back to this element, so release it first.
        let listeners: Vec<Listener> = self
            .0
            .borrow()
            .listeners
            .iter()
            .filter(|(t, _)| *t == trigger)
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in &listeners {
            listener(offset_x);
        }
        listeners.len()
    }
}

impl fmt::Debug for RetainedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0.borrow();
        f.debug_struct("RetainedElement")
            .field("tag", &state.tag)
            .field("classes", &state.classes)
            .field("role", &state.role)
            .field("text", &state.text)
            .field("styles", &state.styles)
            .field("width", &state.width)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl Control for RetainedElement {
    fn width(&self) -> f64 {
        self.0.borrow().width
    }

    fn set_text(&self, text: &str) {
        self.0.borrow_mut().text = text.to_string();
    }

    fn set_style(&self, property: &str, value: &str) {
        self.0
            .borrow_mut()
            .styles
            .insert(property.to_string(), value.to_string());
    }
}

/// One rendered copy of the template.
#[derive(Debug)]
pub struct Instance<S> {
    pub elements: Vec<RetainedElement>,
    pub surface: S,
}

impl<S> Instance<S> {
    pub fn element(&self, role: ControlRole) -> Option<&RetainedElement> {
        self.elements.iter().find(|e| e.role() == Some(role))
    }
}

#[derive(Debug)]
struct MountPoint<S> {
    selector: String,
    /// Newest first, as inserting at the start of the container does.
    instances: Vec<Instance<S>>,
}

/// Mount points addressed by exact selector.
///
/// Each inserted template loads its media surface from the video source
/// through the page's loader.
pub struct RetainedPage<S> {
    mounts: Vec<MountPoint<S>>,
    loader: Box<dyn Fn(&str) -> S>,
}

impl<S: MediaSurface + Clone> RetainedPage<S> {
    pub fn new(loader: impl Fn(&str) -> S + 'static) -> Self {
        Self {
            mounts: Vec::new(),
            loader: Box::new(loader),
        }
    }

    pub fn with_mount(mut self, selector: &str) -> Self {
        self.add_mount(selector);
        self
    }

    pub fn add_mount(&mut self, selector: &str) {
        if self.mount(selector).is_none() {
            self.mounts.push(MountPoint {
                selector: selector.to_string(),
                instances: Vec::new(),
            });
        }
    }

    fn mount(&self, selector: &str) -> Option<&MountPoint<S>> {
        self.mounts.iter().find(|m| m.selector == selector)
    }

    pub fn instances(&self, selector: &str) -> &[Instance<S>] {
        self.mount(selector)
            .map(|m| m.instances.as_slice())
            .unwrap_or_default()
    }

    /// The element playing `role` in the newest player under `selector`.
    pub fn element(&self, selector: &str, role: ControlRole) -> Option<RetainedElement> {
        self.instances(selector).first()?.element(role).cloned()
    }

    pub fn surface(&self, selector: &str) -> Option<S> {
        self.instances(selector)
            .first()
            .map(|instance| instance.surface.clone())
    }

    /// Delivers `trigger` to the element playing `role`. Returns how many
    /// listeners ran.
    pub fn fire(&self, selector: &str, role: ControlRole, trigger: Trigger, offset_x: f64) -> usize {
        match self.element(selector, role) {
            Some(element) => element.fire(trigger, offset_x),
            None => 0,
        }
    }
}

impl<S: MediaSurface + Clone> Page for RetainedPage<S> {
    type Surface = S;
    type Element = RetainedElement;

    fn insert_template(&mut self, selector: &str, template: &Template) -> Result<(), PlayerError> {
        let mount = self
            .mounts
            .iter_mut()
            .find(|m| m.selector == selector)
            .ok_or_else(|| PlayerError::ContainerNotFound(selector.to_string()))?;
        let surface = (self.loader)(template.source().unwrap_or_default());
        let elements = template
            .nodes()
            .into_iter()
            .map(RetainedElement::from_node)
            .collect();
        mount.instances.insert(0, Instance { elements, surface });
        Ok(())
    }

    fn find_surface(&self, selector: &str) -> Option<S> {
        self.surface(selector)
    }

    fn find_control(&self, selector: &str, role: ControlRole) -> Option<RetainedElement> {
        self.element(selector, role)
    }

    fn listen(&mut self, element: &RetainedElement, trigger: Trigger, listener: Listener) {
        element.0.borrow_mut().listeners.push((trigger, listener));
    }
}
