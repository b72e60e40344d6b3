//! Retained element tree that tree views render into.
//!
//! The surface is the host side of the tree engine: it hands out child
//! regions, keeps dismissible event listeners, and tracks component
//! ownership so that removing a component removes everything it registered
//! and every component below it. The terminal view paints from it.

use std::collections::{BTreeMap, HashMap};

/// Handle to an element on a [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

/// Handle to a lifecycle owner (an engine or a node renderer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    ContextMenu,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
        shift: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        meta: false,
        shift: false,
    };

    /// Ctrl or meta held: the platform multi-select gesture
    pub fn is_multi_select(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A raw pointer interaction delivered to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: EventKind,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn click() -> Self {
        PointerEvent {
            kind: EventKind::Click,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn click_with(modifiers: Modifiers) -> Self {
        PointerEvent {
            kind: EventKind::Click,
            modifiers,
        }
    }

    pub fn context_menu() -> Self {
        PointerEvent {
            kind: EventKind::ContextMenu,
            modifiers: Modifiers::NONE,
        }
    }
}

/// What a listener does when it fires. Interpreted by the listener's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Expand/collapse affordance; stops propagation
    Toggle,
    Select,
    ContextMenu,
}

impl Action {
    fn stops_propagation(self) -> bool {
        matches!(self, Action::Toggle)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub style_vars: BTreeMap<String, String>,
    pub icon: Option<String>,
    pub text: Option<String>,
    pub hidden: bool,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }
}

#[derive(Debug, Clone)]
struct Listener {
    owner: ComponentId,
    element: ElementId,
    kind: EventKind,
    action: Action,
}

#[derive(Debug, Default)]
struct ComponentRecord {
    parent: Option<ComponentId>,
    children: Vec<ComponentId>,
    /// Elements removed from the surface when the component unloads
    owned: Vec<ElementId>,
}

#[derive(Debug)]
pub struct Surface {
    elements: HashMap<ElementId, Element>,
    components: HashMap<ComponentId, ComponentRecord>,
    listeners: Vec<Listener>,
    root: ElementId,
    next_element: usize,
    next_component: usize,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    pub fn new() -> Self {
        let root = ElementId(0);
        let mut elements = HashMap::new();
        elements.insert(root, Element::default());
        Surface {
            elements,
            components: HashMap::new(),
            listeners: Vec::new(),
            root,
            next_element: 1,
            next_component: 0,
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(&id)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Create a child region under `parent`. A missing parent yields a
    /// detached element that is never painted.
    pub fn create_child(&mut self, parent: ElementId, classes: &[&str]) -> ElementId {
        let id = ElementId(self.next_element);
        self.next_element += 1;
        let element = Element {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            parent: Some(parent),
            ..Default::default()
        };
        self.elements.insert(id, element);
        if let Some(p) = self.elements.get_mut(&parent) {
            p.children.push(id);
        }
        id
    }

    /// Remove every descendant of `id`, keeping `id` itself.
    pub fn empty(&mut self, id: ElementId) {
        let children = match self.elements.get_mut(&id) {
            Some(e) => std::mem::take(&mut e.children),
            None => return,
        };
        for child in children {
            self.drop_subtree(child);
        }
    }

    /// Detach and drop `id` with its whole subtree.
    pub fn remove(&mut self, id: ElementId) {
        if id == self.root {
            self.empty(id);
            return;
        }
        let parent = match self.elements.get(&id) {
            Some(e) => e.parent,
            None => return,
        };
        if let Some(p) = parent.and_then(|p| self.elements.get_mut(&p)) {
            p.children.retain(|c| *c != id);
        }
        self.drop_subtree(id);
    }

    fn drop_subtree(&mut self, id: ElementId) {
        if let Some(element) = self.elements.remove(&id) {
            for child in element.children {
                self.drop_subtree(child);
            }
        }
        self.listeners.retain(|l| l.element != id);
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(e) = self.elements.get_mut(&id)
            && !e.has_class(class)
        {
            e.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(e) = self.elements.get_mut(&id) {
            e.classes.retain(|c| c != class);
        }
    }

    pub fn set_attr(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        if let Some(e) = self.elements.get_mut(&id) {
            e.attrs.insert(name.to_string(), value.into());
        }
    }

    pub fn set_style_var(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        if let Some(e) = self.elements.get_mut(&id) {
            e.style_vars.insert(name.to_string(), value.into());
        }
    }

    pub fn set_icon(&mut self, id: ElementId, icon: impl Into<String>) {
        if let Some(e) = self.elements.get_mut(&id) {
            e.icon = Some(icon.into());
        }
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(e) = self.elements.get_mut(&id) {
            e.text = Some(text.into());
        }
    }

    pub fn set_hidden(&mut self, id: ElementId, hidden: bool) {
        if let Some(e) = self.elements.get_mut(&id) {
            e.hidden = hidden;
        }
    }

    /// Whether `id` and all of its ancestors are shown.
    pub fn is_visible(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            match self.elements.get(&cur) {
                Some(e) if !e.hidden => current = e.parent,
                _ => return false,
            }
        }
        true
    }

    /// Concatenated text of `id` and its descendants, in document order.
    pub fn text_content(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: ElementId, out: &mut String) {
        if let Some(e) = self.elements.get(&id) {
            if let Some(text) = &e.text {
                out.push_str(text);
            }
            for child in &e.children {
                self.collect_text(*child, out);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Components
    // -----------------------------------------------------------------------

    /// Register a lifecycle owner, optionally as a child of `parent`.
    pub fn add_component(&mut self, parent: Option<ComponentId>) -> ComponentId {
        let id = ComponentId(self.next_component);
        self.next_component += 1;
        self.components.insert(
            id,
            ComponentRecord {
                parent,
                ..Default::default()
            },
        );
        if let Some(p) = parent.and_then(|p| self.components.get_mut(&p)) {
            p.children.push(id);
        }
        id
    }

    pub fn is_live(&self, component: ComponentId) -> bool {
        self.components.contains_key(&component)
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Hand ownership of `element` to `component`; it is removed on unload.
    pub fn own_element(&mut self, component: ComponentId, element: ElementId) {
        if let Some(c) = self.components.get_mut(&component) {
            c.owned.push(element);
        }
    }

    /// Unload `component`: descendants first, then its listeners and owned
    /// elements.
    pub fn remove_component(&mut self, component: ComponentId) {
        let record = match self.components.remove(&component) {
            Some(r) => r,
            None => return,
        };
        if let Some(p) = record.parent.and_then(|p| self.components.get_mut(&p)) {
            p.children.retain(|c| *c != component);
        }
        for child in record.children {
            self.remove_component(child);
        }
        self.listeners.retain(|l| l.owner != component);
        for element in record.owned {
            self.remove(element);
        }
    }

    // -----------------------------------------------------------------------
    // Listeners
    // -----------------------------------------------------------------------

    /// Dismissible registration: the listener lives as long as `owner`.
    pub fn register_listener(
        &mut self,
        owner: ComponentId,
        element: ElementId,
        kind: EventKind,
        action: Action,
    ) {
        if !self.is_live(owner) || !self.contains(element) {
            return;
        }
        self.listeners.push(Listener {
            owner,
            element,
            kind,
            action,
        });
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn listeners_owned_by(&self, owner: ComponentId) -> usize {
        self.listeners.iter().filter(|l| l.owner == owner).count()
    }

    /// Bubble `event` from `target` to the root and return the fired
    /// `(owner, action)` pairs in order, stopping after a listener that stops
    /// propagation.
    pub fn dispatch(&self, target: ElementId, event: PointerEvent) -> Vec<(ComponentId, Action)> {
        let mut fired = Vec::new();
        let mut current = Some(target);
        while let Some(el) = current {
            let mut stop = false;
            for l in self
                .listeners
                .iter()
                .filter(|l| l.element == el && l.kind == event.kind)
            {
                fired.push((l.owner, l.action));
                stop |= l.action.stops_propagation();
            }
            if stop {
                break;
            }
            current = self.elements.get(&el).and_then(|e| e.parent);
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_empty_children() {
        let mut s = Surface::new();
        let a = s.create_child(s.root(), &["a"]);
        let b = s.create_child(a, &["b"]);
        s.create_child(b, &["c"]);
        assert_eq!(s.element_count(), 4);

        s.empty(a);
        assert!(s.contains(a));
        assert!(!s.contains(b));
        assert_eq!(s.element_count(), 2);
        assert!(s.children(a).is_empty());
    }

    #[test]
    fn removing_component_tears_down_descendants_and_listeners() {
        let mut s = Surface::new();
        let parent = s.add_component(None);
        let child = s.add_component(Some(parent));
        let grandchild = s.add_component(Some(child));

        let row = s.create_child(s.root(), &["row"]);
        let inner = s.create_child(row, &["inner"]);
        s.own_element(child, inner);
        s.register_listener(parent, row, EventKind::Click, Action::Select);
        s.register_listener(child, inner, EventKind::Click, Action::Toggle);
        s.register_listener(grandchild, row, EventKind::ContextMenu, Action::ContextMenu);
        assert_eq!(s.listener_count(), 3);

        s.remove_component(child);
        assert!(s.is_live(parent));
        assert!(!s.is_live(child));
        assert!(!s.is_live(grandchild));
        assert_eq!(s.listener_count(), 1);
        assert!(!s.contains(inner));
        assert!(s.contains(row));
    }

    #[test]
    fn dispatch_bubbles_until_stopped() {
        let mut s = Surface::new();
        let owner = s.add_component(None);
        let row = s.create_child(s.root(), &["row"]);
        let content = s.create_child(row, &["content"]);
        let toggle = s.create_child(content, &["toggle"]);
        let label = s.create_child(content, &["label"]);
        s.register_listener(owner, content, EventKind::Click, Action::Select);
        s.register_listener(owner, toggle, EventKind::Click, Action::Toggle);

        assert_eq!(
            s.dispatch(label, PointerEvent::click()),
            vec![(owner, Action::Select)]
        );
        assert_eq!(
            s.dispatch(toggle, PointerEvent::click()),
            vec![(owner, Action::Toggle)]
        );
        assert!(s.dispatch(label, PointerEvent::context_menu()).is_empty());
    }

    #[test]
    fn visibility_follows_hidden_ancestors() {
        let mut s = Surface::new();
        let a = s.create_child(s.root(), &[]);
        let b = s.create_child(a, &[]);
        assert!(s.is_visible(b));
        s.set_hidden(a, true);
        assert!(!s.is_visible(b));
    }

    #[test]
    fn listeners_on_dead_owner_are_ignored() {
        let mut s = Surface::new();
        let owner = s.add_component(None);
        let el = s.create_child(s.root(), &[]);
        s.remove_component(owner);
        s.register_listener(owner, el, EventKind::Click, Action::Select);
        assert_eq!(s.listener_count(), 0);
    }

    #[test]
    fn text_content_in_document_order() {
        let mut s = Surface::new();
        let wrap = s.create_child(s.root(), &[]);
        let a = s.create_child(wrap, &[]);
        let b = s.create_child(wrap, &[]);
        s.set_text(a, "alpha ");
        s.set_text(b, "beta");
        assert_eq!(s.text_content(wrap), "alpha beta");
    }
}
