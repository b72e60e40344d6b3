//! Per-node renderer: one row on the surface plus, while expanded, a
//! renderer for each child.
//!
//! Renderers never write engine state. Interactions come back as
//! [`NodeEvent`] values for the owner to act on.

use crate::model::TreeNode;

use super::surface::{Action, ComponentId, ElementId, EventKind, PointerEvent, Surface};

pub const ICON_EXPANDED: &str = "chevron-down";
pub const ICON_COLLAPSED: &str = "chevron-right";
pub const DEFAULT_ICON: &str = "folder";
pub const SELECTED_CLASS: &str = "is-selected";

/// Populates a node's content region.
pub type ContentFn<T> = Box<dyn Fn(&TreeNode<T>, &mut Region<'_>)>;
/// Resolves the icon name for a node.
pub type IconFn<T> = Box<dyn Fn(&TreeNode<T>) -> String>;

/// A writable handle on one element, handed to content delegates.
pub struct Region<'a> {
    surface: &'a mut Surface,
    element: ElementId,
}

impl<'a> Region<'a> {
    pub fn new(surface: &'a mut Surface, element: ElementId) -> Self {
        Region { surface, element }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.surface.set_text(self.element, text);
    }

    pub fn add_class(&mut self, class: &str) {
        self.surface.add_class(self.element, class);
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.surface.set_attr(self.element, name, value);
    }

    /// Append a text span with the given classes and return its region.
    pub fn span(&mut self, classes: &[&str], text: impl Into<String>) -> Region<'_> {
        let el = self.surface.create_child(self.element, classes);
        self.surface.set_text(el, text);
        Region {
            surface: &mut *self.surface,
            element: el,
        }
    }
}

/// Settings shared unchanged by every renderer in a tree.
pub struct RendererConfig<T> {
    pub render_content: ContentFn<T>,
    pub icon_resolver: IconFn<T>,
    pub class_prefix: String,
    pub show_toggle: bool,
    pub enable_selection: bool,
}

impl<T> RendererConfig<T> {
    pub fn new<F>(render_content: F) -> Self
    where
        F: Fn(&TreeNode<T>, &mut Region<'_>) + 'static,
    {
        RendererConfig {
            render_content: Box::new(render_content),
            icon_resolver: Box::new(|_| DEFAULT_ICON.to_string()),
            class_prefix: "tree".to_string(),
            show_toggle: true,
            enable_selection: true,
        }
    }

    pub fn class(&self, suffix: &str) -> String {
        format!("{}-{}", self.class_prefix, suffix)
    }
}

/// Borrowed surface and configuration for one render operation.
pub struct RenderCx<'a, T> {
    pub surface: &'a mut Surface,
    pub config: &'a RendererConfig<T>,
}

/// Intent reported by a renderer to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeEvent {
    Toggled { path: String, expanded: bool },
    Selected { path: String, multi: bool },
    ContextMenu { path: String, event: PointerEvent },
}

#[derive(Debug)]
pub struct NodeRenderer {
    component: ComponentId,
    node_id: String,
    full_path: String,
    level: usize,
    /// Child positions from the snapshot root to the bound node
    index_path: Vec<usize>,
    row: ElementId,
    toggle: Option<ElementId>,
    content: ElementId,
    children_container: Option<ElementId>,
    children: Vec<NodeRenderer>,
    selected: bool,
}

impl NodeRenderer {
    /// Register a renderer under `owner` and render `node` into `container`.
    pub fn mount<T>(
        cx: &mut RenderCx<'_, T>,
        owner: ComponentId,
        container: ElementId,
        node: &TreeNode<T>,
        index_path: Vec<usize>,
    ) -> NodeRenderer {
        let component = cx.surface.add_component(Some(owner));
        let config = cx.config;
        let surface = &mut *cx.surface;

        let row = surface.create_child(container, &[&config.class("item")]);
        surface.own_element(component, row);
        surface.set_attr(row, "data-node-id", node.id.clone());
        surface.set_attr(row, "data-level", node.level.to_string());
        surface.set_attr(row, "role", "treeitem");
        surface.set_style_var(row, "--tree-level", node.level.to_string());
        if node.has_children() {
            surface.set_attr(row, "aria-expanded", node.is_expanded.to_string());
        }
        if node.is_selected {
            surface.add_class(row, SELECTED_CLASS);
        }

        let row_content = surface.create_child(row, &[&config.class("item-content")]);

        let mut toggle = None;
        if config.show_toggle && node.has_children() {
            let el = surface.create_child(row_content, &[&config.class("item-toggle")]);
            surface.set_icon(
                el,
                if node.is_expanded {
                    ICON_EXPANDED
                } else {
                    ICON_COLLAPSED
                },
            );
            surface.register_listener(component, el, EventKind::Click, Action::Toggle);
            toggle = Some(el);
        } else if config.show_toggle {
            surface.create_child(row_content, &[&config.class("item-toggle-spacer")]);
        }

        let icon = surface.create_child(row_content, &[&config.class("item-icon")]);
        surface.set_icon(icon, (config.icon_resolver)(node));

        let content = surface.create_child(row_content, &[&config.class("item-content-wrapper")]);
        (config.render_content)(node, &mut Region::new(surface, content));

        if config.enable_selection {
            surface.register_listener(component, row_content, EventKind::Click, Action::Select);
        }
        surface.register_listener(
            component,
            row_content,
            EventKind::ContextMenu,
            Action::ContextMenu,
        );

        let mut renderer = NodeRenderer {
            component,
            node_id: node.id.clone(),
            full_path: node.full_path.clone(),
            level: node.level,
            index_path,
            row,
            toggle,
            content,
            children_container: None,
            children: Vec::new(),
            selected: node.is_selected,
        };

        if node.has_children() {
            let el = cx.surface.create_child(row, &[&cx.config.class("item-children")]);
            renderer.children_container = Some(el);
            if node.is_expanded {
                renderer.render_children(cx, node);
            } else {
                cx.surface.set_hidden(el, true);
            }
        }

        renderer
    }

    fn render_children<T>(&mut self, cx: &mut RenderCx<'_, T>, node: &TreeNode<T>) {
        let Some(container) = self.children_container else {
            return;
        };
        self.clear_children(cx.surface);
        for (i, child) in node.children.iter().enumerate() {
            let mut index_path = self.index_path.clone();
            index_path.push(i);
            let renderer = NodeRenderer::mount(cx, self.component, container, child, index_path);
            self.children.push(renderer);
        }
    }

    /// Unload every child renderer and empty the children region.
    fn clear_children(&mut self, surface: &mut Surface) {
        for child in self.children.drain(..) {
            surface.remove_component(child.component);
        }
        if let Some(container) = self.children_container {
            surface.empty(container);
        }
    }

    /// Unload this renderer, its children, listeners, and row.
    pub fn teardown(mut self, surface: &mut Surface) {
        self.clear_children(surface);
        surface.remove_component(self.component);
    }

    pub fn toggle_expanded<T>(
        &mut self,
        cx: &mut RenderCx<'_, T>,
        node: &mut TreeNode<T>,
    ) -> Option<NodeEvent> {
        let expanded = !node.is_expanded;
        self.set_expanded(cx, node, expanded)
    }

    /// Show or hide children. Returns `None` when nothing changed.
    pub fn set_expanded<T>(
        &mut self,
        cx: &mut RenderCx<'_, T>,
        node: &mut TreeNode<T>,
        expanded: bool,
    ) -> Option<NodeEvent> {
        if node.is_expanded == expanded {
            return None;
        }
        node.is_expanded = expanded;

        if let Some(toggle) = self.toggle {
            cx.surface.set_icon(
                toggle,
                if expanded {
                    ICON_EXPANDED
                } else {
                    ICON_COLLAPSED
                },
            );
        }
        if node.has_children() {
            cx.surface
                .set_attr(self.row, "aria-expanded", expanded.to_string());
        }
        if let Some(container) = self.children_container {
            if expanded {
                self.render_children(cx, node);
                cx.surface.set_hidden(container, false);
            } else {
                cx.surface.set_hidden(container, true);
                self.clear_children(cx.surface);
            }
        }

        Some(NodeEvent::Toggled {
            path: node.full_path.clone(),
            expanded,
        })
    }

    pub fn select(&self, event: PointerEvent) -> NodeEvent {
        NodeEvent::Selected {
            path: self.full_path.clone(),
            multi: event.modifiers.is_multi_select(),
        }
    }

    /// Translate a fired listener action into an event for the owner.
    pub fn handle_action<T>(
        &mut self,
        cx: &mut RenderCx<'_, T>,
        node: &mut TreeNode<T>,
        action: Action,
        event: PointerEvent,
    ) -> Option<NodeEvent> {
        match action {
            Action::Toggle => self.toggle_expanded(cx, node),
            Action::Select => Some(self.select(event)),
            Action::ContextMenu => Some(NodeEvent::ContextMenu {
                path: self.full_path.clone(),
                event,
            }),
        }
    }

    pub fn set_selected<T>(&mut self, surface: &mut Surface, node: &mut TreeNode<T>, selected: bool) {
        node.is_selected = selected;
        self.show_selected(surface, selected);
    }

    /// Visual half of [`set_selected`](Self::set_selected).
    pub fn show_selected(&mut self, surface: &mut Surface, selected: bool) {
        self.selected = selected;
        if selected {
            surface.add_class(self.row, SELECTED_CLASS);
        } else {
            surface.remove_class(self.row, SELECTED_CLASS);
        }
    }

    /// Rebind to `node` and redraw content, selection, and expanded children.
    pub fn update_node<T>(&mut self, cx: &mut RenderCx<'_, T>, node: &mut TreeNode<T>) {
        self.node_id = node.id.clone();
        self.full_path = node.full_path.clone();
        self.level = node.level;

        cx.surface.empty(self.content);
        (cx.config.render_content)(&*node, &mut Region::new(cx.surface, self.content));

        let selected = node.is_selected;
        self.set_selected(cx.surface, node, selected);

        if node.has_children() && node.is_expanded {
            self.render_children(cx, node);
        }
    }

    /// Depth-first search of live descendants by node id.
    pub fn find_child_renderer(&self, node_id: &str) -> Option<&NodeRenderer> {
        for child in &self.children {
            if child.node_id == node_id {
                return Some(child);
            }
            if let Some(found) = child.find_child_renderer(node_id) {
                return Some(found);
            }
        }
        None
    }

    pub(crate) fn find_by_component_mut(&mut self, component: ComponentId) -> Option<&mut NodeRenderer> {
        if self.component == component {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|c| c.find_by_component_mut(component))
    }

    pub(crate) fn find_by_path_mut(&mut self, path: &str) -> Option<&mut NodeRenderer> {
        if self.full_path == path {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|c| c.find_by_path_mut(path))
    }

    pub fn find_by_path(&self, path: &str) -> Option<&NodeRenderer> {
        if self.full_path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_path(path))
    }

    /// Pre-order visit of this renderer and its live descendants.
    pub fn for_each<F>(&self, f: &mut F)
    where
        F: FnMut(&NodeRenderer),
    {
        f(self);
        for child in &self.children {
            child.for_each(f);
        }
    }

    pub fn for_each_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut NodeRenderer),
    {
        f(self);
        for child in &mut self.children {
            child.for_each_mut(f);
        }
    }

    pub fn component(&self) -> ComponentId {
        self.component
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn index_path(&self) -> &[usize] {
        &self.index_path
    }

    pub fn row(&self) -> ElementId {
        self.row
    }

    pub fn toggle_element(&self) -> Option<ElementId> {
        self.toggle
    }

    pub fn content_element(&self) -> ElementId {
        self.content
    }

    pub fn children_element(&self) -> Option<ElementId> {
        self.children_container
    }

    pub fn child_renderers(&self) -> &[NodeRenderer] {
        &self.children
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }
}
