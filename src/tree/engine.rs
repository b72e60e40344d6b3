//! Whole-tree owner: holds the current snapshot and the expanded/selected
//! path sets, rebuilds the renderer tree on every change, and persists
//! state through an injected [`StateStore`].

use std::collections::HashSet;
use std::rc::Rc;

use crate::io::state::{TreeState, read_tree_state, write_tree_state};
use crate::io::store::StateStore;
use crate::model::{ROOT_PATH, TreeConfig, TreeNode};

use super::renderer::{NodeEvent, NodeRenderer, Region, RenderCx, RendererConfig};
use super::surface::{Action, ComponentId, ElementId, PointerEvent, Surface};

/// Outbound notifications. Absent callbacks are skipped.
pub struct TreeCallbacks<T> {
    /// Receives a copy of the selection after every change
    pub on_node_selected: Option<Box<dyn FnMut(HashSet<String>)>>,
    pub on_node_toggled: Option<Box<dyn FnMut(&TreeNode<T>, bool)>>,
    pub on_multi_select_toggled: Option<Box<dyn FnMut(bool)>>,
    pub on_context_menu: Option<Box<dyn FnMut(&TreeNode<T>, &PointerEvent)>>,
}

impl<T> Default for TreeCallbacks<T> {
    fn default() -> Self {
        TreeCallbacks {
            on_node_selected: None,
            on_node_toggled: None,
            on_multi_select_toggled: None,
            on_context_menu: None,
        }
    }
}

/// One live row, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub path: String,
    pub node_id: String,
    pub level: usize,
    pub row: ElementId,
    pub toggle: Option<ElementId>,
    pub content: ElementId,
    pub has_children: bool,
    pub is_expanded: bool,
    pub is_selected: bool,
}

pub struct TreeEngineBuilder<T> {
    config: TreeConfig,
    renderer: RendererConfig<T>,
    callbacks: TreeCallbacks<T>,
    store: Option<Rc<dyn StateStore>>,
}

impl<T> TreeEngineBuilder<T> {
    pub fn config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn icon_resolver<F>(mut self, f: F) -> Self
    where
        F: Fn(&TreeNode<T>) -> String + 'static,
    {
        self.renderer.icon_resolver = Box::new(f);
        self
    }

    pub fn store(mut self, store: Rc<dyn StateStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn on_node_selected<F>(mut self, f: F) -> Self
    where
        F: FnMut(HashSet<String>) + 'static,
    {
        self.callbacks.on_node_selected = Some(Box::new(f));
        self
    }

    pub fn on_node_toggled<F>(mut self, f: F) -> Self
    where
        F: FnMut(&TreeNode<T>, bool) + 'static,
    {
        self.callbacks.on_node_toggled = Some(Box::new(f));
        self
    }

    pub fn on_multi_select_toggled<F>(mut self, f: F) -> Self
    where
        F: FnMut(bool) + 'static,
    {
        self.callbacks.on_multi_select_toggled = Some(Box::new(f));
        self
    }

    pub fn on_context_menu<F>(mut self, f: F) -> Self
    where
        F: FnMut(&TreeNode<T>, &PointerEvent) + 'static,
    {
        self.callbacks.on_context_menu = Some(Box::new(f));
        self
    }

    /// Create the engine's regions on a fresh surface and restore any
    /// persisted state.
    pub fn mount(self) -> TreeEngine<T> {
        let TreeEngineBuilder {
            config,
            mut renderer,
            callbacks,
            store,
        } = self;
        renderer.class_prefix = config.class_prefix.clone();
        renderer.show_toggle = config.show_toggle;
        renderer.enable_selection = config.enable_selection;

        let mut surface = Surface::new();
        let component = surface.add_component(None);
        let container = surface.create_child(surface.root(), &[&format!("{}-container", config.class_prefix)]);
        surface.own_element(component, container);
        let tree_container = surface.create_child(container, &[&config.class_prefix]);
        if let Some(indent) = config.indent_size {
            surface.set_style_var(container, "--tree-indent-size", indent.to_string());
        }

        let mut engine = TreeEngine {
            config,
            renderer,
            callbacks,
            store,
            surface,
            component,
            container,
            tree_container,
            tree: None,
            expanded: HashSet::new(),
            selected: HashSet::new(),
            multi_select: false,
            renderers: Vec::new(),
        };
        engine.restore_state();
        engine
    }
}

pub struct TreeEngine<T> {
    config: TreeConfig,
    renderer: RendererConfig<T>,
    callbacks: TreeCallbacks<T>,
    store: Option<Rc<dyn StateStore>>,
    surface: Surface,
    component: ComponentId,
    container: ElementId,
    tree_container: ElementId,
    tree: Option<TreeNode<T>>,
    expanded: HashSet<String>,
    selected: HashSet<String>,
    multi_select: bool,
    /// Top-level renderers; each owns its visible descendants
    renderers: Vec<NodeRenderer>,
}

impl<T> TreeEngine<T> {
    pub fn builder<F>(render_content: F) -> TreeEngineBuilder<T>
    where
        F: Fn(&TreeNode<T>, &mut Region<'_>) + 'static,
    {
        TreeEngineBuilder {
            config: TreeConfig::default(),
            renderer: RendererConfig::new(render_content),
            callbacks: TreeCallbacks::default(),
            store: None,
        }
    }

    // -----------------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------------

    /// Take a new snapshot, reconcile its expand flags, and render it.
    pub fn set_tree(&mut self, mut root: TreeNode<T>) {
        let auto_level = self.config.auto_expand_level;
        match auto_level {
            Some(level) if self.expanded.is_empty() => self.auto_expand_to_level(&mut root, level),
            _ => self.restore_expanded_state(&mut root),
        }

        for path in root.duplicate_paths() {
            tracing::warn!(path = %path, "duplicate node path; expand and selection state will be shared");
        }

        self.tree = Some(root);
        self.render();
    }

    /// Drop the snapshot and clear the view.
    pub fn clear_tree(&mut self) {
        self.tree = None;
        self.render();
    }

    pub fn tree(&self) -> Option<&TreeNode<T>> {
        self.tree.as_ref()
    }

    /// Hand the snapshot back to the caller, leaving the view empty.
    pub fn take_tree(&mut self) -> Option<TreeNode<T>> {
        let tree = self.tree.take();
        self.render();
        tree
    }

    /// Mutate the current snapshot in place, then reconcile and re-render.
    pub fn update_tree<F>(&mut self, f: F)
    where
        F: FnOnce(&mut TreeNode<T>),
    {
        let Some(mut tree) = self.tree.take() else {
            return;
        };
        f(&mut tree);
        self.restore_expanded_state(&mut tree);
        self.tree = Some(tree);
        self.render();
    }

    fn auto_expand_to_level(&mut self, root: &mut TreeNode<T>, level: usize) {
        let expanded = &mut self.expanded;
        root.walk_mut(&mut |node, depth| {
            if depth < level {
                node.is_expanded = true;
                expanded.insert(node.full_path.clone());
            } else {
                node.is_expanded = node.is_placeholder_root();
            }
        });
    }

    fn restore_expanded_state(&self, root: &mut TreeNode<T>) {
        root.walk_mut(&mut |node, _| {
            node.is_expanded = self.expanded.contains(&node.full_path) || node.full_path == ROOT_PATH;
        });
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    fn clear_renderers(&mut self) {
        for renderer in self.renderers.drain(..) {
            renderer.teardown(&mut self.surface);
        }
    }

    /// Rebuild every row from the current snapshot.
    pub fn render(&mut self) {
        self.clear_renderers();
        self.surface.empty(self.tree_container);

        let Some(tree) = &self.tree else {
            return;
        };

        let mut cx = RenderCx {
            surface: &mut self.surface,
            config: &self.renderer,
        };
        let roots: Vec<(Vec<usize>, &TreeNode<T>)> = if tree.is_placeholder_root() {
            tree.children
                .iter()
                .enumerate()
                .map(|(i, child)| (vec![i], child))
                .collect()
        } else {
            vec![(Vec::new(), tree)]
        };
        for (index_path, node) in roots {
            let wrapper = cx.surface.create_child(self.tree_container, &[]);
            let renderer = NodeRenderer::mount(&mut cx, self.component, wrapper, node, index_path);
            self.renderers.push(renderer);
        }

        self.update_selection_visuals();
        tracing::debug!(rows = self.visible_rows().len(), "rendered tree");
    }

    /// Same as [`render`](Self::render); for callers after external changes.
    pub fn refresh(&mut self) {
        self.render();
    }

    /// Sync every node flag and live row with the selected set.
    fn update_selection_visuals(&mut self) {
        let selected = &self.selected;
        if let Some(tree) = self.tree.as_mut() {
            tree.walk_mut(&mut |node, _| node.is_selected = selected.contains(&node.full_path));
        }
        let surface = &mut self.surface;
        for renderer in &mut self.renderers {
            renderer.for_each_mut(&mut |r| {
                let is_selected = selected.contains(r.full_path());
                r.show_selected(surface, is_selected);
            });
        }
    }

    // -----------------------------------------------------------------------
    // Interaction
    // -----------------------------------------------------------------------

    /// Deliver a pointer event at `target` and act on what it triggers.
    pub fn dispatch(&mut self, target: ElementId, event: PointerEvent) {
        for (component, action) in self.surface.dispatch(target, event) {
            if let Some(node_event) = self.route(component, action, event) {
                self.handle_event(node_event);
            }
        }
    }

    fn route(&mut self, component: ComponentId, action: Action, event: PointerEvent) -> Option<NodeEvent> {
        let renderer = self
            .renderers
            .iter_mut()
            .find_map(|r| r.find_by_component_mut(component))?;
        let node = self.tree.as_mut()?.node_at_mut(renderer.index_path())?;
        let mut cx = RenderCx {
            surface: &mut self.surface,
            config: &self.renderer,
        };
        renderer.handle_action(&mut cx, node, action, event)
    }

    fn handle_event(&mut self, event: NodeEvent) {
        match event {
            NodeEvent::Toggled { path, expanded } => self.handle_node_toggle(&path, expanded),
            NodeEvent::Selected { path, multi } => {
                let multi = multi || self.multi_select;
                self.handle_node_selection(&path, multi);
            }
            NodeEvent::ContextMenu { path, event } => {
                if let (Some(cb), Some(node)) = (
                    self.callbacks.on_context_menu.as_mut(),
                    self.tree.as_ref().and_then(|t| t.find_by_path(&path)),
                ) {
                    cb(node, &event);
                }
            }
        }
    }

    fn handle_node_toggle(&mut self, path: &str, expanded: bool) {
        if let Some(node) = self.tree.as_mut().and_then(|t| t.find_by_path_mut(path)) {
            node.is_expanded = expanded;
        }
        if expanded {
            self.expanded.insert(path.to_string());
        } else {
            self.expanded.remove(path);
        }
        tracing::debug!(path, expanded, "node toggled");

        self.render();

        if let (Some(cb), Some(node)) = (
            self.callbacks.on_node_toggled.as_mut(),
            self.tree.as_ref().and_then(|t| t.find_by_path(path)),
        ) {
            cb(node, expanded);
        }
        self.persist_state();
    }

    fn handle_node_selection(&mut self, path: &str, multi: bool) {
        if !self.config.enable_selection {
            return;
        }
        if !multi {
            self.selected.clear();
            self.selected.insert(path.to_string());
        } else if !self.selected.remove(path) {
            self.selected.insert(path.to_string());
        }
        tracing::debug!(path, multi, selected = self.selected.len(), "selection changed");

        self.update_selection_visuals();
        self.notify_selection();
        self.persist_state();
    }

    fn notify_selection(&mut self) {
        if let Some(cb) = self.callbacks.on_node_selected.as_mut() {
            cb(self.selected.clone());
        }
    }

    /// Expand or collapse the node at `path`, as if its affordance were
    /// used. Returns whether anything changed.
    pub fn set_node_expanded(&mut self, path: &str, expanded: bool) -> bool {
        let event = match self
            .renderers
            .iter_mut()
            .find_map(|r| r.find_by_path_mut(path))
        {
            Some(renderer) => {
                let Some(node) = self
                    .tree
                    .as_mut()
                    .and_then(|t| t.node_at_mut(renderer.index_path()))
                else {
                    return false;
                };
                let mut cx = RenderCx {
                    surface: &mut self.surface,
                    config: &self.renderer,
                };
                renderer.set_expanded(&mut cx, node, expanded)
            }
            None => match self.tree.as_ref().and_then(|t| t.find_by_path(path)) {
                Some(node) if node.is_expanded != expanded => Some(NodeEvent::Toggled {
                    path: path.to_string(),
                    expanded,
                }),
                _ => None,
            },
        };
        match event {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    pub fn toggle_node(&mut self, path: &str) -> bool {
        match self.find_node_by_path(path) {
            Some(node) => {
                let expanded = !node.is_expanded;
                self.set_node_expanded(path, expanded)
            }
            None => false,
        }
    }

    /// Select the node at `path` as a row click would; `multi` is the
    /// modifier gesture. Returns false for unknown paths.
    pub fn select_node(&mut self, path: &str, multi: bool) -> bool {
        if self.find_node_by_path(path).is_none() {
            return false;
        }
        self.handle_event(NodeEvent::Selected {
            path: path.to_string(),
            multi,
        });
        true
    }

    // -----------------------------------------------------------------------
    // Selection and expansion control
    // -----------------------------------------------------------------------

    pub fn set_multi_select_mode(&mut self, enabled: bool) {
        self.multi_select = enabled;
        if !enabled && self.selected.is_empty() {
            self.update_selection_visuals();
        }
        if let Some(cb) = self.callbacks.on_multi_select_toggled.as_mut() {
            cb(enabled);
        }
    }

    pub fn is_multi_select_mode(&self) -> bool {
        self.multi_select
    }

    /// Copy of the current selection.
    pub fn selected_paths(&self) -> HashSet<String> {
        self.selected.clone()
    }

    /// Replace the selection wholesale. Not persisted.
    pub fn set_selected_paths(&mut self, paths: HashSet<String>) {
        self.selected = paths;
        self.update_selection_visuals();
        self.notify_selection();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.update_selection_visuals();
        self.notify_selection();
    }

    /// Copy of the expanded set.
    pub fn expanded_paths(&self) -> HashSet<String> {
        self.expanded.clone()
    }

    pub fn expand_all(&mut self) {
        let Some(tree) = self.tree.as_mut() else {
            return;
        };
        let expanded = &mut self.expanded;
        tree.walk_mut(&mut |node, _| {
            node.is_expanded = true;
            expanded.insert(node.full_path.clone());
        });
        self.render();
        self.persist_state();
    }

    pub fn collapse_all(&mut self) {
        let Some(tree) = self.tree.as_mut() else {
            return;
        };
        tree.set_all_expanded(false);
        self.expanded.clear();
        self.render();
        self.persist_state();
    }

    /// Pre-order search of the whole snapshot, regardless of expand state.
    pub fn find_node_by_path(&self, path: &str) -> Option<&TreeNode<T>> {
        self.tree.as_ref()?.find_by_path(path)
    }

    // -----------------------------------------------------------------------
    // Live view
    // -----------------------------------------------------------------------

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn tree_container(&self) -> ElementId {
        self.tree_container
    }

    pub fn class_prefix(&self) -> &str {
        &self.config.class_prefix
    }

    pub fn renderers(&self) -> &[NodeRenderer] {
        &self.renderers
    }

    pub fn renderer_for(&self, path: &str) -> Option<&NodeRenderer> {
        self.renderers.iter().find_map(|r| r.find_by_path(path))
    }

    /// Live rows in display order.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        let tree = self.tree.as_ref();
        for renderer in &self.renderers {
            renderer.for_each(&mut |r| {
                let node = tree.and_then(|t| t.node_at(r.index_path()));
                rows.push(VisibleRow {
                    path: r.full_path().to_string(),
                    node_id: r.node_id().to_string(),
                    level: r.level(),
                    row: r.row(),
                    toggle: r.toggle_element(),
                    content: r.content_element(),
                    has_children: node.is_some_and(|n| n.has_children()),
                    is_expanded: node.is_some_and(|n| n.is_expanded),
                    is_selected: r.is_selected(),
                });
            });
        }
        rows
    }

    /// Tear down every renderer and the engine's own regions.
    pub fn unload(&mut self) {
        self.clear_renderers();
        self.surface.remove_component(self.component);
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn restore_state(&mut self) {
        let (Some(key), Some(store)) = (self.config.state_key.as_deref(), self.store.as_ref()) else {
            return;
        };
        if let Some(state) = read_tree_state(store.as_ref(), key) {
            tracing::debug!(
                key,
                expanded = state.expanded_nodes.len(),
                selected = state.selected_nodes.len(),
                "restored tree state"
            );
            self.expanded = state.expanded_set();
            self.selected = state.selected_set();
        }
    }

    fn persist_state(&self) {
        let (Some(key), Some(store)) = (self.config.state_key.as_deref(), self.store.as_ref()) else {
            return;
        };
        let state = TreeState::from_sets(&self.expanded, &self.selected);
        if let Err(e) = write_tree_state(store.as_ref(), key, &state) {
            tracing::warn!(key, error = %e, "failed to persist tree state");
        }
    }
}
