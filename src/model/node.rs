use std::collections::{HashSet, VecDeque};

/// Path of the placeholder root. A root with this path is never drawn; its
/// children are rendered as top-level rows and it always counts as expanded.
pub const ROOT_PATH: &str = "";

/// A node in a renderable tree, generic over the caller's payload.
///
/// `full_path` is the identity used for expand/selection tracking and
/// persistence and must be unique across the whole tree. `id` only needs to
/// be unique among siblings. `level` is presentation only (indentation).
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode<T> {
    pub id: String,
    pub full_path: String,
    pub level: usize,
    pub payload: T,
    /// Rendering order is insertion order
    pub children: Vec<TreeNode<T>>,
    /// Written by the engine only
    pub is_expanded: bool,
    /// Written by the engine only
    pub is_selected: bool,
}

impl<T> TreeNode<T> {
    pub fn new(id: impl Into<String>, full_path: impl Into<String>, level: usize, payload: T) -> Self {
        TreeNode {
            id: id.into(),
            full_path: full_path.into(),
            level,
            payload,
            children: Vec::new(),
            is_expanded: false,
            is_selected: false,
        }
    }

    /// A non-visual root whose children are drawn as top-level rows.
    pub fn placeholder_root(id: impl Into<String>, payload: T) -> Self {
        let mut root = TreeNode::new(id, ROOT_PATH, 0, payload);
        root.is_expanded = true;
        root
    }

    pub fn with_children(mut self, children: Vec<TreeNode<T>>) -> Self {
        self.children = children;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_placeholder_root(&self) -> bool {
        self.full_path == ROOT_PATH
    }

    /// Pre-order depth-first search for the first node with `path`.
    pub fn find_by_path(&self, path: &str) -> Option<&TreeNode<T>> {
        if self.full_path == path {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_path(path))
    }

    pub fn find_by_path_mut(&mut self, path: &str) -> Option<&mut TreeNode<T>> {
        if self.full_path == path {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_by_path_mut(path))
    }

    /// Index path (child positions from this node) of the first node with `path`.
    pub fn index_path_of(&self, path: &str) -> Option<Vec<usize>> {
        if self.full_path == path {
            return Some(Vec::new());
        }
        for (i, child) in self.children.iter().enumerate() {
            if let Some(mut rest) = child.index_path_of(path) {
                rest.insert(0, i);
                return Some(rest);
            }
        }
        None
    }

    /// Resolve a node by child positions from this node.
    pub fn node_at(&self, index_path: &[usize]) -> Option<&TreeNode<T>> {
        let mut node = self;
        for &i in index_path {
            node = node.children.get(i)?;
        }
        Some(node)
    }

    pub fn node_at_mut(&mut self, index_path: &[usize]) -> Option<&mut TreeNode<T>> {
        let mut node = self;
        for &i in index_path {
            node = node.children.get_mut(i)?;
        }
        Some(node)
    }

    /// Pre-order walk; the callback receives each node and its depth from `self`.
    pub fn walk<F>(&self, f: &mut F)
    where
        F: FnMut(&TreeNode<T>, usize),
    {
        self.walk_inner(0, f);
    }

    fn walk_inner<F>(&self, depth: usize, f: &mut F)
    where
        F: FnMut(&TreeNode<T>, usize),
    {
        f(self, depth);
        for child in &self.children {
            child.walk_inner(depth + 1, f);
        }
    }

    pub fn walk_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut TreeNode<T>, usize),
    {
        self.walk_mut_inner(0, f);
    }

    fn walk_mut_inner<F>(&mut self, depth: usize, f: &mut F)
    where
        F: FnMut(&mut TreeNode<T>, usize),
    {
        f(self, depth);
        for child in &mut self.children {
            child.walk_mut_inner(depth + 1, f);
        }
    }

    /// All nodes below this one, breadth-first.
    pub fn descendants(&self) -> Vec<&TreeNode<T>> {
        let mut out = Vec::new();
        let mut queue: VecDeque<&TreeNode<T>> = self.children.iter().collect();
        while let Some(node) = queue.pop_front() {
            out.push(node);
            queue.extend(node.children.iter());
        }
        out
    }

    /// Paths of every expanded node, excluding the placeholder root.
    pub fn expanded_paths(&self) -> HashSet<String> {
        let mut paths = HashSet::new();
        self.walk(&mut |node, _| {
            if node.is_expanded && !node.is_placeholder_root() {
                paths.insert(node.full_path.clone());
            }
        });
        paths
    }

    pub fn set_all_expanded(&mut self, expanded: bool) {
        self.walk_mut(&mut |node, _| node.is_expanded = expanded);
    }

    /// Paths that occur on more than one node, in first-seen order.
    pub fn duplicate_paths(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut dups = Vec::new();
        self.walk(&mut |node, _| {
            if !seen.insert(node.full_path.clone()) && !dups.contains(&node.full_path) {
                dups.push(node.full_path.clone());
            }
        });
        dups
    }
}
