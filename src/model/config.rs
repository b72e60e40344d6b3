use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from grove.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroveConfig {
    #[serde(default = "TreeConfig::project_tree")]
    pub tree: TreeConfig,
    #[serde(default)]
    pub tasks: TaskConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for GroveConfig {
    fn default() -> Self {
        GroveConfig {
            tree: TreeConfig::project_tree(),
            tasks: TaskConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

/// Behavior of one tree view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Prefix for every class the tree puts on the surface
    #[serde(default = "default_class_prefix")]
    pub class_prefix: String,
    /// Cells per indent level; unset means the view's default
    #[serde(default)]
    pub indent_size: Option<u16>,
    #[serde(default = "default_true")]
    pub show_toggle: bool,
    #[serde(default = "default_true")]
    pub enable_selection: bool,
    /// On first load with nothing expanded, expand nodes shallower than this
    #[serde(default)]
    pub auto_expand_level: Option<usize>,
    /// Key for persisting expand/selection state; unset disables persistence
    #[serde(default)]
    pub state_key: Option<String>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            class_prefix: default_class_prefix(),
            indent_size: None,
            show_toggle: true,
            enable_selection: true,
            auto_expand_level: None,
            state_key: None,
        }
    }
}

impl TreeConfig {
    /// Settings for the project tree when grove.toml has no [tree] table
    pub fn project_tree() -> Self {
        TreeConfig {
            class_prefix: "project-tree".into(),
            indent_size: Some(2),
            auto_expand_level: Some(1),
            state_key: Some("grove-project-tree-state".into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Separator between project path segments
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Checkbox marks that count as completed
    #[serde(default = "default_completed_marks")]
    pub completed_marks: Vec<String>,
}

impl Default for TaskConfig {
    fn default() -> Self {
        TaskConfig {
            separator: default_separator(),
            completed_marks: default_completed_marks(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

fn default_true() -> bool {
    true
}

fn default_class_prefix() -> String {
    "tree".into()
}

fn default_separator() -> String {
    "/".into()
}

fn default_completed_marks() -> Vec<String> {
    vec!["x".into(), "X".into()]
}
