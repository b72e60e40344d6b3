use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::store::{StateStore, StoreError};

/// Persisted tree view state, stored as JSON under a caller-chosen key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeState {
    /// Paths of expanded nodes
    #[serde(default, alias = "expandedPaths")]
    pub expanded_nodes: Vec<String>,
    /// Paths of selected nodes
    #[serde(default, alias = "selectedPaths")]
    pub selected_nodes: Vec<String>,
}

impl TreeState {
    /// Snapshot two path sets, sorted for stable output.
    pub fn from_sets(expanded: &HashSet<String>, selected: &HashSet<String>) -> Self {
        let mut expanded_nodes: Vec<String> = expanded.iter().cloned().collect();
        let mut selected_nodes: Vec<String> = selected.iter().cloned().collect();
        expanded_nodes.sort();
        selected_nodes.sort();
        TreeState {
            expanded_nodes,
            selected_nodes,
        }
    }

    pub fn expanded_set(&self) -> HashSet<String> {
        self.expanded_nodes.iter().cloned().collect()
    }

    pub fn selected_set(&self) -> HashSet<String> {
        self.selected_nodes.iter().cloned().collect()
    }
}

/// Read tree state under `key`. Absent, unreadable, or malformed state is
/// logged and reported as `None`.
pub fn read_tree_state(store: &dyn StateStore, key: &str) -> Option<TreeState> {
    let raw = match store.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to restore tree state");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring malformed tree state");
            None
        }
    }
}

/// Write tree state under `key`.
pub fn write_tree_state(
    store: &dyn StateStore,
    key: &str,
    state: &TreeState,
) -> Result<(), StoreError> {
    // Serializing two string vectors cannot fail
    let raw = serde_json::to_string(state).unwrap_or_default();
    store.save(key, &raw)
}
