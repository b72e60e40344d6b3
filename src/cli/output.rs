use serde::Serialize;

use crate::model::{ProjectNode, ROOT_PATH};
use crate::tree::outline::{OutlineRow, ToggleState};
use crate::util::unicode::{display_width, pad_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ProjectPathJson {
    pub path: String,
    pub name: String,
    pub level: usize,
    pub direct: usize,
    pub direct_completed: usize,
    pub total: usize,
    pub total_completed: usize,
}

#[derive(Serialize)]
pub struct TreeRowJson {
    pub path: String,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Every project below the placeholder root, pre-order.
pub fn project_paths_json(root: &ProjectNode) -> Vec<ProjectPathJson> {
    let mut out = Vec::new();
    root.walk(&mut |node, _| {
        if node.full_path == ROOT_PATH {
            return;
        }
        let data = &node.payload;
        out.push(ProjectPathJson {
            path: node.full_path.clone(),
            name: data.name.clone(),
            level: node.level,
            direct: data.direct_count(),
            direct_completed: data.direct_completed,
            total: data.total_count(),
            total_completed: data.total_completed,
        });
    });
    out
}

pub fn tree_row_json(row: &OutlineRow) -> TreeRowJson {
    let expanded = match row.toggle {
        ToggleState::Expanded => Some(true),
        ToggleState::Collapsed => Some(false),
        ToggleState::Spacer | ToggleState::Hidden => None,
    };
    TreeRowJson {
        path: row.path.clone(),
        depth: row.depth,
        expanded,
        selected: row.selected,
        text: row.content_text(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `path  done/total` per project, paths padded to a common width.
pub fn format_project_paths(paths: &[ProjectPathJson]) -> String {
    let width = paths
        .iter()
        .map(|p| display_width(&p.path))
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for p in paths {
        out.push_str(&format!(
            "{}  {}/{}\n",
            pad_to_width(&p.path, width),
            p.total_completed,
            p.total
        ));
    }
    out
}

pub fn format_tree(rows: &[OutlineRow], indent: usize) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&row.plain_line(indent));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskConfig, build_project_tree_from_tasks};
    use crate::parse::parse_tasks;
    use pretty_assertions::assert_eq;

    fn sample_root() -> ProjectNode {
        let tasks = parse_tasks(
            "- [x] a #project/work/api\n- [ ] b #project/work/docs\n- [ ] c #project/home\n",
        );
        build_project_tree_from_tasks(&tasks, &TaskConfig::default())
    }

    #[test]
    fn project_paths_skip_root() {
        let paths = project_paths_json(&sample_root());
        let listed: Vec<(&str, usize)> = paths.iter().map(|p| (p.path.as_str(), p.level)).collect();
        assert_eq!(
            listed,
            vec![("home", 1), ("work", 1), ("work/api", 2), ("work/docs", 2)]
        );
    }

    #[test]
    fn format_paths_aligns_counts() {
        let paths = project_paths_json(&sample_root());
        assert_eq!(
            format_project_paths(&paths),
            "home       0/1\nwork       1/2\nwork/api   1/1\nwork/docs  0/1\n"
        );
    }

    #[test]
    fn json_omits_leaf_expand_flag() {
        let row = OutlineRow {
            path: "home".into(),
            depth: 0,
            toggle: ToggleState::Spacer,
            icon: None,
            spans: vec![],
            selected: false,
        };
        let json = serde_json::to_value(tree_row_json(&row)).unwrap();
        assert_eq!(json, serde_json::json!({"path": "home", "depth": 0, "text": ""}));
    }
}
