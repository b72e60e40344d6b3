//! Project hierarchy built from task project paths.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};

use super::config::TaskConfig;
use super::node::{ROOT_PATH, TreeNode};
use super::task::Task;
use crate::tree::Region;

pub const ICON_FOLDER: &str = "folder";
pub const ICON_FOLDER_OPEN: &str = "folder-open";
pub const ICON_FILE: &str = "file";

/// Payload of one project node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectData {
    /// Last path segment
    pub name: String,
    /// Tasks assigned to exactly this project
    pub direct_task_ids: IndexSet<String>,
    /// Tasks of this project and every subproject
    pub all_task_ids: IndexSet<String>,
    pub direct_completed: usize,
    pub total_completed: usize,
}

impl ProjectData {
    fn named(name: impl Into<String>) -> Self {
        ProjectData {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn direct_count(&self) -> usize {
        self.direct_task_ids.len()
    }

    pub fn total_count(&self) -> usize {
        self.all_task_ids.len()
    }
}

pub type ProjectNode = TreeNode<ProjectData>;

/// Split a project path into segments. Repeated separators collapse and a
/// leading or trailing separator is dropped; blank input has no segments.
pub fn parse_project_path(project: &str, separator: &str) -> Vec<String> {
    let trimmed = project.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if separator.is_empty() {
        return vec![trimmed.to_string()];
    }
    trimmed
        .split(separator)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the project tree under a placeholder root from a map of project
/// path to task ids.
///
/// Paths that normalize to the same segments share one node. Children are
/// sorted by name, case-insensitively.
pub fn build_project_tree(projects: &IndexMap<String, IndexSet<String>>, separator: &str) -> ProjectNode {
    let mut root = TreeNode::placeholder_root("root", ProjectData::named("Projects"));

    for (project, task_ids) in projects {
        let segments = parse_project_path(project, separator);
        if segments.is_empty() {
            continue;
        }

        let mut current = &mut root;
        let mut path = String::new();
        for (i, segment) in segments.iter().enumerate() {
            if !path.is_empty() {
                path.push_str(separator);
            }
            path.push_str(segment);

            let pos = match current.children.iter().position(|c| c.payload.name == *segment) {
                Some(pos) => pos,
                None => {
                    let level = current.level + 1;
                    current.children.push(TreeNode::new(
                        path.clone(),
                        path.clone(),
                        level,
                        ProjectData::named(segment.clone()),
                    ));
                    current.children.len() - 1
                }
            };
            current = &mut current.children[pos];

            if i == segments.len() - 1 {
                current.payload.direct_task_ids.extend(task_ids.iter().cloned());
            }
        }
    }

    collect_all_task_ids(&mut root);
    sort_by_name(&mut root);
    root
}

/// Build the project tree from parsed tasks, counting completions with the
/// configured marks. Tasks without a project are left out.
pub fn build_project_tree_from_tasks(tasks: &[Task], config: &TaskConfig) -> ProjectNode {
    let mut projects: IndexMap<String, IndexSet<String>> = IndexMap::new();
    for task in tasks {
        if let Some(project) = &task.project {
            projects
                .entry(project.clone())
                .or_default()
                .insert(task.id.clone());
        }
    }

    let mut root = build_project_tree(&projects, &config.separator);

    let completed: HashSet<&str> = tasks
        .iter()
        .filter(|t| t.is_completed(&config.completed_marks))
        .map(|t| t.id.as_str())
        .collect();
    root.walk_mut(&mut |node, _| {
        let data = &mut node.payload;
        data.direct_completed = count_in(&data.direct_task_ids, &completed);
        data.total_completed = count_in(&data.all_task_ids, &completed);
    });

    root
}

fn count_in(ids: &IndexSet<String>, completed: &HashSet<&str>) -> usize {
    ids.iter().filter(|id| completed.contains(id.as_str())).count()
}

/// Bottom-up union of direct task ids.
fn collect_all_task_ids(node: &mut ProjectNode) -> IndexSet<String> {
    let mut all = node.payload.direct_task_ids.clone();
    for child in &mut node.children {
        all.extend(collect_all_task_ids(child));
    }
    node.payload.all_task_ids = all.clone();
    all
}

fn sort_by_name(node: &mut ProjectNode) {
    node.children.sort_by(|a, b| {
        a.payload
            .name
            .to_lowercase()
            .cmp(&b.payload.name.to_lowercase())
            .then_with(|| a.payload.name.cmp(&b.payload.name))
    });
    for child in &mut node.children {
        sort_by_name(child);
    }
}

/// Union of every task id under the selected project paths, in tree order.
pub fn task_ids_for_selection(root: &ProjectNode, selected: &HashSet<String>) -> IndexSet<String> {
    let mut ids = IndexSet::new();
    root.walk(&mut |node, _| {
        if node.full_path != ROOT_PATH && selected.contains(&node.full_path) {
            ids.extend(node.payload.all_task_ids.iter().cloned());
        }
    });
    ids
}

/// Tasks belonging to the selected projects, in file order.
pub fn tasks_for_selection<'a>(
    root: &ProjectNode,
    selected: &HashSet<String>,
    tasks: &'a [Task],
) -> Vec<&'a Task> {
    let ids = task_ids_for_selection(root, selected);
    tasks.iter().filter(|t| ids.contains(&t.id)).collect()
}

pub fn project_icon(node: &ProjectNode) -> String {
    let icon = match (node.has_children(), node.is_expanded) {
        (true, true) => ICON_FOLDER_OPEN,
        (true, false) => ICON_FOLDER,
        (false, _) => ICON_FILE,
    };
    icon.to_string()
}

/// Name plus `done/total` badges. The total badge only appears when
/// subprojects add tasks beyond the direct ones.
pub fn render_project_content(node: &ProjectNode, region: &mut Region<'_>) {
    let data = &node.payload;
    region.span(&["project-tree-item-name"], data.name.clone());

    let mut counts = region.span(&["project-tree-item-counts"], "");
    if data.direct_count() > 0 {
        count_badge(
            &mut counts,
            "project-tree-item-count-direct",
            data.direct_completed,
            data.direct_count(),
        );
    }
    if node.has_children() && data.total_count() > data.direct_count() {
        count_badge(
            &mut counts,
            "project-tree-item-count-total",
            data.total_completed,
            data.total_count(),
        );
    }
}

fn count_badge(parent: &mut Region<'_>, class: &str, completed: usize, total: usize) {
    let mut badge = parent.span(&[class], format!("{completed}/{total}"));
    badge.set_attr("data-completed", completed.to_string());
    badge.set_attr("data-total", total.to_string());
    if completed == total {
        badge.add_class("all-completed");
    } else if completed > 0 {
        badge.add_class("partially-completed");
    }
}
