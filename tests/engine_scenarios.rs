//! End-to-end scenarios through the public library API: markdown in,
//! project tree through the engine, state persisted to a real file.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use grove::io::store::{FileStore, StateStore};
use grove::model::{
    GroveConfig, ProjectData, TaskConfig, TreeConfig, build_project_tree_from_tasks, project_icon,
    render_project_content, tasks_for_selection,
};
use grove::parse::parse_tasks;
use grove::tree::TreeEngine;
use grove::tree::outline::outline;
use pretty_assertions::assert_eq;

const TASKS: &str = "\
- [ ] Draft outline #project/work/docs
- [x] Review API #project/work/api
- [ ] Water plants #project/home
";

fn project_engine(config: TreeConfig, store: Rc<dyn StateStore>) -> TreeEngine<ProjectData> {
    TreeEngine::builder(render_project_content)
        .config(config)
        .icon_resolver(project_icon)
        .store(store)
        .mount()
}

fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn visible(engine: &TreeEngine<ProjectData>) -> Vec<String> {
    outline(engine).into_iter().map(|r| r.path).collect()
}

#[test]
fn state_survives_restart_through_state_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let state_file = tmp.path().join(".grove-state.json");
    let config = GroveConfig::default();
    let tasks = parse_tasks(TASKS);

    {
        let mut engine = project_engine(config.tree.clone(), Rc::new(FileStore::new(&state_file)));
        engine.set_tree(build_project_tree_from_tasks(&tasks, &config.tasks));
        assert_eq!(visible(&engine), vec!["home", "work"]);
        engine.set_node_expanded("work", true);
        engine.select_node("work/api", false);
    }
    assert!(state_file.exists());

    let mut engine = project_engine(config.tree.clone(), Rc::new(FileStore::new(&state_file)));
    engine.set_tree(build_project_tree_from_tasks(&tasks, &config.tasks));
    assert_eq!(visible(&engine), vec!["home", "work", "work/api", "work/docs"]);
    assert_eq!(engine.selected_paths(), set(&["work/api"]));
    assert!(engine.expanded_paths().contains("work"));
}

#[test]
fn reload_keeps_view_state() {
    let store: Rc<dyn StateStore> = Rc::new(grove::io::store::MemoryStore::new());
    let config = GroveConfig::default();
    let mut engine = project_engine(config.tree.clone(), store);
    engine.set_tree(build_project_tree_from_tasks(&parse_tasks(TASKS), &config.tasks));
    engine.set_node_expanded("work", true);
    engine.select_node("work/docs", false);

    // The file gains a project and a task
    let updated = format!("{TASKS}- [ ] Plan trip #project/work/travel\n");
    let tasks = parse_tasks(&updated);
    engine.set_tree(build_project_tree_from_tasks(&tasks, &config.tasks));

    assert_eq!(
        visible(&engine),
        vec!["home", "work", "work/api", "work/docs", "work/travel"]
    );
    assert_eq!(engine.selected_paths(), set(&["work/docs"]));
    let rows = outline(&engine);
    assert!(rows[3].selected);
    assert_eq!(rows[1].content_text(), "work 1/3");
}

#[test]
fn selection_callback_drives_task_filter() {
    let tasks = parse_tasks(TASKS);
    let root = build_project_tree_from_tasks(&tasks, &TaskConfig::default());
    let seen: Rc<RefCell<Vec<HashSet<String>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let mut engine = TreeEngine::builder(render_project_content)
        .config(TreeConfig::project_tree())
        .on_node_selected(move |selected| sink.borrow_mut().push(selected))
        .mount();
    engine.set_tree(root.clone());
    engine.set_multi_select_mode(true);
    engine.select_node("home", false);
    engine.select_node("work", false);

    let last = seen.borrow().last().cloned().unwrap();
    assert_eq!(last, set(&["home", "work"]));
    let titles: Vec<&str> = tasks_for_selection(&root, &last, &tasks)
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Draft outline", "Review API", "Water plants"]);
}
