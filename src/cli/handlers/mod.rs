use std::path::Path;
use std::rc::Rc;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::store::{FileStore, MemoryStore, StateStore};
use crate::io::task_io::{load_tasks, state_file_for};
use crate::model::{
    GroveConfig, ProjectData, build_project_tree_from_tasks, project_icon, render_project_content,
};
use crate::tree::TreeEngine;
use crate::tree::outline::{indent_size, outline};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, config: &GroveConfig) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let state_dir = cli.state_dir.as_deref();

    match cli.command {
        None => Err("no task file given (try `gv --help`)".into()),
        Some(Commands::Print(args)) => cmd_print(args, config, state_dir, json),
        Some(Commands::Paths(args)) => cmd_paths(args, config, json),
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

pub fn cmd_print(
    args: PrintArgs,
    config: &GroveConfig,
    state_dir: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = load_tasks(&args.file)?;

    let mut tree_config = config.tree.clone();
    if let Some(level) = args.level {
        tree_config.auto_expand_level = Some(level);
        tree_config.state_key = None;
    }
    let store = saved_state_snapshot(&args.file, state_dir, tree_config.state_key.as_deref());

    let mut engine: TreeEngine<ProjectData> = TreeEngine::builder(render_project_content)
        .config(tree_config)
        .icon_resolver(project_icon)
        .store(store)
        .mount();
    engine.set_tree(build_project_tree_from_tasks(&tasks, &config.tasks));
    if args.expand_all {
        engine.expand_all();
    }

    let rows = outline(&engine);
    if json {
        let out: Vec<TreeRowJson> = rows.iter().map(tree_row_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", format_tree(&rows, indent_size(&engine)));
    }
    Ok(())
}

pub fn cmd_paths(
    args: PathsArgs,
    config: &GroveConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = load_tasks(&args.file)?;
    let root = build_project_tree_from_tasks(&tasks, &config.tasks);
    let paths = project_paths_json(&root);

    if json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
    } else {
        print!("{}", format_project_paths(&paths));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Copy the saved view state into memory so printing never writes the
/// state file.
fn saved_state_snapshot(
    task_file: &Path,
    state_dir: Option<&Path>,
    key: Option<&str>,
) -> Rc<dyn StateStore> {
    let snapshot = MemoryStore::new();
    if let Some(key) = key {
        let file = FileStore::new(state_file_for(task_file, state_dir));
        match file.load(key) {
            Ok(Some(raw)) => snapshot.insert(key, &raw),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable state file"),
        }
    }
    Rc::new(snapshot)
}
