use std::fs;
use std::path::{Path, PathBuf};

use crate::model::task::Task;
use crate::parse::parse_tasks;

/// Name of the state file written beside the task file
pub const STATE_FILE: &str = ".grove-state.json";

/// Error type for loading a task file
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Read and parse the markdown task file at `path`.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>, LoadError> {
    let text = fs::read_to_string(path).map_err(|e| LoadError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let tasks = parse_tasks(&text);
    tracing::debug!(path = %path.display(), tasks = tasks.len(), "loaded tasks");
    Ok(tasks)
}

/// Directory holding state and logs: `state_dir` if given, otherwise the
/// task file's directory.
pub fn state_dir_for(task_file: &Path, state_dir: Option<&Path>) -> PathBuf {
    match state_dir {
        Some(dir) => dir.to_path_buf(),
        None => match task_file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        },
    }
}

pub fn state_file_for(task_file: &Path, state_dir: Option<&Path>) -> PathBuf {
    state_dir_for(task_file, state_dir).join(STATE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_parses_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.md");
        fs::write(&path, "- [ ] a #project/x\n- [x] b #project/x/y\n").unwrap();
        let tasks = load_tasks(&path).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].project.as_deref(), Some("x/y"));
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_tasks(&tmp.path().join("nope.md")).unwrap_err();
        assert!(matches!(err, LoadError::ReadError { .. }));
        assert!(err.to_string().contains("nope.md"));
    }

    #[test]
    fn state_file_location() {
        assert_eq!(
            state_file_for(Path::new("/work/tasks.md"), None),
            PathBuf::from("/work/.grove-state.json")
        );
        assert_eq!(
            state_file_for(Path::new("tasks.md"), None),
            PathBuf::from("./.grove-state.json")
        );
        assert_eq!(
            state_file_for(Path::new("/work/tasks.md"), Some(Path::new("/state"))),
            PathBuf::from("/state/.grove-state.json")
        );
    }
}
