use serde::{Deserialize, Serialize};

/// A task line from a markdown task list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Explicit `` `ID` `` after the checkbox, or `L<line>` (1-based)
    pub id: String,
    /// Character inside the checkbox `[ ]`
    pub mark: char,
    /// Title text with tags and inline fields removed
    pub title: String,
    /// Tags (without the `#` prefix), excluding the project tag
    pub tags: Vec<String>,
    /// Project path as written, before normalization
    pub project: Option<String>,
    /// Nesting depth (0 = top-level)
    pub depth: usize,
    /// 0-indexed line in the source file
    #[serde(skip)]
    pub line: usize,
}

impl Task {
    pub fn new(id: impl Into<String>, mark: char, title: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            mark,
            title: title.into(),
            tags: Vec::new(),
            project: None,
            depth: 0,
            line: 0,
        }
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Whether the checkbox mark is one of `completed_marks`
    pub fn is_completed(&self, completed_marks: &[String]) -> bool {
        completed_marks
            .iter()
            .any(|m| m.chars().eq(std::iter::once(self.mark)))
    }
}
