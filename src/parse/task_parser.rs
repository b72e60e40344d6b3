use std::sync::LazyLock;

use regex::Regex;

use crate::model::task::Task;

/// Tag that assigns a project: `#project/a/b`
const PROJECT_TAG_PREFIX: &str = "project/";

/// `- [x] rest` at any indent
static TASK_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[-*+] \[(.)\](?: (.*))?$").expect("task line pattern"));

/// Inline field `[project:: a/b]`
static PROJECT_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[project::\s*([^\]]*)\]").expect("project field pattern"));

/// Parse every task line in `text`. Non-task lines are skipped.
///
/// Nested tasks without a project of their own inherit the nearest
/// enclosing task's project.
pub fn parse_tasks(text: &str) -> Vec<Task> {
    let mut tasks = Vec::new();
    // (indent, project) of enclosing tasks
    let mut stack: Vec<(usize, Option<String>)> = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let Some(caps) = TASK_LINE_RE.captures(line) else {
            continue;
        };
        let indent = caps.get(1).map_or(0, |m| m.as_str().len());
        let mark = caps
            .get(2)
            .and_then(|m| m.as_str().chars().next())
            .unwrap_or(' ');
        let rest = caps.get(3).map_or("", |m| m.as_str());

        while stack.last().is_some_and(|(i, _)| *i >= indent) {
            stack.pop();
        }

        let mut task = parse_task_body(rest, idx);
        task.mark = mark;
        task.depth = stack.len();
        if task.project.is_none() {
            task.project = stack.last().and_then(|(_, p)| p.clone());
        }
        stack.push((indent, task.project.clone()));
        tasks.push(task);
    }

    tasks
}

/// Parse the text after the checkbox: optional `` `ID` ``, title, inline
/// project field, and trailing tags.
fn parse_task_body(rest: &str, idx: usize) -> Task {
    let rest = rest.trim_start();

    let (id, after_id) = match rest.strip_prefix('`').and_then(|r| r.split_once('`')) {
        Some((id, after)) if !id.is_empty() => (id.to_string(), after.trim_start()),
        _ => (format!("L{}", idx + 1), rest),
    };

    let mut project = PROJECT_FIELD_RE
        .captures(after_id)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|p| !p.is_empty());
    let without_field = PROJECT_FIELD_RE.replace_all(after_id, "");

    let (title, all_tags) = parse_title_and_tags(&without_field);
    let mut tags = Vec::with_capacity(all_tags.len());
    for tag in all_tags {
        match tag.strip_prefix(PROJECT_TAG_PREFIX) {
            Some(path) if project.is_none() && !path.is_empty() => project = Some(path.to_string()),
            _ => tags.push(tag),
        }
    }

    Task {
        id,
        mark: ' ',
        title: collapse_spaces(&title),
        tags,
        project,
        depth: 0,
        line: idx,
    }
}

/// Split a string into title and tags. Tags are `#word` tokens at the end.
pub fn parse_title_and_tags(s: &str) -> (String, Vec<String>) {
    let mut tags = Vec::new();
    let mut remaining = s.trim_end();

    while !remaining.is_empty() {
        let (head, last_word) = match remaining.rfind(' ') {
            Some(i) => (&remaining[..i], &remaining[i + 1..]),
            None => ("", remaining),
        };
        match last_word.strip_prefix('#') {
            Some(tag) if !tag.is_empty() && !tag.contains('#') => {
                tags.push(tag.to_string());
                remaining = head.trim_end();
            }
            _ => break,
        }
    }

    tags.reverse();
    (remaining.to_string(), tags)
}

fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_project_tag() {
        let tasks = parse_tasks("- [ ] Write docs #project/work/docs #urgent\n");
        assert_eq!(tasks.len(), 1);
        let t = &tasks[0];
        assert_eq!(t.id, "L1");
        assert_eq!(t.mark, ' ');
        assert_eq!(t.title, "Write docs");
        assert_eq!(t.project.as_deref(), Some("work/docs"));
        assert_eq!(t.tags, vec!["urgent"]);
    }

    #[test]
    fn parse_inline_project_field() {
        let tasks = parse_tasks("- [x] `T-1` Ship it [project:: home/garden] soon\n");
        let t = &tasks[0];
        assert_eq!(t.id, "T-1");
        assert_eq!(t.mark, 'x');
        assert_eq!(t.title, "Ship it soon");
        assert_eq!(t.project.as_deref(), Some("home/garden"));
    }

    #[test]
    fn inline_field_wins_over_tag() {
        let tasks = parse_tasks("- [ ] a [project:: one] #project/two\n");
        assert_eq!(tasks[0].project.as_deref(), Some("one"));
        assert_eq!(tasks[0].tags, vec!["project/two"]);
    }

    #[test]
    fn skips_non_task_lines() {
        let text = "# Heading\n\nsome prose\n- plain bullet\n- [ ] real #project/p\n";
        let tasks = parse_tasks(text);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "L5");
        assert_eq!(tasks[0].line, 4);
    }

    #[test]
    fn nested_tasks_inherit_project() {
        let text = "\
- [ ] parent #project/a
  - [ ] child
    - [x] grandchild #project/b
  - [ ] second child
- [ ] loose
";
        let tasks = parse_tasks(text);
        let summary: Vec<(usize, Option<&str>)> = tasks
            .iter()
            .map(|t| (t.depth, t.project.as_deref()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0, Some("a")),
                (1, Some("a")),
                (2, Some("b")),
                (1, Some("a")),
                (0, None),
            ]
        );
    }

    #[test]
    fn empty_checkbox_body() {
        let tasks = parse_tasks("- [ ]\n");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "");
        assert!(tasks[0].project.is_none());
    }

    #[test]
    fn title_and_tags_split() {
        assert_eq!(
            parse_title_and_tags("Fix #bug in parser #core #p1"),
            ("Fix #bug in parser".to_string(), vec!["core".to_string(), "p1".to_string()])
        );
        assert_eq!(parse_title_and_tags("#only"), (String::new(), vec!["only".to_string()]));
        assert_eq!(parse_title_and_tags(""), (String::new(), vec![]));
    }
}
