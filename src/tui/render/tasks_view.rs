use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

/// Render the tasks of the selected projects
pub fn render_tasks_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let marks = &app.task_config.completed_marks;
    let tasks = app.matching_tasks();

    let mut lines: Vec<Line> = Vec::with_capacity(tasks.len() + 2);
    lines.push(Line::from(Span::styled(
        format!(" Tasks ({})", tasks.len()),
        Style::default()
            .fg(app.theme.text)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    for task in tasks {
        let done = task.is_completed(marks);
        let (check_color, title_color) = if done {
            (app.theme.green, app.theme.dim)
        } else {
            (app.theme.text, app.theme.text_bright)
        };
        let mut spans = vec![
            Span::styled(
                format!(" [{}] ", task.mark),
                Style::default().fg(check_color).bg(bg),
            ),
            Span::styled(task.title.clone(), Style::default().fg(title_color).bg(bg)),
        ];
        if let Some(project) = task.project.as_deref() {
            spans.push(Span::styled(
                format!("  {}", project),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
