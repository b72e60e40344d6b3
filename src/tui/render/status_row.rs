use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

const KEY_HINTS: &str = "space toggle  enter select  x add  m multi  q quit";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let mut spans: Vec<Span> = Vec::new();

    if app.engine.is_multi_select_mode() {
        spans.push(Span::styled(
            " MULTI ",
            Style::default()
                .fg(app.theme.background)
                .bg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let selected = app.engine.selected_paths().len();
    if selected > 0 {
        let tasks = app.matching_tasks().len();
        spans.push(Span::styled(
            format!(" {} selected, {} tasks", selected, tasks),
            Style::default().fg(app.theme.text).bg(bg),
        ));
    }

    if let Some(message) = app.message_text() {
        spans.push(Span::styled(
            format!(" {}", message),
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    }

    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    if app.show_key_hints && content_width + display_width(KEY_HINTS) < width {
        let padding = width - content_width - display_width(KEY_HINTS);
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(
            KEY_HINTS,
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    } else if content_width > width {
        // Keep the leading spans and cut the rest
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        spans = vec![Span::styled(
            truncate_to_width(&text, width),
            Style::default().fg(app.theme.text).bg(bg),
        )];
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_when_idle() {
        let app = app_from_markdown(SAMPLE_TASKS);
        let output = render_to_string(60, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert_eq!(output, "");
    }

    #[test]
    fn shows_mode_selection_and_message() {
        let mut app = app_from_markdown(SAMPLE_TASKS);
        app.toggle_multi_select_mode();
        app.engine.select_node("home", false);
        app.engine.select_node("work/api", false);
        let output = render_to_string(60, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert_eq!(output, " MULTI  2 selected, 2 tasks multi-select on");
    }

    #[test]
    fn key_hints_right_aligned() {
        let mut app = app_from_markdown(SAMPLE_TASKS);
        app.show_key_hints = true;
        let output = render_to_string(60, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert_eq!(output, format!("{:>60}", KEY_HINTS));
    }
}
