use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tree::outline::{OutlineRow, icon_glyph};
use crate::tui::app::{App, GUTTER};
use crate::util::unicode::display_width;

/// Render the project tree, one line per live row
pub fn render_tree_view(frame: &mut Frame, app: &mut App, area: Rect) {
    app.tree_area = area;
    let bg = app.theme.background;

    let rows = app.rows();
    if rows.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            " No projects",
            Style::default().fg(app.theme.dim).bg(bg),
        )))
        .style(Style::default().bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    app.scroll_to_cursor(area.height as usize);
    let indent = app.indent();

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(area.height as usize)
        .map(|(i, row)| render_row(app, row, i == app.cursor, indent, area.width))
        .collect();

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn render_row<'a>(app: &App, row: &OutlineRow, is_cursor: bool, indent: usize, width: u16) -> Line<'a> {
    let theme = &app.theme;
    let bg = if is_cursor {
        theme.cursor_bg
    } else if row.selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let base = Style::default().bg(bg);

    let mut spans: Vec<Span> = Vec::new();

    // Cursor gutter
    let marker = if is_cursor { "\u{203A}" } else { " " };
    spans.push(Span::styled(
        format!("{:<width$}", marker, width = GUTTER as usize),
        base.fg(theme.accent),
    ));

    spans.push(Span::styled(" ".repeat(row.depth * indent), base));

    let glyph = row.toggle.glyph();
    if !glyph.is_empty() {
        spans.push(Span::styled(format!("{} ", glyph), base.fg(theme.dim)));
    }

    if let Some(icon) = row.icon.as_deref() {
        spans.push(Span::styled(
            format!("{} ", icon_glyph(icon)),
            base.fg(theme.dim),
        ));
    }

    for (i, span) in row.spans.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" ", base));
        }
        let mut style = base.fg(theme.span_color(span));
        if i == 0 && row.selected {
            style = style.fg(theme.text_bright).add_modifier(Modifier::BOLD);
        }
        spans.push(Span::styled(span.text.clone(), style));
    }

    // Pad to full width for cursor and selection
    if is_cursor || row.selected {
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let w = width as usize;
        if content_width < w {
            spans.push(Span::styled(" ".repeat(w - content_width), base));
        }
    }

    Line::from(spans)
}
