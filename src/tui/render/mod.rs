pub mod status_row;
pub mod tasks_view;
pub mod tree_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::App;

/// Main render function: tree panel, optional tasks panel, status row
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    // Tasks panel only while some project is selected
    if app.matching_tasks().is_empty() {
        tree_view::render_tree_view(frame, app, chunks[0]);
    } else {
        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[0]);
        tree_view::render_tree_view(frame, app, panels[0]);
        tasks_view::render_tasks_view(frame, app, panels[1]);
    }

    status_row::render_status_row(frame, app, chunks[1]);
}
