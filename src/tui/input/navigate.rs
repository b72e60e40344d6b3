use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.cursor_to_bottom(),

        KeyCode::Char(' ') | KeyCode::Tab => app.toggle_at_cursor(),
        KeyCode::Char('l') | KeyCode::Right => app.expand_at_cursor(),
        KeyCode::Char('h') | KeyCode::Left => app.collapse_at_cursor(),
        KeyCode::Char('E') => app.engine.expand_all(),
        KeyCode::Char('C') => {
            app.engine.collapse_all();
            app.cursor_to_top();
        }

        KeyCode::Enter => app.select_at_cursor(false),
        KeyCode::Char('x') => app.select_at_cursor(true),
        KeyCode::Char('m') => app.toggle_multi_select_mode(),
        KeyCode::Char('i') => app.context_menu_at_cursor(),
        KeyCode::Esc => app.engine.clear_selection(),

        _ => {}
    }
}
