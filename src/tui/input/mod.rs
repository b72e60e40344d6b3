mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::app::App;
use crate::tree::{Modifiers, PointerEvent};

use navigate::handle_navigate;

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    app.clear_message();
    handle_navigate(app, key);
}

/// Handle a mouse event over the tree panel
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let modifiers = Modifiers {
                ctrl: mouse.modifiers.contains(KeyModifiers::CONTROL),
                meta: mouse.modifiers.contains(KeyModifiers::SUPER),
                shift: mouse.modifiers.contains(KeyModifiers::SHIFT),
            };
            app.clear_message();
            app.click(mouse.column, mouse.row, PointerEvent::click_with(modifiers));
        }
        MouseEventKind::Down(MouseButton::Right) => {
            app.click(mouse.column, mouse.row, PointerEvent::context_menu());
        }
        MouseEventKind::ScrollDown => app.move_cursor(1),
        MouseEventKind::ScrollUp => app.move_cursor(-1),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{SAMPLE_TASKS, app_from_markdown};
    use crossterm::event::KeyEventState;
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, keys: &str) {
        for c in keys.chars() {
            handle_key(app, key(KeyCode::Char(c)));
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16, modifiers: KeyModifiers) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers,
        }
    }

    #[test]
    fn navigation_keys_move_cursor() {
        let mut app = app_from_markdown(SAMPLE_TASKS);
        press(&mut app, "j");
        assert_eq!(app.cursor, 1);
        press(&mut app, "l");
        assert_eq!(app.rows().len(), 4);
        handle_key(&mut app, key(KeyCode::Down));
        handle_key(&mut app, key(KeyCode::Down));
        assert_eq!(app.cursor, 3);
        press(&mut app, "g");
        assert_eq!(app.cursor, 0);
        press(&mut app, "G");
        assert_eq!(app.cursor, 3);
        press(&mut app, "k");
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn space_toggles_and_enter_selects() {
        let mut app = app_from_markdown(SAMPLE_TASKS);
        press(&mut app, "j ");
        assert!(app.engine.expanded_paths().contains("work"));
        assert!(app.engine.selected_paths().is_empty());

        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.engine.selected_paths().contains("work"));

        handle_key(&mut app, key(KeyCode::Esc));
        assert!(app.engine.selected_paths().is_empty());
    }

    #[test]
    fn x_adds_to_selection() {
        let mut app = app_from_markdown(SAMPLE_TASKS);
        press(&mut app, "xjx");
        assert_eq!(app.engine.selected_paths().len(), 2);
        // Second gesture on the same row removes it
        press(&mut app, "x");
        assert_eq!(app.engine.selected_paths().len(), 1);
    }

    #[test]
    fn expand_and_collapse_all() {
        let mut app = app_from_markdown(SAMPLE_TASKS);
        press(&mut app, "E");
        assert_eq!(app.rows().len(), 4);
        press(&mut app, "GC");
        // Top projects stay listed under the hidden root
        assert_eq!(app.rows().len(), 2);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn multi_mode_key_and_quit() {
        let mut app = app_from_markdown(SAMPLE_TASKS);
        press(&mut app, "m");
        assert!(app.engine.is_multi_select_mode());
        assert!(!app.should_quit);
        handle_key(
            &mut app,
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                kind: crossterm::event::KeyEventKind::Press,
                state: KeyEventState::NONE,
            },
        );
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_click_extends_selection() {
        let mut app = app_from_markdown(SAMPLE_TASKS);
        app.tree_area = Rect::new(0, 0, 40, 10);
        handle_mouse(
            &mut app,
            mouse(MouseEventKind::Down(MouseButton::Left), 8, 0, KeyModifiers::NONE),
        );
        handle_mouse(
            &mut app,
            mouse(MouseEventKind::Down(MouseButton::Left), 8, 1, KeyModifiers::CONTROL),
        );
        assert_eq!(app.engine.selected_paths().len(), 2);

        handle_mouse(
            &mut app,
            mouse(MouseEventKind::Down(MouseButton::Right), 8, 0, KeyModifiers::NONE),
        );
        assert_eq!(app.message_text().as_deref(), Some("home: 1 tasks (0 done)"));
    }
}
