use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::io::store::StateStore;
use crate::io::task_io::load_tasks;
use crate::io::watcher::TaskFileWatcher;
use crate::model::{
    GroveConfig, ProjectData, Task, TaskConfig, build_project_tree_from_tasks, project_icon,
    render_project_content, tasks_for_selection,
};
use crate::tree::outline::{OutlineRow, indent_size, outline};
use crate::tree::{Modifiers, PointerEvent, TreeEngine, VisibleRow};

use super::input;
use super::render;
use super::theme::Theme;

/// Columns taken by the cursor marker before each tree row
pub const GUTTER: u16 = 2;

/// Main application state
pub struct App {
    pub engine: TreeEngine<ProjectData>,
    pub tasks: Vec<Task>,
    pub task_config: TaskConfig,
    pub task_file: Option<PathBuf>,
    pub theme: Theme,
    pub show_key_hints: bool,
    /// Index into the visible rows
    pub cursor: usize,
    pub scroll_offset: usize,
    /// Where the tree panel was last drawn, for mouse hit-testing
    pub tree_area: Rect,
    pub should_quit: bool,
    /// One-line feedback shown in the status row; written by engine callbacks
    pub message: Rc<RefCell<Option<String>>>,
}

impl App {
    pub fn new(config: &GroveConfig, store: Rc<dyn StateStore>) -> Self {
        let message: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
        let multi_msg = Rc::clone(&message);
        let menu_msg = Rc::clone(&message);

        let engine = TreeEngine::builder(render_project_content)
            .config(config.tree.clone())
            .icon_resolver(project_icon)
            .store(store)
            .on_node_toggled(|node, expanded| {
                tracing::debug!(path = %node.full_path, expanded, "project toggled");
            })
            .on_node_selected(|selected| {
                tracing::debug!(count = selected.len(), "project selection changed");
            })
            .on_multi_select_toggled(move |enabled| {
                let text = if enabled {
                    "multi-select on"
                } else {
                    "multi-select off"
                };
                *multi_msg.borrow_mut() = Some(text.to_string());
            })
            .on_context_menu(move |node, _event| {
                let data = &node.payload;
                *menu_msg.borrow_mut() = Some(format!(
                    "{}: {} tasks ({} done)",
                    node.full_path,
                    data.total_count(),
                    data.total_completed
                ));
            })
            .mount();

        App {
            engine,
            tasks: Vec::new(),
            task_config: config.tasks.clone(),
            task_file: None,
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
            cursor: 0,
            scroll_offset: 0,
            tree_area: Rect::default(),
            should_quit: false,
            message,
        }
    }

    /// Replace the task list and rebuild the project tree, keeping the
    /// cursor on the same project when it still exists.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        let cursor_path = self.cursor_row().map(|r| r.path);
        let root = build_project_tree_from_tasks(&tasks, &self.task_config);
        self.tasks = tasks;
        self.engine.set_tree(root);

        let rows = self.engine.visible_rows();
        self.cursor = cursor_path
            .and_then(|p| rows.iter().position(|r| r.path == p))
            .unwrap_or(0);
        self.clamp_cursor();
    }

    /// Re-read the task file. A failed read keeps the current tree.
    pub fn reload(&mut self) {
        let Some(path) = self.task_file.clone() else {
            return;
        };
        match load_tasks(&path) {
            Ok(tasks) => self.set_tasks(tasks),
            Err(e) => {
                tracing::warn!(error = %e, "reload failed");
                self.set_message(e.to_string());
            }
        }
    }

    pub fn set_message(&self, text: impl Into<String>) {
        *self.message.borrow_mut() = Some(text.into());
    }

    pub fn clear_message(&self) {
        *self.message.borrow_mut() = None;
    }

    pub fn message_text(&self) -> Option<String> {
        self.message.borrow().clone()
    }

    /// Rows as painted, top to bottom.
    pub fn rows(&self) -> Vec<OutlineRow> {
        outline(&self.engine)
    }

    pub fn indent(&self) -> usize {
        indent_size(&self.engine)
    }

    pub fn cursor_row(&self) -> Option<VisibleRow> {
        self.engine.visible_rows().into_iter().nth(self.cursor)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.engine.visible_rows().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    pub fn cursor_to_top(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_to_bottom(&mut self) {
        self.cursor = self.engine.visible_rows().len().saturating_sub(1);
    }

    fn clamp_cursor(&mut self) {
        let len = self.engine.visible_rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Use the expand/collapse affordance of the cursor row.
    pub fn toggle_at_cursor(&mut self) {
        if let Some(toggle) = self.cursor_row().and_then(|r| r.toggle) {
            self.engine.dispatch(toggle, PointerEvent::click());
        }
    }

    /// Expand the cursor row, or step into it when already expanded.
    pub fn expand_at_cursor(&mut self) {
        let Some(row) = self.cursor_row() else {
            return;
        };
        if !row.has_children {
            return;
        }
        if row.is_expanded {
            self.move_cursor(1);
        } else {
            self.engine.set_node_expanded(&row.path, true);
        }
    }

    /// Collapse the cursor row, or step out to its parent row.
    pub fn collapse_at_cursor(&mut self) {
        let Some(row) = self.cursor_row() else {
            return;
        };
        if row.has_children && row.is_expanded {
            self.engine.set_node_expanded(&row.path, false);
            self.clamp_cursor();
            return;
        }
        let rows = self.engine.visible_rows();
        if let Some(parent) = rows[..self.cursor.min(rows.len())]
            .iter()
            .rposition(|r| r.level < row.level)
        {
            self.cursor = parent;
        }
    }

    /// Click the cursor row's content; `multi` holds the modifier.
    pub fn select_at_cursor(&mut self, multi: bool) {
        let Some(row) = self.cursor_row() else {
            return;
        };
        let modifiers = if multi { Modifiers::CTRL } else { Modifiers::NONE };
        self.engine
            .dispatch(row.content, PointerEvent::click_with(modifiers));
    }

    pub fn context_menu_at_cursor(&mut self) {
        if let Some(row) = self.cursor_row() {
            self.engine.dispatch(row.content, PointerEvent::context_menu());
        }
    }

    pub fn toggle_multi_select_mode(&mut self) {
        let enabled = !self.engine.is_multi_select_mode();
        self.engine.set_multi_select_mode(enabled);
    }

    /// Route a pointer event at terminal cell (`col`, `line`) to the row
    /// under it. Clicks in the toggle column toggle; elsewhere they select.
    pub fn click(&mut self, col: u16, line: u16, event: PointerEvent) {
        let area = self.tree_area;
        if col < area.x
            || col >= area.x + area.width
            || line < area.y
            || line >= area.y + area.height
        {
            return;
        }
        let index = (line - area.y) as usize + self.scroll_offset;
        let Some(row) = self.engine.visible_rows().into_iter().nth(index) else {
            return;
        };
        let Some(depth) = self.rows().get(index).map(|r| r.depth) else {
            return;
        };
        self.cursor = index;

        let toggle_col = area.x as usize + GUTTER as usize + depth * self.indent();
        let target = match row.toggle {
            Some(toggle) if col as usize == toggle_col => toggle,
            _ => row.content,
        };
        self.engine.dispatch(target, event);
    }

    /// Tasks under the selected projects, in file order.
    pub fn matching_tasks(&self) -> Vec<&Task> {
        match self.engine.tree() {
            Some(root) => tasks_for_selection(root, &self.engine.selected_paths(), &self.tasks),
            None => Vec::new(),
        }
    }

    /// Keep the cursor inside a viewport of `height` rows.
    pub fn scroll_to_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + height {
            self.scroll_offset = self.cursor + 1 - height;
        }
    }
}

/// Run the TUI over `task_file` until the user quits.
pub fn run(
    task_file: &Path,
    config: &GroveConfig,
    store: Rc<dyn StateStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = load_tasks(task_file)?;

    let mut app = App::new(config, store);
    app.task_file = Some(task_file.to_path_buf());
    app.set_tasks(tasks);

    let watcher = match TaskFileWatcher::start(task_file) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "file watching disabled");
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    app.engine.unload();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&TaskFileWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Mouse(mouse) if !matches!(mouse.kind, MouseEventKind::Moved) => {
                    input::handle_mouse(app, mouse);
                }
                _ => {}
            }
        }

        if watcher.is_some_and(|w| w.poll()) {
            app.reload();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
