use std::rc::Rc;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::io::store::MemoryStore;
use crate::model::GroveConfig;
use crate::parse::parse_tasks;
use crate::tui::app::App;

/// Two top projects; `work` has two subprojects with mixed progress.
pub const SAMPLE_TASKS: &str = "\
# Tasks

- [ ] Draft outline #project/work/docs
- [x] Review API #project/work/api
- [x] Publish #project/work/docs
- [ ] Water plants #project/home
";

/// Render into an in-memory buffer and return it.
pub fn render_to_buffer<F>(w: u16, h: u16, f: F) -> Buffer
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();
    terminal.backend().buffer().clone()
}

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let buf = render_to_buffer(w, h, f);
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// App over `markdown` with default config and in-memory state.
pub fn app_from_markdown(markdown: &str) -> App {
    let mut app = App::new(&GroveConfig::default(), Rc::new(MemoryStore::new()));
    app.set_tasks(parse_tasks(markdown));
    app
}
