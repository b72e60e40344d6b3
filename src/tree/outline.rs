//! Read-back of the rendered surface as flat rows, for painting to a
//! terminal or printing as text.

use super::engine::TreeEngine;
use super::renderer::{ICON_EXPANDED, SELECTED_CLASS};
use super::surface::{ElementId, Surface};

const DEFAULT_INDENT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    Expanded,
    Collapsed,
    /// Leaf placeholder keeping columns aligned
    Spacer,
    /// Toggles are turned off
    Hidden,
}

impl ToggleState {
    pub fn glyph(self) -> &'static str {
        match self {
            ToggleState::Expanded => "\u{25BE}",
            ToggleState::Collapsed => "\u{25B8}",
            ToggleState::Spacer => " ",
            ToggleState::Hidden => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineSpan {
    pub text: String,
    pub classes: Vec<String>,
}

impl OutlineSpan {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow {
    pub path: String,
    /// Depth below the shallowest visible row
    pub depth: usize,
    pub toggle: ToggleState,
    pub icon: Option<String>,
    /// Text-bearing elements of the content region, in document order
    pub spans: Vec<OutlineSpan>,
    pub selected: bool,
}

impl OutlineRow {
    /// Content spans joined by single spaces.
    pub fn content_text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Indented single-line rendering: toggle glyph, then content.
    pub fn plain_line(&self, indent: usize) -> String {
        let mut line = " ".repeat(self.depth * indent);
        let glyph = self.toggle.glyph();
        if !glyph.is_empty() {
            line.push_str(glyph);
            line.push(' ');
        }
        line.push_str(&self.content_text());
        line
    }
}

/// Terminal glyph for an icon name.
pub fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "folder" => "\u{25A1}",
        "folder-open" => "\u{25A3}",
        "file" => "\u{00B7}",
        _ => "\u{2022}",
    }
}

/// Cells per level, from the container's `--tree-indent-size`.
pub fn indent_size<T>(engine: &TreeEngine<T>) -> usize {
    engine
        .surface()
        .element(engine.container())
        .and_then(|e| e.style_vars.get("--tree-indent-size"))
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_INDENT)
}

/// Every live row of `engine`, top to bottom.
pub fn outline<T>(engine: &TreeEngine<T>) -> Vec<OutlineRow> {
    let surface = engine.surface();
    let spacer_class = format!("{}-item-toggle-spacer", engine.class_prefix());
    let icon_class = format!("{}-item-icon", engine.class_prefix());

    let rows = engine.visible_rows();
    let levels: Vec<usize> = rows
        .iter()
        .map(|r| {
            surface
                .element(r.row)
                .and_then(|e| e.style_vars.get("--tree-level"))
                .and_then(|v| v.parse().ok())
                .unwrap_or(r.level)
        })
        .collect();
    let base = levels.iter().copied().min().unwrap_or(0);

    rows.iter()
        .zip(levels)
        .map(|(row, level)| {
            let row_content = surface.children(row.row).first().copied();
            let parts: &[ElementId] = row_content
                .map(|rc| surface.children(rc))
                .unwrap_or(&[]);
            let has_class = |id: &ElementId, class: &str| {
                surface.element(*id).is_some_and(|e| e.has_class(class))
            };

            let toggle = match row.toggle {
                Some(t) => {
                    let expanded = surface
                        .element(t)
                        .and_then(|e| e.icon.as_deref())
                        .is_some_and(|i| i == ICON_EXPANDED);
                    if expanded {
                        ToggleState::Expanded
                    } else {
                        ToggleState::Collapsed
                    }
                }
                None if parts.iter().any(|p| has_class(p, &spacer_class)) => ToggleState::Spacer,
                None => ToggleState::Hidden,
            };
            let icon = parts
                .iter()
                .find(|p| has_class(p, &icon_class))
                .and_then(|p| surface.element(*p))
                .and_then(|e| e.icon.clone());

            let mut spans = Vec::new();
            collect_spans(surface, row.content, &mut spans);

            OutlineRow {
                path: row.path.clone(),
                depth: level.saturating_sub(base),
                toggle,
                icon,
                spans,
                selected: surface
                    .element(row.row)
                    .is_some_and(|e| e.has_class(SELECTED_CLASS)),
            }
        })
        .collect()
}

fn collect_spans(surface: &Surface, id: ElementId, out: &mut Vec<OutlineSpan>) {
    let Some(el) = surface.element(id) else {
        return;
    };
    if let Some(text) = el.text.as_deref().filter(|t| !t.is_empty()) {
        out.push(OutlineSpan {
            text: text.to_string(),
            classes: el.classes.clone(),
        });
    }
    for child in el.children() {
        collect_spans(surface, *child, out);
    }
}
