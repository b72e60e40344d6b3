use ratatui::style::Color;

use crate::model::UiConfig;
use crate::tree::outline::OutlineSpan;

/// Terminal colors for the tree, tasks panel, and status row
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    /// Cursor marker and mode badge
    pub accent: Color,
    pub dim: Color,
    /// Every task done
    pub green: Color,
    /// Some tasks done
    pub yellow: Color,
    pub selection_bg: Color,
    pub cursor_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x12, 0x16, 0x12),
            text: Color::Rgb(0xC8, 0xD6, 0xC0),
            text_bright: Color::Rgb(0xF2, 0xF7, 0xEE),
            accent: Color::Rgb(0x8F, 0xD1, 0x6A),
            dim: Color::Rgb(0x6E, 0x7F, 0x68),
            green: Color::Rgb(0x5F, 0xD7, 0x87),
            yellow: Color::Rgb(0xE5, 0xC0, 0x7B),
            selection_bg: Color::Rgb(0x2A, 0x3B, 0x2A),
            cursor_bg: Color::Rgb(0x1E, 0x26, 0x1E),
        }
    }
}

/// `#RRGGBB` to an RGB color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let rgb = u32::from_str_radix(digits, 16).ok()?;
    Some(Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
}

impl Theme {
    /// Defaults with `[ui.colors]` overrides applied by name
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "accent" => theme.accent = color,
                "dim" => theme.dim = color,
                "yellow" => theme.yellow = color,
                "green" => theme.green = color,
                "selection_bg" => theme.selection_bg = color,
                "cursor_bg" => theme.cursor_bg = color,
                _ => tracing::warn!(key = %key, "unknown color name"),
            }
        }

        theme
    }

    /// Color for one content span, by its progress classes
    pub fn span_color(&self, span: &OutlineSpan) -> Color {
        if span.has_class("all-completed") {
            self.green
        } else if span.has_class("partially-completed") {
            self.yellow
        } else if span.classes.iter().any(|c| c.contains("count")) {
            self.dim
        } else {
            self.text
        }
    }
}
