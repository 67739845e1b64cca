use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use ratatui_macros::span;
use unicode_width::UnicodeWidthStr;

use crate::models::{Role, Turn};

use super::utils;

/// Left border, padding on both sides and right border.
pub const BORDER_ELEMENTS_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    Plain,
    Selected,
    Editing,
}

/// One turn of the conversation drawn as a framed box, with its index and
/// the key that acts on it.
pub struct Bubble<'a> {
    index: usize,
    turn: &'a Turn,
    max_width: usize,
    highlight: Highlight,
}

impl<'a> Bubble<'a> {
    pub fn new(index: usize, turn: &'a Turn, max_width: usize) -> Bubble<'a> {
        Bubble {
            index,
            turn,
            max_width,
            highlight: Highlight::Plain,
        }
    }

    pub fn with_highlight(mut self, highlight: Highlight) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let text_width = self.max_width.saturating_sub(BORDER_ELEMENTS_LEN).max(1);
        let border = self.border_style();

        let mut lines = vec![self.bar("╭", &self.label(), "╮", border)];
        for text in utils::split_to_lines(self.turn.content(), text_width) {
            lines.push(Line::from(vec![
                Span::styled("│ ", border),
                span!(utils::pad_to_width(&text, text_width)),
                Span::styled(" │", border),
            ]));
        }

        let time = self
            .turn
            .created_at()
            .with_timezone(&chrono::Local)
            .format("%H:%M");
        let footer = format!("{} · {}", time, self.hint());
        lines.push(self.bar("╰", &footer, "╯", border));
        lines
    }

    fn label(&self) -> String {
        match self.turn.role() {
            Role::User => format!("🧒 You [{}]", self.index),
            Role::Assistant => format!("📜 Story [{}]", self.index),
        }
    }

    fn hint(&self) -> &'static str {
        match (self.turn.role(), self.highlight) {
            (Role::User, Highlight::Editing) => "editing...",
            (Role::User, _) => "Ctrl+E to edit",
            (Role::Assistant, _) => "Ctrl+L to listen",
        }
    }

    fn border_style(&self) -> Style {
        let color = match (self.turn.role(), self.highlight) {
            (_, Highlight::Editing) => Color::Yellow,
            (Role::User, _) => Color::LightMagenta,
            (Role::Assistant, _) => Color::LightCyan,
        };
        let style = Style::default().fg(color);
        match self.highlight {
            Highlight::Plain => style,
            Highlight::Selected | Highlight::Editing => style.add_modifier(Modifier::BOLD),
        }
    }

    // ╭─ label ───────╮
    fn bar(&self, left: &str, text: &str, right: &str, style: Style) -> Line<'static> {
        let head = format!("{}─ {} ", left, text);
        let fill = self
            .max_width
            .saturating_sub(head.width() + right.width());
        Line::from(vec![
            Span::styled(head, style),
            Span::styled("─".repeat(fill), style),
            Span::styled(right.to_string(), style),
        ])
    }
}
