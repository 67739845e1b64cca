#[cfg(test)]
#[path = "utils_test.rs"]
mod tests;

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn popup_area(area: Rect, percent_width: u16, percent_height: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_height)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_width)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// Word wrap `text` into lines no wider than `max_width` cells. Explicit line
/// breaks are kept and words longer than a line are cut.
pub fn split_to_lines(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = vec![];

    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_inclusive(' ') {
            if line.width() + word.trim_end().width() > max_width && !line.is_empty() {
                lines.push(line.trim_end().to_string());
                line = String::new();
            }

            if word.trim_end().width() > max_width {
                for c in word.chars() {
                    if line.width() + c.width().unwrap_or_default() > max_width {
                        lines.push(line);
                        line = String::new();
                    }
                    line.push(c);
                }
                continue;
            }
            line.push_str(word);
        }
        lines.push(line.trim_end().to_string());
    }
    lines
}

/// First line of `text`, cut to `max_width` cells with an ellipsis.
pub fn preview(text: &str, max_width: usize) -> String {
    let first = text.lines().next().unwrap_or_default();
    if first.width() <= max_width && !text.trim_end().contains('\n') {
        return first.to_string();
    }

    let mut cut = String::new();
    for c in first.chars() {
        if cut.width() + c.width().unwrap_or_default() + 3 > max_width {
            break;
        }
        cut.push(c);
    }
    format!("{}...", cut.trim_end())
}

/// Pad `text` with spaces up to `width` cells.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let len = text.width();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", text, " ".repeat(width - len))
}
