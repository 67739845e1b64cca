use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A one line message in the status bar, dropped on the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    level: NoticeLevel,
    message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn level(&self) -> NoticeLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn as_line(&self) -> Line<'static> {
        let (prefix, color) = match self.level {
            NoticeLevel::Info => ("", Color::LightGreen),
            NoticeLevel::Warning => ("Warning: ", Color::Yellow),
            NoticeLevel::Error => ("Error: ", Color::LightRed),
        };
        Line::from(Span::styled(
            format!(" {}{}", prefix, self.message),
            Style::default().fg(color),
        ))
    }
}
