use ratatui::{style::Stylize, text::Line};
use ratatui_macros::span;

use crate::app::session::{EditState, Session};

/// Key hints for the status bar, depending on what the keys do right now.
pub fn help_line(session: &Session, history_showing: bool) -> Line<'static> {
    let keys: &[(&str, &str)] = if history_showing {
        &[("Up/Down", "browse"), ("Esc", "close")]
    } else {
        match session.state() {
            EditState::Editing(_) => &[
                ("Enter", "regenerate"),
                ("Esc", "cancel"),
                ("Ctrl+L", "listen"),
                ("Ctrl+Q", "quit"),
            ],
            EditState::Regenerating(_) => &[("", "Regenerating your story...")],
            EditState::Idle => &[
                ("Enter", "ask"),
                ("Up/Down", "select"),
                ("Ctrl+E", "edit"),
                ("Ctrl+L", "listen"),
                ("Ctrl+R", "retry"),
                ("Ctrl+H", "history"),
                ("Ctrl+Q", "quit"),
            ],
        }
    };

    let mut spans = vec![span!(" ")];
    for (i, (key, action)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(span!(" · ").dark_gray());
        }
        if !key.is_empty() {
            spans.push(span!("{} ", key).green().bold());
        }
        spans.push(span!(*action).gray());
    }
    Line::from(spans)
}
