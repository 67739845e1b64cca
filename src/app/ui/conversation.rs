use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::app::session::{EditState, Session};

use super::bubble::{Bubble, Highlight};

const EMPTY_CONVERSATION: &str = "Ask for a story or continue the adventure...";
const AWAITING_REPLY: &str = "⚠️ The last query has no story yet. Press Ctrl+R to ask again.";

/// Every turn of the session as bubble lines, plus the first line of each
/// turn so the view can scroll to it.
pub fn build_lines(
    session: &Session,
    selected: Option<usize>,
    width: usize,
) -> (Vec<Line<'static>>, Vec<usize>) {
    let mut lines = vec![];
    let mut starts = vec![];

    for (index, turn) in session.conversation().turns().iter().enumerate() {
        let highlight = match session.state() {
            EditState::Editing(i) | EditState::Regenerating(i) if i == index => Highlight::Editing,
            _ if selected == Some(index) => Highlight::Selected,
            _ => Highlight::Plain,
        };
        starts.push(lines.len());
        lines.extend(
            Bubble::new(index, turn, width)
                .with_highlight(highlight)
                .as_lines(),
        );
    }

    if session.state() == EditState::Idle && session.conversation().is_awaiting_reply() {
        lines.push(Line::from(AWAITING_REPLY).fg(Color::Yellow));
    }
    (lines, starts)
}

pub fn render(frame: &mut Frame, area: Rect, session: &Session, selected: Option<usize>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" Conversation ")
        .style(Style::default());
    let inner = block.inner(area);

    if session.conversation().is_empty() {
        let hint = Paragraph::new(Line::from(EMPTY_CONVERSATION).gray())
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, area);
        return;
    }

    let (lines, starts) = build_lines(session, selected, inner.width as usize);
    let offset = scroll_offset(
        lines.len(),
        inner.height as usize,
        selected.or(session.edit_cursor()).and_then(|i| starts.get(i).copied()),
    );
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((offset as u16, 0));
    frame.render_widget(paragraph, area);
}

/// Show the focused turn from its top, otherwise stick to the bottom.
pub fn scroll_offset(total: usize, height: usize, focus: Option<usize>) -> usize {
    let bottom = total.saturating_sub(height);
    match focus {
        Some(start) => start.min(bottom),
        None => bottom,
    }
}
