#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;

pub mod bubble;
pub mod conversation;
pub mod edit;
pub mod help;
pub mod history;
pub mod notice;
pub mod utils;

pub use bubble::Bubble;
pub use edit::EditBox;
pub use history::HistoryScreen;
pub use notice::{Notice, NoticeLevel};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};
use ratatui_macros::span;
use tui_textarea::TextArea;

use super::session::{EditState, Session};

pub const TITLE: &str = "📜 Historical Storyteller for Kids";
pub const CAPTION: &str = "Ask for stories, listen to them, and edit your queries.";

pub const MIN_WIDTH: u16 = 60;
const HISTORY_PANEL_WIDTH: u16 = 36;
const MAX_INPUT_HEIGHT: u16 = 6;

/// Everything on screen that is not part of the session: text being typed,
/// the turn under the cursor and transient messages.
pub struct Screen {
    pub input: TextArea<'static>,
    pub edit_box: EditBox,
    pub history: HistoryScreen,
    pub selected: Option<usize>,
    pub notice: Option<Notice>,
    pub loading: Option<&'static str>,
}

impl Screen {
    /// Take the typed query and clear the input.
    pub fn take_input(&mut self) -> String {
        let text = self.input.lines().join("\n");
        self.input = build_input();
        text
    }

    pub fn select_prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => i.saturating_sub(1),
            None => len - 1,
        });
    }

    pub fn select_next(&mut self, len: usize) {
        self.selected = match self.selected {
            Some(i) if i + 1 < len => Some(i + 1),
            _ => None,
        };
    }

    /// Open or close the edit box to follow the session's edit state.
    pub fn sync_edit_box(&mut self, session: &Session) {
        match session.state() {
            EditState::Editing(index) | EditState::Regenerating(index) => {
                if self.edit_box.index() != Some(index) {
                    let original = session
                        .conversation()
                        .get(index)
                        .map(|turn| turn.content())
                        .unwrap_or_default();
                    self.edit_box.open(index, original);
                }
            }
            EditState::Idle => self.edit_box.close(),
        }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            input: build_input(),
            edit_box: EditBox::default(),
            history: HistoryScreen::default(),
            selected: None,
            notice: None,
            loading: None,
        }
    }
}

fn build_input() -> TextArea<'static> {
    let mut input = TextArea::default();
    input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::LightMagenta))
            .padding(Padding::symmetric(1, 0))
            .title(" Ask for a story "),
    );
    input.set_cursor_line_style(Style::default());
    input.set_placeholder_text("Tell me about ancient Rome...");
    input
}

/// Draw the whole screen. Turns, edit state and stories are read from the
/// session on every frame.
pub fn draw(frame: &mut Frame, session: &Session, screen: &Screen) {
    let area = frame.area();
    if area.width < MIN_WIDTH {
        let lines = utils::split_to_lines(
            &format!(
                "I'm too small, make me bigger! I need at least {} cells (current: {})",
                MIN_WIDTH, area.width
            ),
            area.width as usize,
        );
        let lines = lines.into_iter().map(Line::from).collect::<Vec<_>>();
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), area);
        return;
    }

    let editing = session.is_editing();
    let edit_height = if editing { screen.edit_box.height() } else { 0 };
    let input_height = if editing || screen.loading.is_some() {
        3
    } else {
        (screen.input.lines().len() as u16 + 2).min(MAX_INPUT_HEIGHT)
    };

    let [header, body, edit, input, status] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(1),
        Constraint::Length(edit_height),
        Constraint::Length(input_height),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(vec![
            Line::from(span!(" {}", TITLE).bold()),
            Line::from(span!(" {}", CAPTION).gray()),
        ]),
        header,
    );

    let [convo, panel] =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(HISTORY_PANEL_WIDTH)])
            .areas(body);
    conversation::render(frame, convo, session, screen.selected);
    history::render_panel(frame, panel, session.conversation().archive());

    if editing {
        let regenerating = matches!(session.state(), EditState::Regenerating(_));
        screen.edit_box.render(frame, edit, regenerating);
    }

    if let Some(loading) = screen.loading {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .padding(Padding::symmetric(1, 0));
        frame.render_widget(Paragraph::new(span!(loading).gray()).block(block), input);
    } else if editing {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .padding(Padding::symmetric(1, 0));
        let disabled = Paragraph::new(span!("Finish or cancel the edit to ask something new").dark_gray());
        frame.render_widget(disabled.block(block), input);
    } else {
        frame.render_widget(&screen.input, input);
    }

    let status_line = match &screen.notice {
        Some(notice) => notice.as_line(),
        None => help::help_line(session, screen.history.showing()),
    };
    frame.render_widget(Paragraph::new(status_line), status);

    screen
        .history
        .render(frame, utils::popup_area(area, 80, 80), session.conversation().archive());
}
