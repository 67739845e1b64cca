use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Padding},
};
use ratatui_macros::span;
use tui_textarea::{CursorMove, Input, TextArea};

const MAX_HEIGHT: u16 = 8;

/// Text box holding the replacement of the query being edited. It opens
/// with the original text so Enter alone keeps it.
#[derive(Default)]
pub struct EditBox {
    index: Option<usize>,
    input: TextArea<'static>,
}

impl EditBox {
    pub fn open(&mut self, index: usize, text: &str) {
        let lines = text.lines().map(String::from).collect::<Vec<_>>();
        let mut input = TextArea::new(lines);
        input.set_cursor_line_style(Style::default());
        input.move_cursor(CursorMove::Bottom);
        input.move_cursor(CursorMove::End);
        self.input = input;
        self.index = Some(index);
    }

    pub fn close(&mut self) {
        self.index = None;
        self.input = TextArea::default();
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn text(&self) -> String {
        self.input.lines().join("\n")
    }

    pub fn input(&mut self, input: Input) {
        self.input.input(input);
    }

    pub fn insert_newline(&mut self) {
        self.input.insert_newline();
    }

    pub fn paste(&mut self, text: &str) {
        self.input.set_yank_text(text.replace('\r', "\n"));
        self.input.paste();
    }

    pub fn height(&self) -> u16 {
        (self.input.lines().len() as u16 + 2).min(MAX_HEIGHT)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, regenerating: bool) {
        let Some(index) = self.index else {
            return;
        };

        let instructions = if regenerating {
            vec![span!(" Regenerating... ").gray()]
        } else {
            vec![
                span!(" "),
                span!("Enter").green().bold(),
                span!(" to regenerate, ").white(),
                span!("Alt+Enter").green().bold(),
                span!(" for a new line, ").white(),
                span!("Esc").green().bold(),
                span!(" to cancel "),
            ]
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .padding(Padding::symmetric(1, 0))
            .title(Line::from(format!(" ✏️ Editing query [{}] ", index)).bold())
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(instructions));

        frame.render_widget(Clear, area);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(&self.input, inner);
    }
}
