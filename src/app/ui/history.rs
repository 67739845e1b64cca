use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Text},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Padding, Paragraph},
};
use ratatui_macros::span;
use unicode_width::UnicodeWidthStr;

use crate::models::StoryArchive;

use super::utils;

const NO_STORIES: &str = "No stories yet. Start your first story!";
const TITLE: &str = " 🕮 Story History ";

/// Popup listing every story told so far, the full text of the selected one
/// next to it. Opens on the newest story.
#[derive(Debug, Default)]
pub struct HistoryScreen {
    selected: Option<usize>,
}

impl HistoryScreen {
    pub fn showing(&self) -> bool {
        self.selected.is_some()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn toggle_showing(&mut self, len: usize) {
        if self.showing() {
            self.close();
        } else {
            self.selected = Some(len.saturating_sub(1));
        }
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn next_row(&mut self, len: usize) {
        if let Some(i) = self.selected {
            self.selected = Some((i + 1).min(len.saturating_sub(1)));
        }
    }

    pub fn prev_row(&mut self) {
        if let Some(i) = self.selected {
            self.selected = Some(i.saturating_sub(1));
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, archive: &StoryArchive) {
        let Some(selected) = self.selected else {
            return;
        };

        let instructions = vec![
            span!(" "),
            span!("Up/Down").green().bold(),
            span!(" to browse, ").white(),
            span!("Esc").green().bold(),
            span!(" to close ").white(),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::LightBlue))
            .padding(Padding::symmetric(1, 0))
            .title(Line::from(TITLE).bold())
            .title_alignment(Alignment::Center)
            .title_bottom(Line::from(instructions));

        frame.render_widget(Clear, area);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if archive.is_empty() {
            frame.render_widget(Paragraph::new(Line::from(NO_STORIES).gray()), inner);
            return;
        }

        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(inner);

        let items = archive
            .stories()
            .iter()
            .enumerate()
            .map(|(i, story)| {
                ListItem::new(format!(
                    "📖 Story {} · {}",
                    i + 1,
                    story.created_at().with_timezone(&chrono::Local).format("%H:%M")
                ))
            })
            .collect::<Vec<_>>();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(" Stories "),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut list_state = ListState::default().with_selected(Some(selected));
        frame.render_stateful_widget(list, layout[0], &mut list_state);

        let preview = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .padding(Padding::symmetric(1, 0))
            .title(format!(" Story {} ", selected + 1));
        let width = preview.inner(layout[1]).width as usize;
        let text = archive
            .stories()
            .get(selected)
            .map(|story| utils::split_to_lines(story.text(), width))
            .unwrap_or_default();
        let text = Text::from(text.into_iter().map(Line::from).collect::<Vec<_>>());
        frame.render_widget(Paragraph::new(text).block(preview), layout[1]);
    }
}

/// The side panel: one line per archived story.
pub fn render_panel(frame: &mut Frame, area: Rect, archive: &StoryArchive) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .padding(Padding::symmetric(1, 0))
        .title(TITLE);
    let width = block.inner(area).width as usize;

    if archive.is_empty() {
        let lines = utils::split_to_lines(NO_STORIES, width)
            .into_iter()
            .map(|line| Line::from(line).gray())
            .collect::<Vec<_>>();
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let items = archive
        .stories()
        .iter()
        .enumerate()
        .map(|(i, story)| {
            let label = format!("📖 Story {}: ", i + 1);
            let preview = utils::preview(story.text(), width.saturating_sub(label.width()));
            ListItem::new(format!("{}{}", label, preview))
        })
        .collect::<Vec<_>>();
    frame.render_widget(List::new(items).block(block), area);
}
