#[cfg(test)]
#[path = "app_test.rs"]
mod tests;

use std::io;

use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use eyre::Result;
use ratatui::{
    Terminal,
    prelude::{Backend, CrosstermBackend},
};
use tui_textarea::Key;

use crate::config::NarrationConfig;
use crate::models::{Action, Outcome};

use super::audio;
use super::controller::Controller;
use super::events::{Event, EventService};
use super::session::Session;
use super::ui::{self, Notice, Screen};

/// What the loop does after a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Continue,
    Dispatch(Action),
    Quit,
}

pub struct App {
    controller: Controller,
    session: Session,
    narration: NarrationConfig,
    screen: Screen,
}

impl App {
    pub fn new(controller: Controller, narration: NarrationConfig) -> App {
        App {
            controller,
            session: Session::new(),
            narration,
            screen: Screen::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();

        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

        let term_backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(term_backend)?;
        let mut events = EventService::default();
        let result = self.start_loop(&mut terminal, &mut events).await;

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        )?;

        terminal.show_cursor()?;
        result
    }

    async fn start_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut EventService,
    ) -> Result<()> {
        loop {
            self.render(terminal)?;
            let Some(event) = events.next().await else {
                return Ok(());
            };

            match self.handle_event(event) {
                Flow::Continue => {}
                Flow::Quit => return Ok(()),
                Flow::Dispatch(action) => {
                    self.screen.loading = loading_text(&action);
                    if self.screen.loading.is_some() {
                        self.render(terminal)?;
                    }
                    self.perform(action).await;
                    self.screen.loading = None;
                }
            }
        }
    }

    pub fn render<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<()> {
        terminal.draw(|f| ui::draw(f, &self.session, &self.screen))?;
        Ok(())
    }

    /// Apply a key press to the screen. Anything that changes the
    /// conversation comes back as an action for [`App::perform`].
    pub fn handle_event(&mut self, event: Event) -> Flow {
        if event == Event::UiResize {
            return Flow::Continue;
        }
        self.screen.notice = None;

        if event == Event::Quit {
            return Flow::Quit;
        }

        if self.screen.history.showing() {
            self.handle_history_event(event);
            return Flow::Continue;
        }

        match self.session.edit_cursor() {
            Some(index) => self.handle_edit_event(index, event),
            None => self.handle_input_event(event),
        }
    }

    fn handle_history_event(&mut self, event: Event) {
        let len = self.session.conversation().archive().len();
        match event {
            Event::KeyboardEsc | Event::KeyboardCtrlH => self.screen.history.close(),
            Event::KeyboardCharInput(input) if input.key == Key::Char('q') => {
                self.screen.history.close()
            }
            Event::UiScrollUp => self.screen.history.prev_row(),
            Event::UiScrollDown => self.screen.history.next_row(len),
            _ => {}
        }
    }

    fn handle_edit_event(&mut self, index: usize, event: Event) -> Flow {
        match event {
            Event::KeyboardEnter => {
                let text = self.screen.edit_box.text();
                if !text.trim().is_empty() {
                    return Flow::Dispatch(Action::Confirm(text));
                }
                // An emptied box keeps the query as it was.
                let original = self
                    .session
                    .conversation()
                    .get(index)
                    .map(|turn| turn.content().to_string())
                    .unwrap_or_default();
                Flow::Dispatch(Action::Confirm(original))
            }
            Event::KeyboardEsc => Flow::Dispatch(Action::Cancel),
            Event::KeyboardNewLine => {
                self.screen.edit_box.insert_newline();
                Flow::Continue
            }
            Event::KeyboardPaste(text) => {
                self.screen.edit_box.paste(&text);
                Flow::Continue
            }
            Event::KeyboardCharInput(input) => {
                self.screen.edit_box.input(input);
                Flow::Continue
            }
            event => self.handle_turn_event(event),
        }
    }

    fn handle_input_event(&mut self, event: Event) -> Flow {
        match event {
            Event::KeyboardEnter => {
                let text = self.screen.take_input();
                if text.trim().is_empty() {
                    return Flow::Continue;
                }
                self.screen.selected = None;
                Flow::Dispatch(Action::Submit(text))
            }
            Event::KeyboardEsc => {
                self.screen.selected = None;
                Flow::Continue
            }
            Event::KeyboardNewLine => {
                self.screen.input.insert_newline();
                Flow::Continue
            }
            Event::KeyboardPaste(text) => {
                self.screen.input.set_yank_text(text.replace('\r', "\n"));
                self.screen.input.paste();
                Flow::Continue
            }
            Event::KeyboardCharInput(input) => {
                self.screen.input.input(input);
                Flow::Continue
            }
            event => self.handle_turn_event(event),
        }
    }

    // Keys acting on the selected turn, the same while editing or not.
    fn handle_turn_event(&mut self, event: Event) -> Flow {
        let convo = self.session.conversation();
        match event {
            Event::UiScrollUp => self.screen.select_prev(convo.len()),
            Event::UiScrollDown => self.screen.select_next(convo.len()),
            Event::KeyboardCtrlH => self.screen.history.toggle_showing(convo.archive().len()),
            Event::KeyboardCtrlE => {
                let target = self
                    .screen
                    .selected
                    .or_else(|| convo.turns().iter().rposition(|turn| turn.is_user()));
                match target {
                    Some(index) => return Flow::Dispatch(Action::Edit(index)),
                    None => self.screen.notice = Some(Notice::warning("No query to edit yet.")),
                }
            }
            Event::KeyboardCtrlL => {
                let target = self
                    .screen
                    .selected
                    .or_else(|| convo.turns().iter().rposition(|turn| turn.is_assistant()));
                match target {
                    Some(index) => return Flow::Dispatch(Action::Listen(index)),
                    None => {
                        self.screen.notice = Some(Notice::warning("No story to listen to yet."))
                    }
                }
            }
            Event::KeyboardCtrlR => return Flow::Dispatch(Action::Retry),
            _ => {}
        }
        Flow::Continue
    }

    /// Run an action against the session and report the outcome on screen.
    pub async fn perform(&mut self, action: Action) {
        let listen = match action {
            Action::Listen(index) => Some(index),
            _ => None,
        };

        match self.controller.dispatch(&mut self.session, action).await {
            Ok(Outcome::Audio(audio)) => {
                let index = listen.unwrap_or_default();
                self.screen.notice = Some(match self.narrate(index, &audio).await {
                    Ok(notice) => notice,
                    Err(err) => {
                        log::error!("Narration output failed: {:?}", err);
                        Notice::error(err.to_string())
                    }
                });
            }
            Ok(Outcome::Reply(_)) => self.screen.selected = None,
            Ok(Outcome::Updated) => {}
            Err(err) => {
                log::warn!("Action failed: {}", err);
                self.screen.notice = Some(Notice::error(err.to_string()));
            }
        }
        self.screen.sync_edit_box(&self.session);
    }

    async fn narrate(&self, index: usize, audio: &[u8]) -> Result<Notice> {
        let path = audio::save_audio(
            &self.narration.output_dir,
            index,
            &self.narration.format,
            audio,
        )
        .await?;

        if let Some(player) = self.narration.player.as_deref() {
            audio::play(player, &path)?;
            return Ok(Notice::info(format!("🎧 Playing {}", path.display())));
        }
        Ok(Notice::info(format!(
            "🎧 Narration saved to {}",
            path.display()
        )))
    }
}

fn loading_text(action: &Action) -> Option<&'static str> {
    match action {
        Action::Submit(_) | Action::Confirm(_) | Action::Retry => {
            Some("Weaving your story... ✨")
        }
        Action::Listen(_) => Some("🎧 Preparing your story narration..."),
        Action::Edit(_) | Action::Cancel => None,
    }
}
