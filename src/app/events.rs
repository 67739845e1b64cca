#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEventKind};
use futures::StreamExt;
use tui_textarea::{Input, Key};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Quit,
    KeyboardEnter,
    KeyboardNewLine,
    KeyboardEsc,
    KeyboardCtrlE,
    KeyboardCtrlL,
    KeyboardCtrlR,
    KeyboardCtrlH,
    KeyboardPaste(String),
    KeyboardCharInput(Input),
    UiScrollUp,
    UiScrollDown,
    UiResize,
}

/// Terminal events, already translated for the app.
pub struct EventService {
    crossterm_events: EventStream,
}

impl EventService {
    /// Waits for the next event the app cares about. `None` once the
    /// terminal stops delivering events.
    pub async fn next(&mut self) -> Option<Event> {
        loop {
            match self.crossterm_events.next().await? {
                Ok(event) => {
                    if let Some(event) = handle_crossterm(event) {
                        return Some(event);
                    }
                }
                Err(err) => log::warn!("Reading terminal event: {}", err),
            }
        }
    }
}

impl Default for EventService {
    fn default() -> Self {
        Self {
            crossterm_events: EventStream::new(),
        }
    }
}

pub fn handle_crossterm(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Paste(text) => Some(Event::KeyboardPaste(text)),
        CrosstermEvent::Resize(_, _) => Some(Event::UiResize),
        CrosstermEvent::Key(key_event) => {
            if key_event.kind == KeyEventKind::Release {
                return None;
            }

            let input: Input = key_event.into();
            if input.key == Key::Enter && (input.shift || input.alt) {
                return Some(Event::KeyboardNewLine);
            }

            if input.ctrl {
                return match input.key {
                    Key::Char('c') | Key::Char('q') => Some(Event::Quit),
                    Key::Char('e') => Some(Event::KeyboardCtrlE),
                    Key::Char('l') => Some(Event::KeyboardCtrlL),
                    Key::Char('r') => Some(Event::KeyboardCtrlR),
                    Key::Char('h') => Some(Event::KeyboardCtrlH),
                    // Editing shortcuts of the text area
                    _ => Some(Event::KeyboardCharInput(input)),
                };
            }

            match input.key {
                Key::Esc => Some(Event::KeyboardEsc),
                Key::Enter => Some(Event::KeyboardEnter),
                Key::Up => Some(Event::UiScrollUp),
                Key::Down => Some(Event::UiScrollDown),
                _ => Some(Event::KeyboardCharInput(input)),
            }
        }
        _ => None,
    }
}
