pub mod app;
pub mod audio;
pub mod controller;
pub mod events;
pub mod session;
pub mod ui;

use std::io;

pub use app::App;
pub use controller::Controller;
pub use session::{EditState, Instruction, Session};

use crossterm::{
    cursor,
    event::DisableBracketedPaste,
    terminal::{LeaveAlternateScreen, disable_raw_mode, is_raw_mode_enabled},
};

/// Give the terminal back before a panic message is printed.
pub fn destruct_terminal_for_panic() {
    if let Ok(true) = is_raw_mode_enabled() {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste);
        let _ = crossterm::execute!(io::stdout(), cursor::Show);
    }
}
