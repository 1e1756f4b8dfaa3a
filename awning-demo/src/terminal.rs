//! Raw-mode terminal session for the demo.

use std::io::{self, Stdout};
use std::ops::{Deref, DerefMut};
use std::panic;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type DemoTerminal = Terminal<CrosstermBackend<Stdout>>;

/// A raw-mode, alternate-screen, mouse-capturing terminal session.
///
/// Derefs to the ratatui terminal. The session is ended on drop and from
/// the panic hook, so the shell is restored however the demo exits.
pub struct Session(DemoTerminal);

impl Session {
    pub fn start() -> io::Result<Self> {
        let hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let _ = end();
            hook(info);
        }));

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self(terminal))
    }
}

impl Deref for Session {
    type Target = DemoTerminal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = end();
    }
}

fn end() -> io::Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    disable_raw_mode()
}
