use std::io::{self, IsTerminal, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

/// Where dashboard frames go.
pub trait Screen {
    fn draw(&mut self, frame: &str) -> io::Result<()>;

    /// Shows a non-fatal problem below the current frame.
    fn report(&mut self, message: &str);
}

/// Stdout screen. Hides the cursor while held and restores it on drop, which
/// covers normal exit, signal shutdown and unwinding.
///
/// When stdout is not a terminal, or the cursor cannot be hidden, frames are
/// written as plain text with no escape sequences.
pub struct TerminalScreen {
    out: Stdout,
    interactive: bool,
    cursor_hidden: bool,
}

impl TerminalScreen {
    pub fn acquire() -> Self {
        let mut out = io::stdout();
        let mut interactive = out.is_terminal();
        let mut cursor_hidden = false;
        if interactive {
            match execute!(out, Hide) {
                Ok(()) => cursor_hidden = true,
                Err(err) => {
                    tracing::warn!("terminal unavailable, falling back to plain output: {}", err);
                    interactive = false;
                }
            }
        }
        Self {
            out,
            interactive,
            cursor_hidden,
        }
    }

    /// Whether frames may carry color escape codes.
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn restore(&mut self) {
        if self.cursor_hidden {
            let _ = execute!(self.out, Show);
            self.cursor_hidden = false;
        }
        let _ = self.out.flush();
    }
}

impl Screen for TerminalScreen {
    fn draw(&mut self, frame: &str) -> io::Result<()> {
        let mut out = self.out.lock();
        if self.interactive {
            crossterm::queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        writeln!(out, "{frame}")?;
        out.flush()
    }

    fn report(&mut self, message: &str) {
        let mut out = self.out.lock();
        let _ = writeln!(out, "{message}");
        let _ = out.flush();
    }
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        self.restore();
    }
}
