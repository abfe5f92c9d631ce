use std::io::{self, Write};

use gauge_app::Screen;

/// Prints each frame once, without clearing; used by the one-shot command.
#[derive(Debug, Default)]
pub struct PrintScreen {
    quiet: bool,
}

impl PrintScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swallows frames, for callers that print their own output.
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl Screen for PrintScreen {
    fn draw(&mut self, frame: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut out = io::stdout().lock();
        writeln!(out, "{frame}")?;
        out.flush()
    }

    fn report(&mut self, message: &str) {
        eprintln!("{message}");
    }
}
