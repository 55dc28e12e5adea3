use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use thiserror::Error;

use crate::{BoardError, BoardRuntime, Size};

pub type DriverResult<T> = std::result::Result<T, CliDriverError>;

#[derive(Debug, Error)]
pub enum CliDriverError {
    #[error("runtime error: {0}")]
    Runtime(#[from] BoardError),
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Owns a `BoardRuntime` for the length of an interactive session: raw mode,
/// alternate screen and mouse capture are switched on for the run and always
/// switched back off afterwards.
pub struct CliDriver {
    runtime: BoardRuntime,
}

impl CliDriver {
    pub fn new(runtime: BoardRuntime) -> Self {
        Self { runtime }
    }

    /// Run until the user quits, handing the runtime back for inspection.
    pub fn run(mut self) -> DriverResult<BoardRuntime> {
        let mut stdout = io::stdout();
        self.enter(&mut stdout)?;
        let result = self.run_inner(&mut stdout);
        self.exit(&mut stdout);
        result.map(|_| self.runtime)
    }

    fn run_inner(&mut self, stdout: &mut impl Write) -> DriverResult<()> {
        let (width, height) = terminal::size()?;
        self.runtime.resize(Size::new(width, height));
        self.runtime.run(stdout)?;
        Ok(())
    }

    fn enter(&self, stdout: &mut impl Write) -> DriverResult<()> {
        terminal::enable_raw_mode().map_err(|err| CliDriverError::Terminal(err.to_string()))?;
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            Hide,
            Clear(ClearType::All)
        )?;
        Ok(())
    }

    fn exit(&self, stdout: &mut impl Write) {
        execute!(stdout, DisableMouseCapture, Show, LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().ok();
    }
}
