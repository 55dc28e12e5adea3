use std::io::Write;

use crate::error::Result;
use crate::registry::RowRegistry;
use crate::width::{display_width, truncate_to_width};

/// Renderer runtime parameters.
#[derive(Debug, Clone, Default)]
pub struct RendererSettings {
    /// Where to park the cursor after a frame, as `(row, col)`.
    pub restore_cursor: Option<(u16, u16)>,
}

/// ANSI escape code renderer writing composed frames to a terminal handle.
///
/// Rows are hashed between frames; only rows whose content changed are
/// rewritten.
pub struct AnsiRenderer {
    settings: RendererSettings,
    rows: RowRegistry,
}

impl AnsiRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self {
            settings,
            rows: RowRegistry::new(),
        }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    /// Force the next frame to repaint every row.
    pub fn invalidate(&mut self) {
        self.rows.invalidate();
    }

    /// Write the changed rows of `frame`, each padded or cut to `width` cells.
    /// Returns how many rows were written.
    pub fn render(
        &mut self,
        writer: &mut impl Write,
        frame: &[String],
        width: u16,
    ) -> Result<usize> {
        let dirty = self.rows.sync_rows(frame);
        for (row, line) in &dirty {
            write!(writer, "\x1b[{};1H", row + 1)?;
            write!(writer, "{}", fit_line(line, width))?;
        }

        if let Some((row, col)) = self.settings.restore_cursor {
            write!(writer, "\x1b[{};{}H", row + 1, col + 1)?;
        }

        writer.flush()?;
        Ok(dirty.len())
    }
}

fn fit_line(line: &str, width: u16) -> String {
    let width = usize::from(width);
    let mut fitted = truncate_to_width(line, width);
    let mut display = display_width(&fitted);
    while display < width {
        fitted.push(' ');
        display += 1;
    }
    fitted
}
