//! Tile board demo
//!
//! Drag the `[ Draggable ]` token onto the left pane to add a 3×3 tile. Tiles
//! can be moved by their body, resized from the bottom and side edges, and
//! removed with `[x]`. The right pane draws the same layout straight from its
//! grid coordinates.
//!
//! Keys: `c` toggles vertical compaction, `q`/`Esc` quits.
//! Set `TILE_BOARD_LOG=<path>` to write JSON-lines logs.

use std::time::Duration;

use tile_board::{AnsiRenderer, BoardRuntime, CliDriver, RuntimeConfig, Size};

const LOG_MAX_BYTES: u64 = 4 * 1024 * 1024;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = RuntimeConfig {
        tick_interval: Duration::from_millis(100),
        ..RuntimeConfig::default()
    };
    if let Ok(path) = std::env::var("TILE_BOARD_LOG") {
        config = config.with_log_file(path, LOG_MAX_BYTES)?;
    }

    let runtime = BoardRuntime::new(config, AnsiRenderer::with_default(), Size::new(120, 40));
    let runtime = CliDriver::new(runtime).run()?;

    println!(
        "{} tile(s) on the board at exit",
        runtime.reconciler().layout().len()
    );
    Ok(())
}
