//! Tile board: a drag-and-drop tile grid rendered twice, side by side.
//!
//! The [`Reconciler`] holds the canonical tile layout. A layout engine
//! ([`GridEngine`]) owns placement and collision handling for the left pane
//! and reports back through reconciler commands; the right pane draws the same
//! layout straight from its grid coordinates. [`BoardRuntime`] wires both to a
//! terminal.

pub mod engine;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod reconciler;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod tile;
pub mod width;

pub use engine::{
    EngineEvent, GridConfig, GridEngine, LayoutEngine, PixelBox, PositionParams, ResizeHandle,
};
pub use error::{BoardError, Result};
pub use geometry::{Rect, Size};
pub use layout::{ScreenLayout, Span, Track, solve_tracks};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{BoardMetrics, MetricSnapshot};
pub use reconciler::{BoardState, Command, Reconciler, Transition};
pub use registry::RowRegistry;
pub use render::{
    AnsiRenderer, Canvas, CompatHit, CompatRenderer, NativeGrid, NativePlacement,
    RendererSettings,
};
pub use runtime::driver::cli::{CliDriver, CliDriverError, DriverResult};
pub use runtime::{BoardEvent, BoardRuntime, Gesture, RuntimeConfig};
pub use tile::{
    ClockIds, DROPPING_TILE_ID, DropGeometry, Layout, SequentialIds, Tile, TileId, TileIdSource,
};
pub use width::display_width;
