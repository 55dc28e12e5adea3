//! Layout engine seam.
//!
//! The reconciler never computes geometry itself; it only receives the
//! callbacks an engine emits. [`GridEngine`] is the in-crate implementation
//! with collision detection and optional vertical compaction.

pub mod compact;
mod grid_engine;
pub mod position;

pub use grid_engine::GridEngine;
pub use position::{GridConfig, PixelBox, PositionParams, ResizeHandle};

use crate::tile::{DropGeometry, Layout, Tile};

/// Callback emitted by a layout engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Geometry changed after a move, resize or reflow.
    LayoutChange(Layout),
    /// An external drop completed; the layout still carries the dropping placeholder.
    Drop(Layout),
}

/// Behaviour the compatibility renderer drives. Positions and sizes are grid cells.
pub trait LayoutEngine {
    /// Replace the engine's layout with the canonical one, as a prop update would.
    fn sync(&mut self, layout: &[Tile], compact: bool) -> Vec<EngineEvent>;

    fn layout(&self) -> &[Tile];

    fn is_compacting(&self) -> bool;

    fn drag_start(&mut self, id: &str) -> Vec<EngineEvent>;

    fn drag(&mut self, id: &str, x: i32, y: i32) -> Vec<EngineEvent>;

    fn drag_stop(&mut self, id: &str, x: i32, y: i32) -> Vec<EngineEvent>;

    fn resize_start(&mut self, id: &str, handle: ResizeHandle) -> Vec<EngineEvent>;

    fn resize(&mut self, id: &str, w: i32, h: i32) -> Vec<EngineEvent>;

    fn resize_stop(&mut self, id: &str, w: i32, h: i32) -> Vec<EngineEvent>;

    /// Something external hovers the grid at cell `x`,`y`.
    fn drag_over(&mut self, x: i32, y: i32, geometry: DropGeometry) -> Vec<EngineEvent>;

    fn drag_leave(&mut self) -> Vec<EngineEvent>;

    /// The external drag was released over the grid.
    fn finish_drop(&mut self) -> Vec<EngineEvent>;
}
