//! Tile records and the layout sequence shared by the reconciler, the engine
//! and both renderers.

mod core;

pub use core::{
    ClockIds, DROPPING_TILE_ID, DropGeometry, Layout, SequentialIds, Tile, TileId, TileIdSource,
    bottom, find, first_collision,
};
