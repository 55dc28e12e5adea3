use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Identifier assigned to a tile when its drop completes.
pub type TileId = String;

/// Identifier the layout engine gives the provisional tile while a drop is in flight.
pub const DROPPING_TILE_ID: &str = "__dropping-elem__";

/// One placed rectangle on the board, measured in grid cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub i: TileId,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Tile {
    pub fn new(id: impl Into<TileId>, x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            i: id.into(),
            x,
            y,
            w,
            h,
        }
    }

    pub fn placeholder(x: i32, y: i32, geometry: DropGeometry) -> Self {
        Self::new(DROPPING_TILE_ID, x, y, geometry.w, geometry.h)
    }

    pub fn is_placeholder(&self) -> bool {
        self.i == DROPPING_TILE_ID
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Rectangle overlap test. A tile never collides with itself.
    pub fn collides(&self, other: &Tile) -> bool {
        if self.i == other.i {
            return false;
        }
        !(self.right() <= other.x
            || self.x >= other.right()
            || self.bottom() <= other.y
            || self.y >= other.bottom())
    }
}

/// Ordered tile sequence; order is the engine's render order.
pub type Layout = Vec<Tile>;

/// Lowest occupied row boundary, `0` for an empty layout.
pub fn bottom(layout: &[Tile]) -> i32 {
    layout.iter().map(Tile::bottom).max().unwrap_or(0).max(0)
}

pub fn find<'a>(layout: &'a [Tile], id: &str) -> Option<&'a Tile> {
    layout.iter().find(|tile| tile.i == id)
}

pub fn first_collision<'a>(layout: &'a [Tile], tile: &Tile) -> Option<&'a Tile> {
    layout.iter().find(|other| other.collides(tile))
}

/// Placeholder size handed to the engine while something is dragged over the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropGeometry {
    pub w: i32,
    pub h: i32,
}

impl Default for DropGeometry {
    fn default() -> Self {
        Self { w: 3, h: 3 }
    }
}

/// Source of fresh tile identifiers.
pub trait TileIdSource {
    fn next_id(&mut self) -> TileId;
}

/// Millisecond timestamps, bumped so two drops in the same millisecond stay distinct.
#[derive(Debug, Default)]
pub struct ClockIds {
    last: u128,
}

impl ClockIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TileIdSource for ClockIds {
    fn next_id(&mut self) -> TileId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        self.last = now.max(self.last + 1);
        self.last.to_string()
    }
}

/// Deterministic counter, handy for scripted runs.
#[derive(Debug, Default)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl TileIdSource for SequentialIds {
    fn next_id(&mut self) -> TileId {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
