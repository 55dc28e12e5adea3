//! Engine-backed rendering of the canonical layout.
//!
//! The renderer owns the layout engine. It pushes the reconciler's state into
//! the engine, turns engine callbacks into reconciler [`Command`]s without
//! altering them, and paints whatever placement the engine currently holds,
//! placeholder included.

use crate::engine::{
    EngineEvent, GridConfig, GridEngine, LayoutEngine, PixelBox, PositionParams, ResizeHandle,
};
use crate::reconciler::{BoardState, Command};
use crate::tile::{DropGeometry, Tile, TileId, find};

use super::canvas::{BorderStyle, Canvas};

const DELETE_LABEL: &str = "[x]";

/// What sits under a pointer inside the compatibility container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompatHit {
    Delete(TileId),
    Resize(TileId, ResizeHandle),
    Body(TileId),
}

#[derive(Debug, Clone)]
struct ResizeAnchor {
    id: TileId,
    handle: ResizeHandle,
    tile: Tile,
    frame: PixelBox,
}

pub struct CompatRenderer<E: LayoutEngine = GridEngine> {
    engine: E,
    config: GridConfig,
    container_width: f64,
    resize_anchor: Option<ResizeAnchor>,
}

impl CompatRenderer<GridEngine> {
    pub fn with_grid_engine(config: GridConfig) -> Self {
        let engine = GridEngine::new(&config);
        Self::new(engine, config)
    }
}

impl<E: LayoutEngine> CompatRenderer<E> {
    pub fn new(engine: E, config: GridConfig) -> Self {
        Self {
            engine,
            config,
            container_width: 0.0,
            resize_anchor: None,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Placement the engine currently shows, placeholder included.
    pub fn engine_layout(&self) -> &[Tile] {
        self.engine.layout()
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn set_container_width(&mut self, width: u16) {
        self.container_width = f64::from(width);
    }

    pub fn params(&self) -> PositionParams {
        self.config.position_params(self.container_width)
    }

    /// Hand the canonical state to the engine.
    pub fn sync(&mut self, state: &BoardState) -> Vec<Command> {
        let events = self.engine.sync(&state.layout, state.compact);
        relay(events)
    }

    pub fn tile_boxes(&self) -> Vec<(TileId, PixelBox)> {
        let params = self.params();
        self.engine
            .layout()
            .iter()
            .map(|tile| (tile.i.clone(), params.calc_position(tile)))
            .collect()
    }

    pub fn container_height(&self) -> i32 {
        self.params().container_height(self.engine.layout())
    }

    /// Topmost tile wins; the placeholder is not interactive.
    pub fn hit_test(&self, left: i32, top: i32) -> Option<CompatHit> {
        let params = self.params();
        let tile = self
            .engine
            .layout()
            .iter()
            .rev()
            .find(|tile| params.calc_position(tile).contains(left, top))?;
        if tile.is_placeholder() {
            return None;
        }

        let frame = params.calc_position(tile);
        if delete_button(&frame).contains(left, top) {
            return Some(CompatHit::Delete(tile.i.clone()));
        }
        if let Some(handle) = self.handle_at(&frame, left, top) {
            return Some(CompatHit::Resize(tile.i.clone(), handle));
        }
        Some(CompatHit::Body(tile.i.clone()))
    }

    fn handle_at(&self, frame: &PixelBox, left: i32, top: i32) -> Option<ResizeHandle> {
        let on_left = left == frame.left;
        let on_right = left == frame.right() - 1;
        let on_bottom = top == frame.bottom() - 1;
        let handle = match (on_left, on_right, on_bottom) {
            (true, _, true) => ResizeHandle::Sw,
            (_, true, true) => ResizeHandle::Se,
            (_, _, true) => ResizeHandle::S,
            (true, _, false) => ResizeHandle::W,
            (_, true, false) => ResizeHandle::E,
            _ => return None,
        };
        self.config
            .resize_handles
            .contains(&handle)
            .then_some(handle)
    }

    pub fn drag_over(&mut self, left: i32, top: i32, geometry: DropGeometry) -> Vec<Command> {
        let (x, y) = self
            .params()
            .calc_xy(f64::from(top), f64::from(left), geometry.w, geometry.h);
        relay(self.engine.drag_over(x, y, geometry))
    }

    pub fn drag_leave(&mut self) -> Vec<Command> {
        relay(self.engine.drag_leave())
    }

    pub fn drop(&mut self) -> Vec<Command> {
        relay(self.engine.finish_drop())
    }

    pub fn drag_start(&mut self, id: &str) -> Vec<Command> {
        relay(self.engine.drag_start(id))
    }

    /// Move the tile so its top-left corner sits at the container point.
    pub fn drag_to(&mut self, id: &str, left: i32, top: i32) -> Vec<Command> {
        match self.cell_for(id, left, top) {
            Some((x, y)) => relay(self.engine.drag(id, x, y)),
            None => Vec::new(),
        }
    }

    pub fn drag_stop(&mut self, id: &str, left: i32, top: i32) -> Vec<Command> {
        match self.cell_for(id, left, top) {
            Some((x, y)) => relay(self.engine.drag_stop(id, x, y)),
            None => Vec::new(),
        }
    }

    fn cell_for(&self, id: &str, left: i32, top: i32) -> Option<(i32, i32)> {
        let tile = find(self.engine.layout(), id)?;
        Some(
            self.params()
                .calc_xy(f64::from(top), f64::from(left), tile.w, tile.h),
        )
    }

    pub fn resize_start(&mut self, id: &str, handle: ResizeHandle) -> Vec<Command> {
        let Some(tile) = find(self.engine.layout(), id).cloned() else {
            return Vec::new();
        };
        let frame = self.params().calc_position(&tile);
        self.resize_anchor = Some(ResizeAnchor {
            id: id.to_string(),
            handle,
            tile,
            frame,
        });
        relay(self.engine.resize_start(id, handle))
    }

    /// Resize following a pointer at the given container point.
    pub fn resize_to(&mut self, id: &str, left: i32, top: i32) -> Vec<Command> {
        match self.size_for(id, left, top) {
            Some((w, h)) => relay(self.engine.resize(id, w, h)),
            None => Vec::new(),
        }
    }

    pub fn resize_stop(&mut self, id: &str, left: i32, top: i32) -> Vec<Command> {
        let size = self.size_for(id, left, top);
        self.resize_anchor = None;
        match size {
            Some((w, h)) => relay(self.engine.resize_stop(id, w, h)),
            None => Vec::new(),
        }
    }

    fn size_for(&self, id: &str, left: i32, top: i32) -> Option<(i32, i32)> {
        let anchor = self.resize_anchor.as_ref().filter(|anchor| anchor.id == id)?;
        let frame = anchor.frame;
        let width = if anchor.handle.moves_west_edge() {
            frame.right() - left
        } else {
            left - frame.left + 1
        };
        let height = top - frame.top + 1;
        let anchor_x = if anchor.handle.moves_west_edge() {
            0
        } else {
            anchor.tile.x
        };
        Some(self.params().calc_wh(
            f64::from(width.max(1)),
            f64::from(height.max(1)),
            anchor_x,
            anchor.tile.y,
        ))
    }

    /// Paint the engine's current placement onto a canvas the size of the container.
    pub fn paint(&self, canvas: &mut Canvas) {
        let params = self.params();
        for tile in self.engine.layout() {
            let frame = params.calc_position(tile);
            if tile.is_placeholder() {
                canvas.fill(frame.left, frame.top, frame.width, frame.height, '░');
                canvas.draw_box(
                    frame.left,
                    frame.top,
                    frame.width,
                    frame.height,
                    BorderStyle::Dashed,
                );
                continue;
            }

            canvas.fill(frame.left, frame.top, frame.width, frame.height, ' ');
            canvas.draw_box(
                frame.left,
                frame.top,
                frame.width,
                frame.height,
                BorderStyle::Solid,
            );
            let button = delete_button(&frame);
            canvas.put_str(button.left, button.top, DELETE_LABEL);
            if frame.height > 2 {
                canvas.put_centered(
                    frame.left + 1,
                    frame.top + frame.height / 2,
                    frame.width - 2,
                    &tile.i,
                );
            }
        }
    }
}

/// Delete affordance in the top-right corner of a tile's frame.
pub fn delete_button(frame: &PixelBox) -> PixelBox {
    let width = DELETE_LABEL.len() as i32;
    PixelBox {
        left: (frame.right() - 1 - width).max(frame.left),
        top: frame.top,
        width,
        height: 1,
    }
}

/// Engine callbacks become reconciler commands unchanged.
pub fn relay(events: Vec<EngineEvent>) -> Vec<Command> {
    events
        .into_iter()
        .map(|event| match event {
            EngineEvent::LayoutChange(layout) => Command::LayoutChanged(layout),
            EngineEvent::Drop(layout) => Command::Drop(layout),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::DROPPING_TILE_ID;

    // 12 columns of 3 cells with 1-cell gaps.
    fn renderer() -> CompatRenderer {
        let mut renderer = CompatRenderer::with_grid_engine(GridConfig::terminal());
        renderer.set_container_width(47);
        renderer
    }

    fn state(layout: Vec<Tile>, compact: bool) -> BoardState {
        BoardState {
            layout,
            dragging: false,
            compact,
        }
    }

    #[test]
    fn terminal_geometry_for_default_tile() {
        let mut renderer = renderer();
        renderer.sync(&state(vec![Tile::new("a", 1, 0, 3, 3)], true));
        let boxes = renderer.tile_boxes();
        assert_eq!(
            boxes[0].1,
            PixelBox {
                left: 4,
                top: 0,
                width: 11,
                height: 8,
            }
        );
        assert_eq!(renderer.container_height(), 8);
    }

    #[test]
    fn hit_test_finds_delete_handles_and_body() {
        let mut renderer = renderer();
        renderer.sync(&state(vec![Tile::new("a", 1, 0, 3, 3)], true));
        // frame spans cols 4..15, rows 0..8
        assert_eq!(renderer.hit_test(11, 0), Some(CompatHit::Delete("a".into())));
        assert_eq!(
            renderer.hit_test(14, 7),
            Some(CompatHit::Resize("a".into(), ResizeHandle::Se))
        );
        assert_eq!(
            renderer.hit_test(4, 3),
            Some(CompatHit::Resize("a".into(), ResizeHandle::W))
        );
        assert_eq!(
            renderer.hit_test(8, 7),
            Some(CompatHit::Resize("a".into(), ResizeHandle::S))
        );
        assert_eq!(renderer.hit_test(8, 3), Some(CompatHit::Body("a".into())));
        assert_eq!(renderer.hit_test(30, 3), None);
    }

    #[test]
    fn drop_relays_engine_proposal() {
        let mut renderer = renderer();
        let hover = renderer.drag_over(17, 5, DropGeometry::default());
        assert!(matches!(hover.as_slice(), [Command::LayoutChanged(_)]));

        let commands = renderer.drop();
        match commands.as_slice() {
            [Command::Drop(layout)] => {
                assert_eq!(layout[0].i, DROPPING_TILE_ID);
                assert_eq!((layout[0].x, layout[0].y), (4, 0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn resize_follows_pointer() {
        let mut renderer = renderer();
        renderer.sync(&state(vec![Tile::new("a", 0, 0, 3, 3)], true));
        renderer.resize_start("a", ResizeHandle::Se);
        // pointer over column 5 (cells 20..23), row 4 (cells 12..14)
        let commands = renderer.resize_stop("a", 22, 13);
        match commands.as_slice() {
            [Command::LayoutChanged(layout)] => {
                assert_eq!((layout[0].w, layout[0].h), (6, 5));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn paint_draws_frames_and_delete_button() {
        let mut renderer = renderer();
        renderer.sync(&state(vec![Tile::new("a", 0, 0, 2, 1)], true));
        let mut canvas = Canvas::new(47, 4);
        renderer.paint(&mut canvas);
        let rows = canvas.rows();
        assert!(rows[0].starts_with("┌──[x]┐"));
        assert!(rows[1].starts_with("└─────┘"));
    }
}
