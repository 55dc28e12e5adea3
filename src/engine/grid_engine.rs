use crate::tile::{DROPPING_TILE_ID, DropGeometry, Layout, Tile, TileId};

use super::compact::{compact, correct_bounds, displace_colliders, move_element};
use super::position::{GridConfig, ResizeHandle};
use super::{EngineEvent, LayoutEngine};

#[derive(Debug, Clone)]
enum GestureKind {
    Drag,
    Resize { handle: ResizeHandle, anchor: Tile },
}

#[derive(Debug, Clone)]
struct Gesture {
    id: TileId,
    origin: Layout,
    kind: GestureKind,
}

/// Collision and compaction engine working in grid cells.
///
/// The engine keeps its own working copy of the layout. Every mutation that
/// leaves the working copy different from what was last reported produces a
/// [`EngineEvent::LayoutChange`], including intermediate states mid-gesture.
#[derive(Debug, Clone)]
pub struct GridEngine {
    cols: i32,
    compact: bool,
    layout: Layout,
    reported: Layout,
    gesture: Option<Gesture>,
}

impl GridEngine {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            cols: config.cols,
            compact: true,
            layout: Layout::new(),
            reported: Layout::new(),
            gesture: None,
        }
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn has_placeholder(&self) -> bool {
        self.layout.iter().any(Tile::is_placeholder)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.layout.iter().position(|tile| tile.i == id)
    }

    fn recompact(&mut self) {
        self.layout = compact(&self.layout, self.compact);
    }

    fn report(&mut self) -> Vec<EngineEvent> {
        if self.layout == self.reported {
            return Vec::new();
        }
        self.reported = self.layout.clone();
        vec![EngineEvent::LayoutChange(self.layout.clone())]
    }

    /// Close a gesture, reporting against the layout it started from so the
    /// final state is delivered even if it matches the last intermediate one.
    fn finish_gesture(&mut self, id: &str) -> Vec<EngineEvent> {
        let origin = match self.gesture.take() {
            Some(gesture) if gesture.id == id => gesture.origin,
            _ => self.reported.clone(),
        };
        if self.layout == origin {
            return Vec::new();
        }
        self.reported = self.layout.clone();
        vec![EngineEvent::LayoutChange(self.layout.clone())]
    }

    fn apply_move(&mut self, id: &str, x: i32, y: i32) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let w = self.layout[idx].w;
        let x = x.clamp(0, (self.cols - w).max(0));
        let y = y.max(0);
        move_element(&mut self.layout, idx, Some(x), Some(y), true, self.compact);
        self.recompact();
        true
    }

    fn apply_resize(&mut self, id: &str, w: i32, h: i32) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let (handle, anchor) = match &self.gesture {
            Some(Gesture {
                id: active,
                kind: GestureKind::Resize { handle, anchor },
                ..
            }) if active == id => (*handle, anchor.clone()),
            _ => (ResizeHandle::Se, self.layout[idx].clone()),
        };

        let mut next = anchor.clone();
        if handle.changes_width() {
            if handle.moves_west_edge() {
                next.x = (anchor.right() - w.max(1)).max(0);
                next.w = anchor.right() - next.x;
            } else {
                next.w = w.clamp(1, (self.cols - anchor.x).max(1));
            }
        }
        if handle.changes_height() {
            next.h = h.max(1);
        }

        let tile = &mut self.layout[idx];
        tile.x = next.x;
        tile.w = next.w;
        tile.h = next.h;
        displace_colliders(&mut self.layout, idx, true, self.compact);
        self.recompact();
        true
    }
}

impl LayoutEngine for GridEngine {
    fn sync(&mut self, layout: &[Tile], compact_enabled: bool) -> Vec<EngineEvent> {
        self.compact = compact_enabled;
        let mut next = layout.to_vec();
        correct_bounds(&mut next, self.cols);
        self.layout = compact(&next, self.compact);
        self.reported = self.layout.clone();
        if self.layout.as_slice() == layout {
            Vec::new()
        } else {
            vec![EngineEvent::LayoutChange(self.layout.clone())]
        }
    }

    fn layout(&self) -> &[Tile] {
        &self.layout
    }

    fn is_compacting(&self) -> bool {
        self.compact
    }

    fn drag_start(&mut self, id: &str) -> Vec<EngineEvent> {
        if self.index_of(id).is_some() {
            self.gesture = Some(Gesture {
                id: id.to_string(),
                origin: self.layout.clone(),
                kind: GestureKind::Drag,
            });
        }
        Vec::new()
    }

    fn drag(&mut self, id: &str, x: i32, y: i32) -> Vec<EngineEvent> {
        if !self.apply_move(id, x, y) {
            return Vec::new();
        }
        self.report()
    }

    fn drag_stop(&mut self, id: &str, x: i32, y: i32) -> Vec<EngineEvent> {
        self.apply_move(id, x, y);
        self.finish_gesture(id)
    }

    fn resize_start(&mut self, id: &str, handle: ResizeHandle) -> Vec<EngineEvent> {
        if let Some(idx) = self.index_of(id) {
            self.gesture = Some(Gesture {
                id: id.to_string(),
                origin: self.layout.clone(),
                kind: GestureKind::Resize {
                    handle,
                    anchor: self.layout[idx].clone(),
                },
            });
        }
        Vec::new()
    }

    fn resize(&mut self, id: &str, w: i32, h: i32) -> Vec<EngineEvent> {
        if !self.apply_resize(id, w, h) {
            return Vec::new();
        }
        self.report()
    }

    fn resize_stop(&mut self, id: &str, w: i32, h: i32) -> Vec<EngineEvent> {
        self.apply_resize(id, w, h);
        self.finish_gesture(id)
    }

    fn drag_over(&mut self, x: i32, y: i32, geometry: DropGeometry) -> Vec<EngineEvent> {
        let x = x.clamp(0, (self.cols - geometry.w).max(0));
        let y = y.max(0);
        match self.index_of(DROPPING_TILE_ID) {
            Some(idx) => move_element(&mut self.layout, idx, Some(x), Some(y), true, self.compact),
            None => {
                self.layout.push(Tile::placeholder(x, y, geometry));
                let idx = self.layout.len() - 1;
                displace_colliders(&mut self.layout, idx, true, self.compact);
            }
        }
        self.recompact();
        self.report()
    }

    fn drag_leave(&mut self) -> Vec<EngineEvent> {
        if !self.has_placeholder() {
            return Vec::new();
        }
        self.layout.retain(|tile| !tile.is_placeholder());
        self.recompact();
        self.report()
    }

    fn finish_drop(&mut self) -> Vec<EngineEvent> {
        if !self.has_placeholder() {
            return Vec::new();
        }
        let proposal = self.layout.clone();
        self.layout.retain(|tile| !tile.is_placeholder());
        self.recompact();
        vec![EngineEvent::Drop(proposal)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GridEngine {
        GridEngine::new(&GridConfig::default())
    }

    fn changed(events: &[EngineEvent]) -> Option<&Layout> {
        events.iter().rev().find_map(|event| match event {
            EngineEvent::LayoutChange(layout) => Some(layout),
            EngineEvent::Drop(_) => None,
        })
    }

    #[test]
    fn sync_reports_only_when_engine_alters_layout() {
        let mut engine = engine();
        let packed = vec![Tile::new("a", 0, 0, 3, 3)];
        assert!(engine.sync(&packed, true).is_empty());

        let floating = vec![Tile::new("a", 0, 5, 3, 3)];
        let events = engine.sync(&floating, true);
        assert_eq!(changed(&events).unwrap()[0].y, 0);

        assert!(engine.sync(&floating, false).is_empty());
    }

    #[test]
    fn drag_over_inserts_placeholder_and_drop_proposes_it() {
        let mut engine = engine();
        let events = engine.drag_over(4, 2, DropGeometry::default());
        let layout = changed(&events).unwrap();
        assert_eq!(layout.len(), 1);
        assert!(layout[0].is_placeholder());
        assert_eq!((layout[0].x, layout[0].y), (4, 0));

        let events = engine.finish_drop();
        match events.as_slice() {
            [EngineEvent::Drop(proposal)] => {
                assert_eq!(proposal, &vec![Tile::new(DROPPING_TILE_ID, 4, 0, 3, 3)]);
            }
            other => panic!("unexpected events {other:?}"),
        }
        assert!(!engine.has_placeholder());
    }

    #[test]
    fn placeholder_displaces_existing_tile_without_compaction() {
        let mut engine = engine();
        engine.sync(&[Tile::new("1", 0, 0, 3, 3)], false);
        engine.drag_over(0, 0, DropGeometry::default());
        let layout = engine.layout();
        assert_eq!(layout[0].i, "1");
        assert_eq!(layout[0].y, 3);
        assert!(layout[1].is_placeholder());
        assert_eq!(layout[1].y, 0);
    }

    #[test]
    fn drag_leave_removes_placeholder() {
        let mut engine = engine();
        engine.sync(&[Tile::new("1", 0, 0, 3, 3)], true);
        engine.drag_over(0, 0, DropGeometry::default());
        let events = engine.drag_leave();
        assert_eq!(changed(&events).unwrap(), &vec![Tile::new("1", 0, 0, 3, 3)]);
        assert!(engine.finish_drop().is_empty());
    }

    #[test]
    fn drag_stop_reports_final_layout_even_if_already_seen() {
        let mut engine = engine();
        engine.sync(
            &[Tile::new("a", 0, 0, 3, 3), Tile::new("b", 3, 0, 3, 3)],
            false,
        );
        engine.drag_start("b");
        let mid = engine.drag("b", 6, 0);
        assert_eq!(changed(&mid).unwrap()[1].x, 6);

        let end = engine.drag_stop("b", 6, 0);
        assert_eq!(changed(&end).unwrap()[1].x, 6);
    }

    #[test]
    fn drag_back_to_origin_reports_nothing_on_stop() {
        let mut engine = engine();
        engine.sync(&[Tile::new("a", 0, 0, 3, 3)], true);
        engine.drag_start("a");
        engine.drag("a", 5, 0);
        assert!(engine.drag_stop("a", 0, 0).is_empty());
    }

    #[test]
    fn west_resize_keeps_right_edge() {
        let mut engine = engine();
        engine.sync(&[Tile::new("a", 4, 0, 3, 3)], true);
        engine.resize_start("a", ResizeHandle::W);
        let events = engine.resize_stop("a", 5, 9);
        let tile = &changed(&events).unwrap()[0];
        assert_eq!((tile.x, tile.w, tile.h), (2, 5, 3));
    }

    #[test]
    fn east_resize_is_bounded_by_columns() {
        let mut engine = engine();
        engine.sync(&[Tile::new("a", 8, 0, 3, 3)], true);
        engine.resize_start("a", ResizeHandle::Se);
        engine.resize("a", 10, 4);
        let tile = &engine.layout()[0];
        assert_eq!((tile.w, tile.h), (4, 4));
    }

    #[test]
    fn free_drag_pushes_collider_below_instead_of_above() {
        let mut engine = engine();
        engine.sync(
            &[Tile::new("a", 0, 0, 2, 2), Tile::new("b", 0, 5, 2, 2)],
            false,
        );
        engine.drag_start("a");
        let events = engine.drag_stop("a", 0, 4);
        let layout = changed(&events).unwrap();
        assert_eq!((layout[0].y, layout[1].y), (4, 6));
    }

    #[test]
    fn compacting_drag_lets_collider_hop_above() {
        let mut engine = engine();
        engine.sync(
            &[Tile::new("a", 0, 0, 2, 2), Tile::new("b", 0, 2, 2, 2)],
            true,
        );
        engine.drag_start("a");
        let events = engine.drag_stop("a", 0, 2);
        let layout = changed(&events).unwrap();
        assert_eq!((layout[0].y, layout[1].y), (2, 0));
    }

    #[test]
    fn unknown_tile_gestures_are_ignored() {
        let mut engine = engine();
        assert!(engine.drag("ghost", 1, 1).is_empty());
        assert!(engine.resize("ghost", 1, 1).is_empty());
    }
}
