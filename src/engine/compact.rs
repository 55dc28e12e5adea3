//! Collision resolution and vertical compaction over a tile sequence.
//!
//! All functions keep the caller's tile order; only geometry changes. The
//! `vertical` flag is the compaction mode: with it off, tiles are processed in
//! the order given and colliders only ever move down.

use crate::tile::{Layout, Tile, bottom, first_collision};

/// Indices of `layout` ordered top-to-bottom, then left-to-right.
pub fn sorted_indices(layout: &[Tile]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..layout.len()).collect();
    order.sort_by_key(|&idx| (layout[idx].y, layout[idx].x));
    order
}

/// Pack tiles upward (when `vertical`) and push overlapping tiles down.
pub fn compact(layout: &[Tile], vertical: bool) -> Layout {
    let order = if vertical {
        sorted_indices(layout)
    } else {
        (0..layout.len()).collect()
    };
    let mut placed: Vec<Tile> = Vec::with_capacity(layout.len());
    let mut out = layout.to_vec();
    for idx in order {
        let tile = compact_tile(&placed, layout[idx].clone(), vertical);
        placed.push(tile.clone());
        out[idx] = tile;
    }
    out
}

fn compact_tile(placed: &[Tile], mut tile: Tile, vertical: bool) -> Tile {
    if vertical {
        tile.y = tile.y.min(bottom(placed));
        while tile.y > 0 {
            let trial = Tile {
                y: tile.y - 1,
                ..tile.clone()
            };
            if first_collision(placed, &trial).is_some() {
                break;
            }
            tile.y -= 1;
        }
    }

    while let Some(hit) = first_collision(placed, &tile) {
        tile.y = hit.bottom();
    }

    tile.x = tile.x.max(0);
    tile.y = tile.y.max(0);
    tile
}

/// Keep every tile inside `cols` columns.
pub fn correct_bounds(layout: &mut [Tile], cols: i32) {
    for tile in layout.iter_mut() {
        if tile.right() > cols {
            tile.x = cols - tile.w;
        }
        if tile.x < 0 {
            tile.x = 0;
            tile.w = cols;
        }
    }
}

/// Move `layout[index]` to the given cell (axes left `None` stay put) and
/// shove every tile it now overlaps out of the way.
pub fn move_element(
    layout: &mut [Tile],
    index: usize,
    x: Option<i32>,
    y: Option<i32>,
    user_action: bool,
    vertical: bool,
) {
    let mut moved = vec![false; layout.len()];
    let mode = Mode {
        user_action,
        vertical,
    };
    move_inner(layout, &mut moved, index, x, y, mode);
}

/// Resolve overlaps around `layout[index]` without moving it.
pub fn displace_colliders(layout: &mut [Tile], index: usize, user_action: bool, vertical: bool) {
    let mut moved = vec![false; layout.len()];
    moved[index] = true;
    let mode = Mode {
        user_action,
        vertical,
    };
    resolve_collisions(layout, &mut moved, index, false, mode);
}

#[derive(Debug, Clone, Copy)]
struct Mode {
    user_action: bool,
    vertical: bool,
}

impl Mode {
    fn cascade(self) -> Self {
        Self {
            user_action: false,
            ..self
        }
    }
}

fn move_inner(
    layout: &mut [Tile],
    moved: &mut [bool],
    index: usize,
    x: Option<i32>,
    y: Option<i32>,
    mode: Mode,
) {
    let old_y = layout[index].y;
    {
        let tile = &layout[index];
        let same_x = x.is_none_or(|x| x == tile.x);
        let same_y = y.is_none_or(|y| y == tile.y);
        if same_x && same_y {
            return;
        }
    }

    let tile = &mut layout[index];
    if let Some(x) = x {
        tile.x = x;
    }
    if let Some(y) = y {
        tile.y = y;
    }
    moved[index] = true;

    let moving_up = mode.vertical && y.is_some_and(|y| old_y >= y);
    resolve_collisions(layout, moved, index, moving_up, mode);
}

fn resolve_collisions(
    layout: &mut [Tile],
    moved: &mut [bool],
    index: usize,
    moving_up: bool,
    mode: Mode,
) {
    let mut order = sorted_indices(layout);
    if moving_up {
        order.reverse();
    }
    let collisions: Vec<usize> = order
        .into_iter()
        .filter(|&other| layout[other].collides(&layout[index]))
        .collect();

    for other in collisions {
        if moved[other] {
            continue;
        }
        move_away(layout, moved, index, other, mode);
    }
}

fn move_away(
    layout: &mut [Tile],
    moved: &mut [bool],
    anchor: usize,
    other: usize,
    mode: Mode,
) {
    if mode.user_action && mode.vertical {
        // Try hopping the displaced tile above the one that hit it.
        let trial = Tile {
            i: "-1".to_string(),
            y: (layout[anchor].y - layout[other].h).max(0),
            ..layout[other].clone()
        };
        if first_collision(layout, &trial).is_none() {
            move_inner(layout, moved, other, None, Some(trial.y), mode.cascade());
            return;
        }
    }

    let below = layout[anchor].bottom();
    move_inner(layout, moved, other, None, Some(below), mode.cascade());
}
