//! Direct grid-coordinate rendering of the canonical layout.
//!
//! Nothing here consults the layout engine: placement comes straight from
//! each tile's `x`, `y`, `w`, `h`, the way a CSS grid would place it.

use crate::layout::{Track, solve_tracks};
use crate::tile::{Tile, TileId, bottom};

use super::canvas::{BorderStyle, Canvas};

/// One tile's grid area, 1-based like CSS grid lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativePlacement {
    pub id: TileId,
    pub column_start: i32,
    pub row_start: i32,
    pub column_span: i32,
    pub row_span: i32,
}

impl NativePlacement {
    fn from_tile(tile: &Tile) -> Self {
        Self {
            id: tile.i.clone(),
            column_start: tile.x.saturating_add(1),
            row_start: tile.y.saturating_add(1),
            column_span: tile.w,
            row_span: tile.h,
        }
    }

    /// `grid-area` shorthand: `row-start / column-start / span rows / span columns`.
    pub fn grid_area(&self) -> String {
        format!(
            "{}/{}/span {}/span {}",
            self.row_start, self.column_start, self.row_span, self.column_span
        )
    }
}

/// Terminal cell area of a placed tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellArea {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeGrid {
    pub rows: i32,
    pub placements: Vec<NativePlacement>,
}

impl NativeGrid {
    pub fn derive(layout: &[Tile]) -> Self {
        Self {
            rows: bottom(layout),
            placements: layout.iter().map(NativePlacement::from_tile).collect(),
        }
    }

    pub fn template_rows(&self, row_height: f64) -> String {
        format!("repeat({}, {}px)", self.rows, row_height)
    }

    /// Resolve placements against `cols` flexible columns spread over `width`
    /// cells and fixed rows of `row_height`, with `gap` cells between tracks.
    /// Only the rows starting within `height` cells are laid out; placements
    /// that fall outside them are skipped and spans are cut at the last one.
    pub fn solve(
        &self,
        width: u16,
        height: u16,
        cols: i32,
        row_height: u16,
        gap: (u16, u16),
    ) -> Vec<(TileId, CellArea)> {
        if cols <= 0 || self.rows <= 0 || height == 0 {
            return Vec::new();
        }

        let col_tracks = vec![Track::Flex(1); cols as usize];
        let columns = solve_tracks(width, &col_tracks, gap.0);

        let row_count = visible_rows(self.rows, height, row_height, gap.1);
        let row_tracks = vec![Track::Fixed(row_height); row_count];
        let total_height = (u64::from(row_height) * row_count as u64
            + u64::from(gap.1) * (row_count as u64).saturating_sub(1))
        .min(u64::from(u16::MAX)) as u16;
        let rows = solve_tracks(total_height, &row_tracks, gap.1);

        self.placements
            .iter()
            .filter_map(|placement| {
                let (left, width) = span_extent(
                    &columns,
                    placement.column_start,
                    placement.column_span,
                )?;
                let (top, height) = span_extent(&rows, placement.row_start, placement.row_span)?;
                Some((
                    placement.id.clone(),
                    CellArea {
                        left,
                        top,
                        width,
                        height,
                    },
                ))
            })
            .collect()
    }

    pub fn paint(&self, canvas: &mut Canvas, cols: i32, row_height: u16, gap: (u16, u16)) {
        for (id, area) in self.solve(canvas.width(), canvas.height(), cols, row_height, gap) {
            let (left, top) = (i32::from(area.left), i32::from(area.top));
            let (width, height) = (i32::from(area.width), i32::from(area.height));
            canvas.fill(left, top, width, height, ' ');
            canvas.draw_box(left, top, width, height, BorderStyle::Solid);
            if height > 2 {
                canvas.put_centered(left + 1, top + height / 2, width - 2, &id);
            }
        }
    }
}

/// Number of template rows whose top edge lands inside `height` cells.
fn visible_rows(rows: i32, height: u16, row_height: u16, gap: u16) -> usize {
    let step = (u32::from(row_height) + u32::from(gap)).max(1);
    let fitting = u32::from(height).div_ceil(step) as usize;
    fitting.min(rows.max(0) as usize)
}

/// Start and extent of the tracks a 1-based line + span covers.
fn span_extent(
    tracks: &[crate::layout::Span],
    start_line: i32,
    span: i32,
) -> Option<(u16, u16)> {
    if start_line < 1 || span < 1 {
        return None;
    }
    let first = (start_line - 1) as usize;
    let first_track = tracks.get(first)?;
    let last = (first + span as usize - 1).min(tracks.len() - 1);
    let end = tracks[last].end();
    Some((first_track.start, end - first_track.start))
}
