//! Conversions between grid cells and container units (pixels in a browser,
//! character cells in a terminal).

use crate::tile::{DropGeometry, Tile, bottom};

/// Edge or corner a resize gesture grabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    S,
    W,
    E,
    Sw,
    Se,
}

impl ResizeHandle {
    pub fn moves_west_edge(self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::Sw)
    }

    pub fn changes_width(self) -> bool {
        !matches!(self, ResizeHandle::S)
    }

    pub fn changes_height(self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::Sw | ResizeHandle::Se)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeHandle::S => "s",
            ResizeHandle::W => "w",
            ResizeHandle::E => "e",
            ResizeHandle::Sw => "sw",
            ResizeHandle::Se => "se",
        }
    }
}

/// Grid configuration handed to the layout engine and the renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub cols: i32,
    pub row_height: f64,
    /// Horizontal and vertical gap between tiles.
    pub margin: (f64, f64),
    pub container_padding: (f64, f64),
    pub max_rows: i32,
    pub drop_geometry: DropGeometry,
    pub resize_handles: Vec<ResizeHandle>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: 12,
            row_height: 43.0,
            margin: (16.0, 16.0),
            container_padding: (0.0, 0.0),
            max_rows: i32::MAX,
            drop_geometry: DropGeometry::default(),
            resize_handles: vec![
                ResizeHandle::S,
                ResizeHandle::W,
                ResizeHandle::E,
                ResizeHandle::Sw,
                ResizeHandle::Se,
            ],
        }
    }
}

impl GridConfig {
    /// Same grid, measured in terminal cells instead of pixels.
    pub fn terminal() -> Self {
        Self {
            row_height: 2.0,
            margin: (1.0, 1.0),
            ..Self::default()
        }
    }

    pub fn position_params(&self, container_width: f64) -> PositionParams {
        PositionParams {
            cols: self.cols,
            row_height: self.row_height,
            margin: self.margin,
            padding: self.container_padding,
            container_width,
            max_rows: self.max_rows,
        }
    }
}

/// Container-space box of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelBox {
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    pub fn contains(&self, left: i32, top: i32) -> bool {
        left >= self.left && left < self.right() && top >= self.top && top < self.bottom()
    }
}

/// Everything needed to map between grid cells and container units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionParams {
    pub cols: i32,
    pub row_height: f64,
    pub margin: (f64, f64),
    pub padding: (f64, f64),
    pub container_width: f64,
    pub max_rows: i32,
}

impl PositionParams {
    pub fn col_width(&self) -> f64 {
        let gaps = self.margin.0 * f64::from(self.cols - 1);
        (self.container_width - gaps - self.padding.0 * 2.0) / f64::from(self.cols)
    }

    pub fn calc_position(&self, tile: &Tile) -> PixelBox {
        let col_width = self.col_width();
        let left = (col_width + self.margin.0) * f64::from(tile.x) + self.padding.0;
        let top = (self.row_height + self.margin.1) * f64::from(tile.y) + self.padding.1;
        let width = col_width * f64::from(tile.w) + f64::from((tile.w - 1).max(0)) * self.margin.0;
        let height =
            self.row_height * f64::from(tile.h) + f64::from((tile.h - 1).max(0)) * self.margin.1;
        PixelBox {
            left: left.round() as i32,
            top: top.round() as i32,
            width: width.round() as i32,
            height: height.round() as i32,
        }
    }

    /// Grid cell under a container-space point for a tile of size `w`×`h`.
    pub fn calc_xy(&self, top: f64, left: f64, w: i32, h: i32) -> (i32, i32) {
        let x = ((left - self.padding.0) / (self.col_width() + self.margin.0)).round() as i32;
        let y = ((top - self.padding.1) / (self.row_height + self.margin.1)).round() as i32;
        let x = x.clamp(0, (self.cols - w).max(0));
        let y = y.clamp(0, self.max_rows.saturating_sub(h).max(0));
        (x, y)
    }

    /// Grid size covering a container-space extent for a tile anchored at `x`,`y`.
    pub fn calc_wh(&self, width: f64, height: f64, x: i32, y: i32) -> (i32, i32) {
        let w = ((width + self.margin.0) / (self.col_width() + self.margin.0)).round() as i32;
        let h = ((height + self.margin.1) / (self.row_height + self.margin.1)).round() as i32;
        let w = w.clamp(1, (self.cols - x).max(1));
        let h = h.clamp(1, self.max_rows.saturating_sub(y).max(1));
        (w, h)
    }

    /// Auto-sized container height for `layout`.
    pub fn container_height(&self, layout: &[Tile]) -> i32 {
        let rows = bottom(layout);
        if rows == 0 {
            return (self.padding.1 * 2.0).round() as i32;
        }
        let height = f64::from(rows) * self.row_height
            + f64::from(rows - 1) * self.margin.1
            + self.padding.1 * 2.0;
        height.round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn browser(width: f64) -> PositionParams {
        GridConfig::default().position_params(width)
    }

    #[test]
    fn column_width_accounts_for_margins() {
        // 12 columns, 11 gaps of 16px.
        let params = browser(1232.0);
        assert_eq!(params.col_width(), 88.0);
    }

    #[test]
    fn position_of_three_by_three_tile() {
        let params = browser(1232.0);
        let pos = params.calc_position(&Tile::new("a", 1, 2, 3, 3));
        assert_eq!(
            pos,
            PixelBox {
                left: 104,
                top: 118,
                width: 296,
                height: 161,
            }
        );
    }

    #[test]
    fn calc_xy_rounds_and_clamps() {
        let params = browser(1232.0);
        assert_eq!(params.calc_xy(118.0, 104.0, 3, 3), (1, 2));
        assert_eq!(params.calc_xy(-50.0, -50.0, 3, 3), (0, 0));
        assert_eq!(params.calc_xy(0.0, 5000.0, 3, 3), (9, 0));
    }

    #[test]
    fn calc_wh_inverts_position() {
        let params = browser(1232.0);
        assert_eq!(params.calc_wh(296.0, 161.0, 1, 2), (3, 3));
        assert_eq!(params.calc_wh(5000.0, 10.0, 10, 0), (2, 1));
    }

    #[test]
    fn container_height_of_empty_layout_is_padding() {
        let params = browser(1232.0);
        assert_eq!(params.container_height(&[]), 0);
        assert_eq!(
            params.container_height(&[Tile::new("a", 0, 0, 3, 2)]),
            43 * 2 + 16
        );
    }

    #[test]
    fn handle_axes() {
        assert!(ResizeHandle::Sw.moves_west_edge());
        assert!(!ResizeHandle::S.changes_width());
        assert!(!ResizeHandle::E.changes_height());
    }
}
