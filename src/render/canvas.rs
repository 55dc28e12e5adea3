use crate::geometry::Rect;
use crate::width::truncate_to_width;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    Solid,
    Dashed,
}

impl BorderStyle {
    fn glyphs(self) -> [char; 6] {
        match self {
            BorderStyle::Solid => ['┌', '─', '┐', '│', '└', '┘'],
            BorderStyle::Dashed => ['┌', '╌', '┐', '╎', '└', '┘'],
        }
    }
}

/// Character grid a frame is composed on. Writes outside the grid are dropped,
/// so callers may draw boxes that hang off an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; usize::from(width) * usize::from(height)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col >= i32::from(self.width) || row >= i32::from(self.height) {
            return None;
        }
        Some(row as usize * usize::from(self.width) + col as usize)
    }

    pub fn get(&self, col: i32, row: i32) -> Option<char> {
        self.index(col, row).map(|idx| self.cells[idx])
    }

    pub fn set(&mut self, col: i32, row: i32, ch: char) {
        if let Some(idx) = self.index(col, row) {
            self.cells[idx] = ch;
        }
    }

    pub fn put_str(&mut self, col: i32, row: i32, text: &str) {
        for (offset, ch) in text.chars().enumerate() {
            self.set(col + offset as i32, row, ch);
        }
    }

    /// Write `text` centred in `width` cells starting at `col`, truncating if needed.
    pub fn put_centered(&mut self, col: i32, row: i32, width: i32, text: &str) {
        if width <= 0 {
            return;
        }
        let clipped = truncate_to_width(text, width as usize);
        let len = clipped.chars().count() as i32;
        self.put_str(col + (width - len) / 2, row, &clipped);
    }

    pub fn fill(&mut self, left: i32, top: i32, width: i32, height: i32, ch: char) {
        for row in top..top + height {
            for col in left..left + width {
                self.set(col, row, ch);
            }
        }
    }

    /// Border around the box; boxes narrower or shorter than two cells degrade to a fill.
    pub fn draw_box(&mut self, left: i32, top: i32, width: i32, height: i32, style: BorderStyle) {
        if width <= 0 || height <= 0 {
            return;
        }
        if width < 2 || height < 2 {
            self.fill(left, top, width, height, '█');
            return;
        }
        let [tl, horizontal, tr, vertical, bl, br] = style.glyphs();
        let right = left + width - 1;
        let bottom = top + height - 1;
        for col in left + 1..right {
            self.set(col, top, horizontal);
            self.set(col, bottom, horizontal);
        }
        for row in top + 1..bottom {
            self.set(left, row, vertical);
            self.set(right, row, vertical);
        }
        self.set(left, top, tl);
        self.set(right, top, tr);
        self.set(left, bottom, bl);
        self.set(right, bottom, br);
    }

    pub fn draw_rect(&mut self, rect: Rect, style: BorderStyle) {
        self.draw_box(
            i32::from(rect.x),
            i32::from(rect.y),
            i32::from(rect.width),
            i32::from(rect.height),
            style,
        );
    }

    /// Copy `other` onto this canvas with its origin at `col`,`row`.
    pub fn blit(&mut self, other: &Canvas, col: i32, row: i32) {
        for y in 0..i32::from(other.height) {
            for x in 0..i32::from(other.width) {
                if let Some(ch) = other.get(x, y) {
                    self.set(col + x, row + y, ch);
                }
            }
        }
    }

    pub fn rows(&self) -> Vec<String> {
        if self.width == 0 {
            return vec![String::new(); usize::from(self.height)];
        }
        self.cells
            .chunks(usize::from(self.width))
            .map(|chunk| chunk.iter().collect())
            .collect()
    }
}
