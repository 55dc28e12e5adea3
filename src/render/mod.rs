//! Frame composition for the board screen.
//!
//! Each frame is drawn onto a [`Canvas`] from scratch; [`AnsiRenderer`] then
//! diffs it row by row against what the terminal already shows.

mod ansi;
pub mod canvas;
pub mod compat;
pub mod native;

pub use ansi::{AnsiRenderer, RendererSettings};
pub use canvas::{BorderStyle, Canvas};
pub use compat::{CompatHit, CompatRenderer, delete_button, relay};
pub use native::{CellArea, NativeGrid, NativePlacement};

use crate::engine::{GridConfig, LayoutEngine};
use crate::geometry::{Rect, Size};
use crate::layout::ScreenLayout;
use crate::tile::Tile;
use crate::width::truncate_to_width;

pub const TOKEN_LABEL: &str = "[ Draggable ]";
const COMPAT_TITLE: &str = " engine ";
const NATIVE_TITLE: &str = " native grid ";

/// Header state shown above the panes.
#[derive(Debug, Clone, Copy)]
pub struct HeaderView<'a> {
    pub compact: bool,
    pub dragging: bool,
    pub status: &'a str,
}

pub fn switch_label(compact: bool) -> String {
    let knob = if compact { "[□■]" } else { "[■□]" };
    format!("Vertical Compact: Off {knob} On")
}

/// Interior of a pane, inside its border.
pub fn pane_content(pane: Rect) -> Rect {
    pane.inset(1)
}

/// Row height and gaps of the native grid, in whole cells.
pub fn native_tracks(config: &GridConfig) -> (u16, (u16, u16)) {
    let cells = |value: f64| value.max(0.0).round().min(f64::from(u16::MAX)) as u16;
    (
        cells(config.row_height).max(1),
        (cells(config.margin.0), cells(config.margin.1)),
    )
}

pub fn compose_frame<E: LayoutEngine>(
    size: Size,
    screen: &ScreenLayout,
    header: HeaderView<'_>,
    compat: &CompatRenderer<E>,
    layout: &[Tile],
) -> Canvas {
    let mut frame = Canvas::new(size.width, size.height);

    let token_style = if header.dragging {
        BorderStyle::Dashed
    } else {
        BorderStyle::Solid
    };
    draw_widget(&mut frame, screen.token, token_style, TOKEN_LABEL);
    draw_widget(
        &mut frame,
        screen.switch,
        BorderStyle::Solid,
        &switch_label(header.compact),
    );
    if screen.status.height > 0 {
        frame.put_str(
            i32::from(screen.status.x),
            i32::from(screen.status.y + screen.status.height / 2),
            &truncate_to_width(header.status, usize::from(screen.status.width)),
        );
    }

    let compat_area = pane_content(screen.compat_pane);
    let mut compat_canvas = Canvas::new(compat_area.width, compat_area.height);
    compat.paint(&mut compat_canvas);
    draw_pane(&mut frame, screen.compat_pane, COMPAT_TITLE, &compat_canvas);

    let native_area = pane_content(screen.native_pane);
    let mut native_canvas = Canvas::new(native_area.width, native_area.height);
    let (row_height, gap) = native_tracks(compat.config());
    NativeGrid::derive(layout).paint(&mut native_canvas, compat.config().cols, row_height, gap);
    draw_pane(&mut frame, screen.native_pane, NATIVE_TITLE, &native_canvas);

    frame
}

fn draw_widget(frame: &mut Canvas, area: Rect, style: BorderStyle, label: &str) {
    frame.draw_rect(area, style);
    if area.height > 0 {
        frame.put_centered(
            i32::from(area.x) + 1,
            i32::from(area.y + area.height / 2),
            i32::from(area.width) - 2,
            label,
        );
    }
}

fn draw_pane(frame: &mut Canvas, pane: Rect, title: &str, content: &Canvas) {
    frame.draw_rect(pane, BorderStyle::Solid);
    if pane.width > 4 {
        let title = truncate_to_width(title, usize::from(pane.width - 4));
        frame.put_str(i32::from(pane.x) + 2, i32::from(pane.y), &title);
    }
    let inner = pane_content(pane);
    frame.blit(content, i32::from(inner.x), i32::from(inner.y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciler::BoardState;

    #[test]
    fn switch_knob_follows_mode() {
        assert_eq!(switch_label(true), "Vertical Compact: Off [□■] On");
        assert_eq!(switch_label(false), "Vertical Compact: Off [■□] On");
    }

    #[test]
    fn terminal_grid_tracks_are_whole_cells() {
        assert_eq!(native_tracks(&GridConfig::terminal()), (2, (1, 1)));
    }

    #[test]
    fn frame_shows_both_panes() {
        let size = Size::new(97, 20);
        let screen = ScreenLayout::solve(size);
        let mut compat = CompatRenderer::with_grid_engine(GridConfig::terminal());
        compat.set_container_width(pane_content(screen.compat_pane).width);

        let layout = vec![Tile::new("tile", 0, 0, 3, 3)];
        compat.sync(&BoardState {
            layout: layout.clone(),
            dragging: false,
            compact: true,
        });

        let header = HeaderView {
            compact: true,
            dragging: false,
            status: "1 tile",
        };
        let rows = compose_frame(size, &screen, header, &compat, &layout).rows();

        assert!(rows[1].contains(TOKEN_LABEL));
        assert!(rows[1].contains("[□■]"));
        assert!(rows[1].contains("1 tile"));
        assert!(rows[3].contains(COMPAT_TITLE));
        assert!(rows[3].contains(NATIVE_TITLE));
        // Both panes place the tile in the same inner cell.
        let native_left = usize::from(pane_content(screen.native_pane).x);
        let compat_left = usize::from(pane_content(screen.compat_pane).x);
        let chars: Vec<char> = rows[4].chars().collect();
        assert_eq!(chars[compat_left], '┌');
        assert_eq!(chars[native_left], '┌');
    }
}
