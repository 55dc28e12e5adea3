//! Screen layout: header widgets on top, the two comparison panes below.

mod tracks;

pub use tracks::{Span, Track, solve_tracks};

use crate::geometry::{Rect, Size};

const HEADER_HEIGHT: u16 = 3;
const TOKEN_WIDTH: u16 = 15;
const SWITCH_WIDTH: u16 = 34;
const PANE_GAP: u16 = 1;

/// Solved regions of the demo screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub token: Rect,
    pub switch: Rect,
    pub status: Rect,
    pub compat_pane: Rect,
    pub native_pane: Rect,
}

impl ScreenLayout {
    pub fn solve(size: Size) -> Self {
        let rows = solve_tracks(
            size.height,
            &[Track::Fixed(HEADER_HEIGHT), Track::Flex(1)],
            0,
        );
        let header = rows[0];
        let body = rows[1];

        let header_cols = solve_tracks(
            size.width,
            &[
                Track::Fixed(TOKEN_WIDTH),
                Track::Fixed(SWITCH_WIDTH),
                Track::Flex(1),
            ],
            PANE_GAP,
        );
        let body_cols = solve_tracks(size.width, &[Track::Flex(1), Track::Flex(1)], PANE_GAP);

        let header_rect = |span: Span| Rect::new(span.start, header.start, span.len, header.len);
        let body_rect = |span: Span| Rect::new(span.start, body.start, span.len, body.len);

        Self {
            token: header_rect(header_cols[0]),
            switch: header_rect(header_cols[1]),
            status: header_rect(header_cols[2]),
            compat_pane: body_rect(body_cols[0]),
            native_pane: body_rect(body_cols[1]),
        }
    }
}
