//! Pointer gesture tracking and event constructors.

use std::time::Duration;

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::geometry::Size;
use crate::tile::TileId;

/// Events the board runtime consumes, either from the terminal or from a script.
#[derive(Debug, Clone)]
pub enum BoardEvent {
    Tick { elapsed: Duration },
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(Size),
}

impl BoardEvent {
    pub fn key(ch: char) -> Self {
        BoardEvent::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE))
    }

    pub fn press(column: u16, row: u16) -> Self {
        Self::mouse(MouseEventKind::Down(MouseButton::Left), column, row)
    }

    pub fn drag(column: u16, row: u16) -> Self {
        Self::mouse(MouseEventKind::Drag(MouseButton::Left), column, row)
    }

    pub fn release(column: u16, row: u16) -> Self {
        Self::mouse(MouseEventKind::Up(MouseButton::Left), column, row)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Self {
        BoardEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    pub fn describe(&self) -> &'static str {
        match self {
            BoardEvent::Tick { .. } => "tick",
            BoardEvent::Key(_) => "key",
            BoardEvent::Mouse(_) => "mouse",
            BoardEvent::Resize(_) => "resize",
        }
    }
}

/// What the left button is currently doing. Positions are container cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Carrying the draggable token; `over_grid` is true while it hovers the engine pane.
    Token { over_grid: bool },
    /// Moving a tile; `grab` is the pointer offset from the tile's top-left corner.
    Move { id: TileId, grab: (i32, i32) },
    Resize { id: TileId },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}
