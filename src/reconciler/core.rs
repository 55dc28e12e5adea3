use crate::tile::{DropGeometry, Layout, TileId, TileIdSource};

/// Single container for everything the reconciler owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub layout: Layout,
    pub dragging: bool,
    pub compact: bool,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            layout: Layout::new(),
            dragging: false,
            compact: true,
        }
    }
}

/// Every input the reconciler accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    BeginDrag,
    EndDrag,
    /// Engine proposal after a drop, still carrying the dropping placeholder.
    Drop(Layout),
    LayoutChanged(Layout),
    Remove(TileId),
    SetCompaction(bool),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::BeginDrag => "begin_drag",
            Command::EndDrag => "end_drag",
            Command::Drop(_) => "drop",
            Command::LayoutChanged(_) => "layout_changed",
            Command::Remove(_) => "remove",
            Command::SetCompaction(_) => "set_compaction",
        }
    }
}

/// Outcome of applying one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    DragStarted,
    DragEnded,
    TileAdded {
        id: TileId,
        /// Extra placeholders found in the proposal and thrown away.
        discarded_placeholders: usize,
    },
    /// Drop proposal without a placeholder, stored verbatim.
    DropWithoutPlaceholder,
    LayoutReplaced,
    /// Layout change arrived mid-drag and was dropped.
    IgnoredMidDrag,
    TileRemoved(TileId),
    CompactionChanged(bool),
    Unchanged,
}

impl Transition {
    /// Whether the canonical layout or the packing mode moved, so observers must re-derive.
    pub fn needs_sync(&self) -> bool {
        matches!(
            self,
            Transition::TileAdded { .. }
                | Transition::DropWithoutPlaceholder
                | Transition::LayoutReplaced
                | Transition::TileRemoved(_)
                | Transition::CompactionChanged(_)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transition::DragStarted => "drag_started",
            Transition::DragEnded => "drag_ended",
            Transition::TileAdded { .. } => "tile_added",
            Transition::DropWithoutPlaceholder => "drop_without_placeholder",
            Transition::LayoutReplaced => "layout_replaced",
            Transition::IgnoredMidDrag => "ignored_mid_drag",
            Transition::TileRemoved(_) => "tile_removed",
            Transition::CompactionChanged(_) => "compaction_changed",
            Transition::Unchanged => "unchanged",
        }
    }
}

/// Placeholder size for whatever is dragged over the drop target.
pub fn request_drop_geometry() -> DropGeometry {
    DropGeometry::default()
}

/// Apply `command` to `state`. Geometry is trusted as given; nothing here fails.
pub fn reduce(state: &mut BoardState, command: Command, ids: &mut dyn TileIdSource) -> Transition {
    match command {
        Command::BeginDrag => {
            if state.dragging {
                return Transition::Unchanged;
            }
            state.dragging = true;
            Transition::DragStarted
        }
        Command::EndDrag => {
            if !state.dragging {
                return Transition::Unchanged;
            }
            state.dragging = false;
            Transition::DragEnded
        }
        Command::Drop(proposal) => drop_new_tile(state, proposal, ids),
        Command::LayoutChanged(layout) => {
            if state.dragging {
                return Transition::IgnoredMidDrag;
            }
            if state.layout == layout {
                return Transition::Unchanged;
            }
            state.layout = layout;
            Transition::LayoutReplaced
        }
        Command::Remove(id) => {
            let before = state.layout.len();
            state.layout.retain(|tile| tile.i != id);
            if state.layout.len() == before {
                Transition::Unchanged
            } else {
                Transition::TileRemoved(id)
            }
        }
        Command::SetCompaction(enabled) => {
            if state.compact == enabled {
                return Transition::Unchanged;
            }
            state.compact = enabled;
            Transition::CompactionChanged(enabled)
        }
    }
}

/// The engine marks at most one placeholder per drop. The first one gets the
/// fresh id; any further ones are discarded so ids stay unique.
fn drop_new_tile(
    state: &mut BoardState,
    proposal: Layout,
    ids: &mut dyn TileIdSource,
) -> Transition {
    let mut assigned: Option<TileId> = None;
    let mut discarded = 0;
    let mut next = Layout::with_capacity(proposal.len());

    for mut tile in proposal {
        if !tile.is_placeholder() {
            next.push(tile);
            continue;
        }
        if assigned.is_some() {
            discarded += 1;
            continue;
        }
        let id = ids.next_id();
        tile.i = id.clone();
        assigned = Some(id);
        next.push(tile);
    }

    state.layout = next;
    match assigned {
        Some(id) => Transition::TileAdded {
            id,
            discarded_placeholders: discarded,
        },
        None => Transition::DropWithoutPlaceholder,
    }
}
