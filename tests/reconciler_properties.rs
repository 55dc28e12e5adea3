use std::collections::HashSet;

use tile_board::{
    BoardState, ClockIds, Command, DROPPING_TILE_ID, NativeGrid, Reconciler, Tile, Transition,
};

fn placeholder_at(x: i32, y: i32) -> Tile {
    Tile::new(DROPPING_TILE_ID, x, y, 3, 3)
}

#[test]
fn every_drop_adds_one_tile_with_a_fresh_id() {
    let mut reconciler = Reconciler::with_ids(ClockIds::new());
    for step in 0..25 {
        let mut proposal = reconciler.layout().to_vec();
        proposal.push(placeholder_at((step * 3) % 12, step));
        let before = reconciler.layout().len();

        let transition = reconciler.drop_new_tile(proposal);
        assert!(matches!(transition, Transition::TileAdded { .. }));
        assert_eq!(reconciler.layout().len(), before + 1);
    }

    let ids: HashSet<&str> = reconciler
        .layout()
        .iter()
        .map(|tile| tile.i.as_str())
        .collect();
    assert_eq!(ids.len(), 25);
    assert!(!ids.contains(DROPPING_TILE_ID));
}

#[test]
fn dropped_tile_takes_placeholder_geometry() {
    let mut reconciler = Reconciler::new();
    reconciler.drop_new_tile(vec![placeholder_at(6, 2)]);
    let tile = &reconciler.layout()[0];
    assert_eq!((tile.x, tile.y, tile.w, tile.h), (6, 2, 3, 3));
    let geometry = reconciler.request_drop_geometry();
    assert_eq!((geometry.w, geometry.h), (3, 3));
}

#[test]
fn layout_changes_mid_drag_never_land() {
    let proposals = vec![
        vec![],
        vec![Tile::new("a", 0, 0, 1, 1)],
        vec![Tile::new("a", 5, 9, 2, 2), Tile::new("b", 0, 0, 12, 1)],
    ];
    let mut reconciler = Reconciler::new();
    reconciler.drop_new_tile(vec![placeholder_at(0, 0)]);
    let before = reconciler.layout().to_vec();

    reconciler.begin_drag();
    for proposal in proposals {
        assert_eq!(
            reconciler.apply_layout_change(proposal),
            Transition::IgnoredMidDrag
        );
        assert_eq!(reconciler.layout(), before.as_slice());
    }
    reconciler.end_drag();
}

#[test]
fn removal_only_touches_the_named_tile() {
    let mut reconciler = Reconciler::new();
    assert_eq!(reconciler.remove_tile("missing"), Transition::Unchanged);

    reconciler.apply(Command::LayoutChanged(vec![
        Tile::new("a", 0, 0, 3, 3),
        Tile::new("b", 3, 0, 3, 3),
        Tile::new("c", 6, 0, 3, 3),
    ]));
    assert_eq!(reconciler.remove_tile("zzz"), Transition::Unchanged);
    assert_eq!(
        reconciler.remove_tile("b"),
        Transition::TileRemoved("b".into())
    );
    let ids: Vec<&str> = reconciler.layout().iter().map(|t| t.i.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[test]
fn compaction_starts_enabled_and_toggles() {
    assert!(BoardState::default().compact);
    let mut reconciler = Reconciler::new();
    assert_eq!(reconciler.set_compaction_mode(true), Transition::Unchanged);
    assert_eq!(
        reconciler.set_compaction_mode(false),
        Transition::CompactionChanged(false)
    );
    assert!(!reconciler.is_compacting());
}

#[test]
fn native_rows_track_the_lowest_edge() {
    assert_eq!(NativeGrid::derive(&[]).rows, 0);
    let layout = vec![Tile::new("a", 0, 0, 3, 3), Tile::new("b", 0, 3, 3, 3)];
    let grid = NativeGrid::derive(&layout);
    assert_eq!(grid.rows, 6);
    assert_eq!(grid.placements[1].grid_area(), "4/1/span 3/span 3");
}
