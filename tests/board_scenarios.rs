use tile_board::render::CompatRenderer;
use tile_board::{
    Command, DROPPING_TILE_ID, GridConfig, LayoutEngine, NativeGrid, Reconciler, SequentialIds,
    Tile, Transition,
};

// Browser geometry: 88px columns, 43px rows, 16px gaps.
const CONTAINER_WIDTH: u16 = 1232;

fn board() -> (Reconciler, CompatRenderer) {
    let reconciler = Reconciler::with_ids(SequentialIds::new("t"));
    let mut renderer = CompatRenderer::with_grid_engine(GridConfig::default());
    renderer.set_container_width(CONTAINER_WIDTH);
    (reconciler, renderer)
}

/// Apply commands in order, re-syncing the engine after every change.
fn pump(
    reconciler: &mut Reconciler,
    renderer: &mut CompatRenderer,
    commands: Vec<Command>,
) -> Vec<Transition> {
    let mut pending = std::collections::VecDeque::from(commands);
    let mut transitions = Vec::new();
    while let Some(command) = pending.pop_front() {
        let transition = reconciler.apply(command);
        if transition.needs_sync() {
            pending.extend(renderer.sync(reconciler.state()));
        }
        transitions.push(transition);
    }
    transitions
}

fn drop_token(reconciler: &mut Reconciler, renderer: &mut CompatRenderer, left: i32, top: i32) {
    pump(reconciler, renderer, vec![Command::BeginDrag]);
    let geometry = reconciler.request_drop_geometry();
    let mut commands = renderer.drag_over(left, top, geometry);
    commands.extend(renderer.drop());
    commands.push(Command::EndDrag);
    pump(reconciler, renderer, commands);
}

#[test]
fn drop_then_drop_over_existing_tile_without_compaction() {
    let (mut reconciler, mut renderer) = board();

    drop_token(&mut reconciler, &mut renderer, 10, 10);
    assert_eq!(reconciler.layout(), &[Tile::new("t1", 0, 0, 3, 3)]);

    pump(
        &mut reconciler,
        &mut renderer,
        vec![Command::SetCompaction(false)],
    );
    assert!(!renderer.engine().is_compacting());

    drop_token(&mut reconciler, &mut renderer, 10, 10);
    let layout = reconciler.layout();
    assert_eq!(layout.len(), 2);
    assert_eq!(layout[0], Tile::new("t1", 0, 3, 3, 3));
    assert_eq!(layout[1], Tile::new("t2", 0, 0, 3, 3));
    assert!(!reconciler.is_dragging());
}

#[test]
fn tile_drag_applies_only_the_final_change() {
    let (mut reconciler, mut renderer) = board();
    drop_token(&mut reconciler, &mut renderer, 10, 10);

    let mut commands = vec![Command::BeginDrag];
    commands.extend(renderer.drag_start("t1"));
    pump(&mut reconciler, &mut renderer, commands);

    let midway = renderer.drag_to("t1", 208, 0);
    assert!(!midway.is_empty());
    let transitions = pump(&mut reconciler, &mut renderer, midway);
    assert_eq!(transitions, vec![Transition::IgnoredMidDrag]);
    assert_eq!(reconciler.layout(), &[Tile::new("t1", 0, 0, 3, 3)]);

    let mut commands = vec![Command::EndDrag];
    commands.extend(renderer.drag_stop("t1", 416, 0));
    let transitions = pump(&mut reconciler, &mut renderer, commands);
    let replaced = transitions
        .iter()
        .filter(|transition| **transition == Transition::LayoutReplaced)
        .count();
    assert_eq!(replaced, 1);
    assert_eq!(reconciler.layout(), &[Tile::new("t1", 4, 0, 3, 3)]);
}

#[test]
fn compaction_toggle_reflows_canonical_layout() {
    let (mut reconciler, mut renderer) = board();
    pump(
        &mut reconciler,
        &mut renderer,
        vec![Command::SetCompaction(false)],
    );
    // Row 4 starts at 4 * 59 = 236px.
    drop_token(&mut reconciler, &mut renderer, 10, 236);
    assert_eq!(reconciler.layout()[0].y, 4);
    assert_eq!(NativeGrid::derive(reconciler.layout()).rows, 7);

    pump(
        &mut reconciler,
        &mut renderer,
        vec![Command::SetCompaction(true)],
    );
    assert_eq!(reconciler.layout(), &[Tile::new("t1", 0, 0, 3, 3)]);
    assert_eq!(NativeGrid::derive(reconciler.layout()).rows, 3);
}

#[test]
fn leaving_the_grid_cancels_the_drop() {
    let (mut reconciler, mut renderer) = board();
    pump(&mut reconciler, &mut renderer, vec![Command::BeginDrag]);
    let geometry = reconciler.request_drop_geometry();
    let mut commands = renderer.drag_over(300, 60, geometry);
    assert!(
        renderer
            .engine_layout()
            .iter()
            .any(|tile| tile.i == DROPPING_TILE_ID)
    );
    commands.extend(renderer.drag_leave());
    commands.push(Command::EndDrag);
    pump(&mut reconciler, &mut renderer, commands);

    assert!(reconciler.layout().is_empty());
    assert!(renderer.engine_layout().is_empty());
}

#[test]
fn resize_from_west_edge_keeps_right_edge() {
    let (mut reconciler, mut renderer) = board();
    // Drop at column 4.
    drop_token(&mut reconciler, &mut renderer, 416, 0);
    assert_eq!(reconciler.layout()[0].x, 4);

    let mut commands = vec![Command::BeginDrag];
    commands.extend(renderer.resize_start("t1", tile_board::ResizeHandle::W));
    pump(&mut reconciler, &mut renderer, commands);

    // Tile spans 416..712px; dragging the west edge to 208px widens it to 5 columns.
    let mut commands = vec![Command::EndDrag];
    commands.extend(renderer.resize_stop("t1", 208, 100));
    pump(&mut reconciler, &mut renderer, commands);

    let tile = &reconciler.layout()[0];
    assert_eq!((tile.x, tile.w), (2, 5));
    assert_eq!(tile.right(), 7);
}
