use std::collections::VecDeque;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use serde_json::json;

use crate::engine::GridConfig;
use crate::geometry::Size;
use crate::layout::ScreenLayout;
use crate::logging::{FileSink, event_with_fields, json_kv};
use crate::metrics::BoardMetrics;
use crate::reconciler::{Command, Reconciler, Transition};
use crate::render::{
    AnsiRenderer, CompatHit, CompatRenderer, HeaderView, compose_frame, pane_content,
};
use crate::tile::{ClockIds, TileIdSource, find};
use crate::{LogLevel, Logger, Result};

pub mod driver;
mod input;

pub use input::{BoardEvent, Gesture};

const LOG_TARGET: &str = "tile_board::runtime";

/// Upper bound on reconciler/engine round trips for one input.
const MAX_SYNC_ROUNDS: usize = 8;

/// Configuration knobs for the runtime loop.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Interval between synthetic tick events.
    pub tick_interval: Duration,
    /// Optional structured logger shared by the runtime and the reconciler.
    pub logger: Option<Logger>,
    /// Metrics accumulator used for periodic snapshots.
    pub metrics: Option<Arc<Mutex<BoardMetrics>>>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
    /// Grid handed to the layout engine, in terminal cells.
    pub grid: GridConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(200),
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(5),
            metrics_target: "tile_board::runtime.metrics".to_string(),
            grid: GridConfig::terminal(),
        }
    }
}

impl RuntimeConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(BoardMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<BoardMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }

    /// Log JSON lines to `path`, truncating the file past `max_bytes`.
    pub fn with_log_file(mut self, path: impl AsRef<Path>, max_bytes: u64) -> Result<Self> {
        let sink = FileSink::new(path, max_bytes)?;
        self.logger = Some(Logger::new(sink));
        Ok(self)
    }
}

/// Terminal front end for the board: routes pointer and key input to the
/// engine-backed pane and the reconciler, then paints both panes.
pub struct BoardRuntime {
    reconciler: Reconciler,
    compat: CompatRenderer,
    screen: ScreenLayout,
    size: Size,
    renderer: AnsiRenderer,
    config: RuntimeConfig,
    gesture: Gesture,
    status: String,
    should_exit: bool,
    redraw_requested: bool,
    start_instant: Option<Instant>,
    last_metrics_emit: Option<Instant>,
}

impl BoardRuntime {
    pub fn new(config: RuntimeConfig, renderer: AnsiRenderer, initial_size: Size) -> Self {
        Self::with_ids(config, renderer, initial_size, ClockIds::new())
    }

    /// Like [`BoardRuntime::new`], with a custom source of tile ids.
    pub fn with_ids<I>(
        mut config: RuntimeConfig,
        renderer: AnsiRenderer,
        initial_size: Size,
        ids: I,
    ) -> Self
    where
        I: TileIdSource + Send + 'static,
    {
        if config.metrics_interval > Duration::ZERO {
            config.enable_metrics();
        }

        let mut reconciler = Reconciler::with_ids(ids);
        if let Some(logger) = config.logger.clone() {
            reconciler = reconciler.with_logger(logger);
        }
        if let Some(metrics) = config.metrics_handle() {
            reconciler = reconciler.with_metrics(metrics);
        }

        let compat = CompatRenderer::with_grid_engine(config.grid.clone());
        let mut runtime = Self {
            reconciler,
            compat,
            screen: ScreenLayout::solve(initial_size),
            size: initial_size,
            renderer,
            config,
            gesture: Gesture::Idle,
            status: String::new(),
            should_exit: false,
            redraw_requested: true,
            start_instant: None,
            last_metrics_emit: None,
        };
        runtime.resize(initial_size);
        runtime
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn compat(&self) -> &CompatRenderer {
        &self.compat
    }

    pub fn screen(&self) -> &ScreenLayout {
        &self.screen
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.screen = ScreenLayout::solve(size);
        let container = pane_content(self.screen.compat_pane);
        self.compat.set_container_width(container.width);
        self.renderer.invalidate();
        self.redraw_requested = true;
    }

    pub fn run(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.bootstrap(stdout)?;
        let mut last_tick = Instant::now();

        while !self.should_exit {
            let timeout = self
                .config
                .tick_interval
                .checked_sub(last_tick.elapsed())
                .unwrap_or(Duration::ZERO);

            if event::poll(timeout)? {
                if let Some(board_event) = Self::map_event(event::read()?) {
                    self.dispatch_event(board_event);
                    self.render_if_needed(stdout)?;
                    if self.should_exit {
                        break;
                    }
                }
            }

            if last_tick.elapsed() >= self.config.tick_interval {
                let now = Instant::now();
                let elapsed = now.duration_since(last_tick);
                last_tick = now;
                self.dispatch_event(BoardEvent::Tick { elapsed });
                self.render_if_needed(stdout)?;
            }

            self.maybe_emit_metrics();
        }

        self.finalize();
        Ok(())
    }

    /// Feed a fixed event sequence through the same path as [`BoardRuntime::run`].
    pub fn run_scripted<I>(&mut self, stdout: &mut impl Write, events: I) -> Result<()>
    where
        I: IntoIterator<Item = BoardEvent>,
    {
        self.bootstrap(stdout)?;
        for event in events {
            self.dispatch_event(event);
            self.render_if_needed(stdout)?;
            if self.should_exit {
                break;
            }
        }
        self.finalize();
        Ok(())
    }

    fn map_event(event: CrosstermEvent) -> Option<BoardEvent> {
        match event {
            CrosstermEvent::Key(key) => Some(BoardEvent::Key(key)),
            CrosstermEvent::Mouse(mouse) => Some(BoardEvent::Mouse(mouse)),
            CrosstermEvent::Resize(width, height) => {
                Some(BoardEvent::Resize(Size::new(width, height)))
            }
            CrosstermEvent::FocusGained | CrosstermEvent::FocusLost | CrosstermEvent::Paste(_) => {
                None
            }
        }
    }

    fn dispatch_event(&mut self, event: BoardEvent) {
        let name = event.describe();
        match event {
            BoardEvent::Tick { .. } => {}
            BoardEvent::Key(key) => self.handle_key(key),
            BoardEvent::Mouse(mouse) => self.handle_mouse(mouse),
            BoardEvent::Resize(size) => {
                self.resize(size);
                self.log_runtime_event(
                    LogLevel::Info,
                    "resized",
                    [
                        json_kv("width", json!(size.width)),
                        json_kv("height", json!(size.height)),
                    ],
                );
            }
        }
        self.record_event_metric();
        self.log_runtime_event(
            LogLevel::Debug,
            "event_dispatched",
            [json_kv("event", json!(name))],
        );
        self.maybe_emit_metrics();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.request_exit()
            }
            KeyCode::Char('q') | KeyCode::Esc => self.request_exit(),
            KeyCode::Char('c') => self.toggle_compaction(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.pointer_down(column, row),
            MouseEventKind::Drag(MouseButton::Left) => self.pointer_drag(column, row),
            MouseEventKind::Up(MouseButton::Left) => self.pointer_up(column, row),
            _ => return,
        }
        self.redraw_requested = true;
    }

    /// Pointer position relative to the engine pane's container, possibly negative.
    fn container_point(&self, column: u16, row: u16) -> (i32, i32) {
        let container = pane_content(self.screen.compat_pane);
        (
            i32::from(column) - i32::from(container.x),
            i32::from(row) - i32::from(container.y),
        )
    }

    fn over_container(&self, column: u16, row: u16) -> bool {
        pane_content(self.screen.compat_pane).contains(column, row)
    }

    fn pointer_down(&mut self, column: u16, row: u16) {
        if !self.gesture.is_idle() {
            return;
        }

        if self.screen.token.contains(column, row) {
            self.gesture = Gesture::Token { over_grid: false };
            self.apply_commands(vec![Command::BeginDrag]);
            return;
        }

        if self.screen.switch.contains(column, row) {
            self.toggle_compaction();
            return;
        }

        if !self.over_container(column, row) {
            return;
        }

        let (left, top) = self.container_point(column, row);
        match self.compat.hit_test(left, top) {
            Some(CompatHit::Delete(id)) => self.apply_commands(vec![Command::Remove(id)]),
            Some(CompatHit::Resize(id, handle)) => {
                let mut commands = vec![Command::BeginDrag];
                commands.extend(self.compat.resize_start(&id, handle));
                self.gesture = Gesture::Resize { id };
                self.apply_commands(commands);
            }
            Some(CompatHit::Body(id)) => {
                let params = self.compat.params();
                let grab = find(self.compat.engine_layout(), &id)
                    .map(|tile| {
                        let frame = params.calc_position(tile);
                        (left - frame.left, top - frame.top)
                    })
                    .unwrap_or((0, 0));
                let mut commands = vec![Command::BeginDrag];
                commands.extend(self.compat.drag_start(&id));
                self.gesture = Gesture::Move { id, grab };
                self.apply_commands(commands);
            }
            None => {}
        }
    }

    fn pointer_drag(&mut self, column: u16, row: u16) {
        let (left, top) = self.container_point(column, row);
        let commands = match self.gesture.clone() {
            Gesture::Idle => return,
            Gesture::Token { over_grid } => {
                let inside = self.over_container(column, row);
                self.gesture = Gesture::Token { over_grid: inside };
                if inside {
                    let geometry = self.reconciler.request_drop_geometry();
                    self.compat.drag_over(left, top, geometry)
                } else if over_grid {
                    self.compat.drag_leave()
                } else {
                    Vec::new()
                }
            }
            Gesture::Move { id, grab } => self.compat.drag_to(&id, left - grab.0, top - grab.1),
            Gesture::Resize { id } => self.compat.resize_to(&id, left, top),
        };
        self.apply_commands(commands);
    }

    fn pointer_up(&mut self, column: u16, row: u16) {
        let (left, top) = self.container_point(column, row);
        let gesture = std::mem::take(&mut self.gesture);
        let commands = match gesture {
            Gesture::Idle => return,
            Gesture::Token { .. } => {
                let mut commands = Vec::new();
                if self.over_container(column, row) {
                    let geometry = self.reconciler.request_drop_geometry();
                    commands.extend(self.compat.drag_over(left, top, geometry));
                    commands.extend(self.compat.drop());
                } else {
                    commands.extend(self.compat.drag_leave());
                }
                commands.push(Command::EndDrag);
                commands
            }
            Gesture::Move { id, grab } => {
                let mut commands = vec![Command::EndDrag];
                commands.extend(self.compat.drag_stop(&id, left - grab.0, top - grab.1));
                commands
            }
            Gesture::Resize { id } => {
                let mut commands = vec![Command::EndDrag];
                commands.extend(self.compat.resize_stop(&id, left, top));
                commands
            }
        };
        self.apply_commands(commands);
    }

    fn toggle_compaction(&mut self) {
        let enabled = !self.reconciler.is_compacting();
        self.apply_commands(vec![Command::SetCompaction(enabled)]);
    }

    fn request_exit(&mut self) {
        self.should_exit = true;
        self.log_runtime_event(LogLevel::Info, "exit_requested", std::iter::empty());
    }

    /// Run commands through the reconciler in order. Every change re-syncs the
    /// engine, whose answers are queued behind the remaining commands.
    pub fn apply_commands(&mut self, commands: Vec<Command>) {
        let mut pending: VecDeque<Command> = commands.into();
        let mut rounds = 0;

        while let Some(command) = pending.pop_front() {
            let transition = self.reconciler.apply(command);
            self.update_status(&transition);
            if !transition.needs_sync() {
                continue;
            }
            self.redraw_requested = true;
            if rounds == MAX_SYNC_ROUNDS {
                self.log_runtime_event(
                    LogLevel::Warn,
                    "sync_not_settled",
                    [json_kv("rounds", json!(rounds))],
                );
                continue;
            }
            rounds += 1;
            pending.extend(self.compat.sync(self.reconciler.state()));
        }
    }

    fn update_status(&mut self, transition: &Transition) {
        if matches!(transition, Transition::Unchanged | Transition::IgnoredMidDrag) {
            return;
        }
        self.status = format!(
            "tiles: {}  last: {}",
            self.reconciler.layout().len(),
            transition.name()
        );
    }

    fn render_if_needed(&mut self, stdout: &mut impl Write) -> Result<()> {
        if !self.redraw_requested {
            return Ok(());
        }
        self.redraw_requested = false;

        let header = HeaderView {
            compact: self.reconciler.is_compacting(),
            dragging: self.reconciler.is_dragging(),
            status: &self.status,
        };
        let frame = compose_frame(
            self.size,
            &self.screen,
            header,
            &self.compat,
            self.reconciler.layout(),
        );
        let written = self
            .renderer
            .render(stdout, &frame.rows(), self.size.width)?;
        if written > 0 {
            self.record_render_metric();
            self.log_runtime_event(
                LogLevel::Debug,
                "render_completed",
                [json_kv("dirty_rows", json!(written))],
            );
        }
        Ok(())
    }

    fn bootstrap(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.should_exit = false;
        self.redraw_requested = true;
        let now = Instant::now();
        self.start_instant = Some(now);
        self.last_metrics_emit = Some(now);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_started",
            [
                json_kv("tiles", json!(self.reconciler.layout().len())),
                json_kv("width", json!(self.size.width)),
                json_kv("height", json!(self.size.height)),
            ],
        );

        let commands = self.compat.sync(self.reconciler.state());
        self.apply_commands(commands);
        self.render_if_needed(stdout)
    }

    fn finalize(&mut self) {
        let uptime_ms = self
            .start_instant
            .map(|start| start.elapsed().as_millis())
            .unwrap_or(0);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_stopped",
            [
                json_kv("uptime_ms", json!(uptime_ms)),
                json_kv("tiles", json!(self.reconciler.layout().len())),
            ],
        );
    }

    fn log_runtime_event<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, LOG_TARGET, message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn record_event_metric(&mut self) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_event();
            }
        }
    }

    fn record_render_metric(&mut self) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_render();
            }
        }
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics.is_none() || self.config.metrics_interval == Duration::ZERO {
            return;
        }

        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => return,
            _ => self.last_metrics_emit = Some(now),
        }

        let uptime = self
            .start_instant
            .map(|start| now.duration_since(start))
            .unwrap_or_default();

        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let snapshot_event = guard
                    .snapshot(uptime)
                    .to_log_event(&self.config.metrics_target);
                let _ = logger.log_event(snapshot_event);
            }
        }
    }
}
