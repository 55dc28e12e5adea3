//! Layout reconciler: the single writer of the canonical tile sequence.
//!
//! Operations are thin wrappers that build a [`Command`] and run it through
//! [`reduce`]. The wrapper adds logging and metrics; the reducer stays pure so
//! it can be tested without any renderer.

mod core;

pub use core::{BoardState, Command, Transition, reduce, request_drop_geometry};

use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::BoardMetrics;
use crate::tile::{ClockIds, DropGeometry, Layout, Tile, TileIdSource};

const LOG_TARGET: &str = "tile_board::reconciler";

pub struct Reconciler {
    state: BoardState,
    ids: Box<dyn TileIdSource + Send>,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<BoardMetrics>>>,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler {
    pub fn new() -> Self {
        Self::with_ids(ClockIds::new())
    }

    pub fn with_ids<I>(ids: I) -> Self
    where
        I: TileIdSource + Send + 'static,
    {
        Self {
            state: BoardState::default(),
            ids: Box::new(ids),
            logger: None,
            metrics: None,
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Mutex<BoardMetrics>>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn layout(&self) -> &[Tile] {
        &self.state.layout
    }

    pub fn is_dragging(&self) -> bool {
        self.state.dragging
    }

    pub fn is_compacting(&self) -> bool {
        self.state.compact
    }

    pub fn apply(&mut self, command: Command) -> Transition {
        let command_name = command.name();
        let transition = reduce(&mut self.state, command, self.ids.as_mut());
        self.record(command_name, &transition);
        transition
    }

    pub fn begin_drag(&mut self) -> Transition {
        self.apply(Command::BeginDrag)
    }

    pub fn end_drag(&mut self) -> Transition {
        self.apply(Command::EndDrag)
    }

    pub fn drop_new_tile(&mut self, proposal: Layout) -> Transition {
        self.apply(Command::Drop(proposal))
    }

    pub fn request_drop_geometry(&self) -> DropGeometry {
        request_drop_geometry()
    }

    pub fn apply_layout_change(&mut self, layout: Layout) -> Transition {
        self.apply(Command::LayoutChanged(layout))
    }

    pub fn remove_tile(&mut self, id: &str) -> Transition {
        self.apply(Command::Remove(id.to_string()))
    }

    pub fn set_compaction_mode(&mut self, enabled: bool) -> Transition {
        self.apply(Command::SetCompaction(enabled))
    }

    fn record(&self, command: &str, transition: &Transition) {
        if let Some(metrics) = self.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_transition(transition);
            }
        }

        let Some(logger) = self.logger.as_ref() else {
            return;
        };

        let mut fields = vec![
            json_kv("command", json!(command)),
            json_kv("transition", json!(transition.name())),
            json_kv("tiles", json!(self.state.layout.len())),
            json_kv("dragging", json!(self.state.dragging)),
        ];
        let level = match transition {
            Transition::TileAdded {
                id,
                discarded_placeholders,
            } => {
                fields.push(json_kv("id", json!(id)));
                if *discarded_placeholders > 0 {
                    fields.push(json_kv("discarded", json!(discarded_placeholders)));
                    LogLevel::Warn
                } else {
                    LogLevel::Info
                }
            }
            Transition::DropWithoutPlaceholder => LogLevel::Warn,
            Transition::TileRemoved(id) => {
                fields.push(json_kv("id", json!(id)));
                LogLevel::Info
            }
            Transition::CompactionChanged(enabled) => {
                fields.push(json_kv("compact", json!(enabled)));
                LogLevel::Info
            }
            _ => LogLevel::Debug,
        };

        let event = event_with_fields(level, LOG_TARGET, "command_applied", fields);
        let _ = logger.log_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use crate::tile::{DROPPING_TILE_ID, SequentialIds};

    #[test]
    fn operations_route_through_reducer() {
        let mut reconciler = Reconciler::with_ids(SequentialIds::new("n"));
        reconciler.begin_drag();
        reconciler.drop_new_tile(vec![Tile::new(DROPPING_TILE_ID, 0, 0, 3, 3)]);
        reconciler.end_drag();
        assert_eq!(reconciler.layout(), &[Tile::new("n1", 0, 0, 3, 3)]);

        reconciler.remove_tile("n1");
        assert!(reconciler.layout().is_empty());
    }

    #[test]
    fn anomalous_drops_are_logged_as_warnings() {
        let sink = MemorySink::new();
        let mut reconciler =
            Reconciler::with_ids(SequentialIds::new("n")).with_logger(Logger::new(sink.clone()));
        reconciler.drop_new_tile(vec![Tile::new("a", 0, 0, 1, 1)]);

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, LogLevel::Warn);
        assert_eq!(
            events[0].fields["transition"],
            json!("drop_without_placeholder")
        );
    }

    #[test]
    fn metrics_count_ignored_changes() {
        let metrics = Arc::new(Mutex::new(BoardMetrics::new()));
        let mut reconciler =
            Reconciler::with_ids(SequentialIds::new("n")).with_metrics(metrics.clone());
        reconciler.begin_drag();
        reconciler.apply_layout_change(vec![Tile::new("a", 0, 0, 1, 1)]);
        reconciler.apply_layout_change(vec![Tile::new("a", 0, 1, 1, 1)]);

        let snapshot = metrics.lock().unwrap().snapshot(Default::default());
        assert_eq!(snapshot.ignored_mid_drag, 2);
        assert!(reconciler.layout().is_empty());
    }
}
