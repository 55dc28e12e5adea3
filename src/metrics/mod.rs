use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

use crate::reconciler::Transition;

#[derive(Debug, Default, Clone)]
pub struct BoardMetrics {
    events: u64,
    commands: u64,
    applied: u64,
    ignored_mid_drag: u64,
    drops: u64,
    removals: u64,
    renders: u64,
}

impl BoardMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self) {
        self.events = self.events.saturating_add(1);
    }

    pub fn record_transition(&mut self, transition: &Transition) {
        self.commands = self.commands.saturating_add(1);
        match transition {
            Transition::IgnoredMidDrag => {
                self.ignored_mid_drag = self.ignored_mid_drag.saturating_add(1);
            }
            Transition::TileAdded { .. } | Transition::DropWithoutPlaceholder => {
                self.drops = self.drops.saturating_add(1);
                self.applied = self.applied.saturating_add(1);
            }
            Transition::TileRemoved(_) => {
                self.removals = self.removals.saturating_add(1);
                self.applied = self.applied.saturating_add(1);
            }
            Transition::LayoutReplaced | Transition::CompactionChanged(_) => {
                self.applied = self.applied.saturating_add(1);
            }
            Transition::DragStarted | Transition::DragEnded | Transition::Unchanged => {}
        }
    }

    pub fn record_render(&mut self) {
        self.renders = self.renders.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            events: self.events,
            commands: self.commands,
            applied: self.applied,
            ignored_mid_drag: self.ignored_mid_drag,
            drops: self.drops,
            removals: self.removals,
            renders: self.renders,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub events: u64,
    pub commands: u64,
    pub applied: u64,
    pub ignored_mid_drag: u64,
    pub drops: u64,
    pub removals: u64,
    pub renders: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("events".to_string(), json!(self.events));
        map.insert("commands".to_string(), json!(self.commands));
        map.insert("applied".to_string(), json!(self.applied));
        map.insert("ignored_mid_drag".to_string(), json!(self.ignored_mid_drag));
        map.insert("drops".to_string(), json!(self.drops));
        map.insert("removals".to_string(), json!(self.removals));
        map.insert("renders".to_string(), json!(self.renders));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "board_metrics", self.as_fields())
    }
}
