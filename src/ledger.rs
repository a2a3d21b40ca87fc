//! Append-only event ledger.
//!
//! The ledger is the source of truth for one run: every occupancy event
//! and metric record received since the last reset, in arrival order.
//! Only the stream controller mutates it; the renderer and the metrics
//! views read it.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::metrics::MetricsAggregator;
use crate::models::{MetricRecord, OccupancyEvent};

/// Lifecycle phase of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing received yet.
    #[default]
    AwaitingConfig,
    /// Receiving events.
    Running,
    /// Terminal signal received; read-only until reset.
    Finished,
}

impl Phase {
    /// Status line text.
    pub fn status(&self) -> &'static str {
        match self {
            Phase::AwaitingConfig => "Status: waiting for configuration",
            Phase::Running => "Status: running",
            Phase::Finished => "Status: finished",
        }
    }
}

/// Kind of a backend "loaded" notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadedKind {
    Process,
    Resource,
    Action,
}

/// One pass-through row of a loaded table.
pub type LoadedRow = Map<String, Value>;

/// Read-only tables of the inputs the backend loaded for a synchronization run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedTables {
    pub processes: Vec<LoadedRow>,
    pub resources: Vec<LoadedRow>,
    pub actions: Vec<LoadedRow>,
}

impl LoadedTables {
    /// Rows of one kind.
    pub fn rows(&self, kind: LoadedKind) -> &[LoadedRow] {
        match kind {
            LoadedKind::Process => &self.processes,
            LoadedKind::Resource => &self.resources,
            LoadedKind::Action => &self.actions,
        }
    }

    fn push(&mut self, kind: LoadedKind, row: LoadedRow) {
        match kind {
            LoadedKind::Process => self.processes.push(row),
            LoadedKind::Resource => self.resources.push(row),
            LoadedKind::Action => self.actions.push(row),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty() && self.resources.is_empty() && self.actions.is_empty()
    }
}

/// Insertion-ordered store of everything received in one run.
#[derive(Debug, Clone, Default)]
pub struct EventLedger {
    events: Vec<OccupancyEvent>,
    metrics: MetricsAggregator,
    process_order: Vec<String>,
    seen: HashSet<String>,
    current_cycle: u32,
    phase: Phase,
    loaded: LoadedTables,
    reported_avg_waiting: Option<f64>,
}

impl EventLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an occupancy event and advances the current cycle.
    pub fn append(&mut self, event: OccupancyEvent) {
        if self.seen.insert(event.process_id().to_string()) {
            self.process_order.push(event.process_id().to_string());
        }
        self.current_cycle = self.current_cycle.max(event.end_cycle());
        self.events.push(event);
    }

    /// Appends a per-process metric record.
    pub fn append_metric(&mut self, record: MetricRecord) {
        self.metrics.record(record);
    }

    /// Appends a row to one of the loaded tables.
    pub fn append_loaded(&mut self, kind: LoadedKind, row: LoadedRow) {
        self.loaded.push(kind, row);
    }

    /// Stores the average waiting time reported by the backend.
    pub fn set_reported_avg_waiting(&mut self, value: f64) {
        self.reported_avg_waiting = Some(value);
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Clears everything and returns to `AwaitingConfig`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn all_events(&self) -> &[OccupancyEvent] {
        &self.events
    }

    pub fn all_metrics(&self) -> &[MetricRecord] {
        self.metrics.records()
    }

    pub fn metrics(&self) -> &MetricsAggregator {
        &self.metrics
    }

    /// Metrics for sort requests. Sorting never touches stored order.
    pub fn metrics_mut(&mut self) -> &mut MetricsAggregator {
        &mut self.metrics
    }

    /// Process ids in first-appearance order.
    pub fn distinct_process_ids(&self) -> &[String] {
        &self.process_order
    }

    /// Events of one process, in arrival order.
    pub fn events_for<'a>(&'a self, process_id: &'a str) -> impl Iterator<Item = &'a OccupancyEvent> + 'a {
        self.events.iter().filter(move |e| e.process_id() == process_id)
    }

    /// Largest `end_cycle` over all events, `None` when empty.
    pub fn max_cycle(&self) -> Option<u32> {
        self.events.iter().map(|e| e.end_cycle()).max()
    }

    /// Largest `end_cycle` seen so far, 0 when empty.
    pub fn current_cycle(&self) -> u32 {
        self.current_cycle
    }

    /// Current-cycle counter text, `--` before the first event.
    pub fn cycle_text(&self) -> String {
        if self.events.is_empty() {
            "Current cycle: --".to_string()
        } else {
            format!("Current cycle: {}", self.current_cycle)
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn loaded(&self) -> &LoadedTables {
        &self.loaded
    }

    pub fn reported_avg_waiting(&self) -> Option<f64> {
        self.reported_avg_waiting
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.metrics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessState;

    fn ev(pid: &str, state: ProcessState, start: u32, end: u32) -> OccupancyEvent {
        OccupancyEvent::new(pid, state, start, end).unwrap()
    }

    #[test]
    fn test_distinct_ids_first_appearance() {
        let mut ledger = EventLedger::new();
        ledger.append(ev("P2", ProcessState::New, 0, 1));
        ledger.append(ev("P1", ProcessState::New, 0, 1));
        ledger.append(ev("P2", ProcessState::Accessed, 1, 2));
        assert_eq!(ledger.distinct_process_ids(), &["P2".to_string(), "P1".to_string()]);
        assert_eq!(ledger.events_for("P2").count(), 2);
    }

    #[test]
    fn test_max_and_current_cycle() {
        let mut ledger = EventLedger::new();
        assert_eq!(ledger.max_cycle(), None);
        assert_eq!(ledger.current_cycle(), 0);
        assert_eq!(ledger.cycle_text(), "Current cycle: --");

        ledger.append(ev("P1", ProcessState::Accessed, 0, 5));
        ledger.append(ev("P2", ProcessState::Waiting, 1, 3));
        assert_eq!(ledger.max_cycle(), Some(5));
        // a later event ending earlier does not move the counter back
        assert_eq!(ledger.current_cycle(), 5);
        assert_eq!(ledger.cycle_text(), "Current cycle: 5");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut ledger = EventLedger::new();
        ledger.append(ev("P1", ProcessState::New, 0, 1));
        ledger.append_metric(MetricRecord::new("P1"));
        ledger.append_loaded(LoadedKind::Resource, LoadedRow::new());
        ledger.set_reported_avg_waiting(1.5);
        ledger.set_phase(Phase::Finished);

        ledger.reset();
        assert!(ledger.is_empty());
        assert!(ledger.all_events().is_empty());
        assert!(ledger.all_metrics().is_empty());
        assert!(ledger.distinct_process_ids().is_empty());
        assert!(ledger.loaded().is_empty());
        assert_eq!(ledger.reported_avg_waiting(), None);
        assert_eq!(ledger.phase(), Phase::AwaitingConfig);
        assert_eq!(ledger.max_cycle(), None);
    }

    #[test]
    fn test_loaded_tables_by_kind() {
        let mut ledger = EventLedger::new();
        let mut row = LoadedRow::new();
        row.insert("name".into(), Value::from("R1"));
        ledger.append_loaded(LoadedKind::Resource, row);
        assert_eq!(ledger.loaded().rows(LoadedKind::Resource).len(), 1);
        assert!(ledger.loaded().rows(LoadedKind::Action).is_empty());
    }
}
