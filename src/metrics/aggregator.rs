//! Metric record store with display-only sorting.

use std::cmp::Ordering;

use crate::models::MetricRecord;

use super::report::round2;

/// Sortable column of the metrics table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricField {
    ProcessId,
    ArrivalTime,
    BurstTime,
    Priority,
    StartTime,
    EndTime,
    WaitingTime,
}

impl MetricField {
    /// All columns in table order.
    pub const ALL: [MetricField; 7] = [
        MetricField::ProcessId,
        MetricField::ArrivalTime,
        MetricField::BurstTime,
        MetricField::Priority,
        MetricField::StartTime,
        MetricField::EndTime,
        MetricField::WaitingTime,
    ];

    /// Column header.
    pub fn header(&self) -> &'static str {
        match self {
            MetricField::ProcessId => "PID",
            MetricField::ArrivalTime => "AT",
            MetricField::BurstTime => "BT",
            MetricField::Priority => "Priority",
            MetricField::StartTime => "Start",
            MetricField::EndTime => "End",
            MetricField::WaitingTime => "Waiting",
        }
    }

    /// Cell text for a record.
    pub fn cell(&self, record: &MetricRecord) -> String {
        match self {
            MetricField::ProcessId => record.process_id.clone(),
            MetricField::ArrivalTime => record.arrival_time.to_string(),
            MetricField::BurstTime => record.burst_time.to_string(),
            MetricField::Priority => record.priority.to_string(),
            MetricField::StartTime => record.start_time.to_string(),
            MetricField::EndTime => record.end_time.to_string(),
            MetricField::WaitingTime => record.waiting_time.to_string(),
        }
    }

    /// Compares two records on this field.
    ///
    /// The process id compares lexicographically, every other field numerically.
    pub fn compare(&self, a: &MetricRecord, b: &MetricRecord) -> Ordering {
        match self {
            MetricField::ProcessId => a.process_id.cmp(&b.process_id),
            MetricField::ArrivalTime => a.arrival_time.cmp(&b.arrival_time),
            MetricField::BurstTime => a.burst_time.cmp(&b.burst_time),
            MetricField::Priority => a.priority.cmp(&b.priority),
            MetricField::StartTime => a.start_time.cmp(&b.start_time),
            MetricField::EndTime => a.end_time.cmp(&b.end_time),
            MetricField::WaitingTime => a.waiting_time.total_cmp(&b.waiting_time),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: MetricField,
    pub direction: SortDirection,
}

/// Accumulates per-process metric records.
///
/// Stored order is always arrival order; sorting only affects
/// [`sorted`](Self::sorted).
#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    records: Vec<MetricRecord>,
    sort: Option<SortState>,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn record(&mut self, metric: MetricRecord) {
        self.records.push(metric);
    }

    /// Records in arrival order.
    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mean waiting time rounded to 2 decimals, `None` when no records exist.
    pub fn summary(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let total: f64 = self.records.iter().map(|m| m.waiting_time).sum();
        Some(round2(total / self.records.len() as f64))
    }

    /// Summary as display text.
    pub fn summary_text(&self) -> String {
        match self.summary() {
            Some(avg) => format!("Average waiting time: {avg:.2} cycles"),
            None => "Average waiting time: no data".to_string(),
        }
    }

    /// Requests a sort on `field`.
    ///
    /// A new field sorts ascending; repeating the current field flips the direction.
    pub fn sort_by(&mut self, field: MetricField) -> SortState {
        let direction = match self.sort {
            Some(current) if current.field == field => current.direction.flip(),
            _ => SortDirection::Ascending,
        };
        let state = SortState { field, direction };
        self.sort = Some(state);
        state
    }

    /// Current sort, if any.
    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    /// Records in display order. Ties keep arrival order.
    pub fn sorted(&self) -> Vec<&MetricRecord> {
        let mut view: Vec<&MetricRecord> = self.records.iter().collect();
        if let Some(SortState { field, direction }) = self.sort {
            view.sort_by(|a, b| {
                let ord = field.compare(a, b);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        view
    }

    /// Clears records and sort state.
    pub fn reset(&mut self) {
        self.records.clear();
        self.sort = None;
    }
}
