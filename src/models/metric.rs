//! Per-process terminal metric record.

use serde::{Deserialize, Serialize};

/// Terminal metrics for one process, emitted once near simulation end.
///
/// All times are in cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    /// Process identifier.
    #[serde(alias = "pid")]
    pub process_id: String,
    /// Cycle at which the process arrived.
    pub arrival_time: i64,
    /// Total execution demand.
    pub burst_time: i64,
    /// Scheduling priority as given in the input.
    #[serde(default)]
    pub priority: i64,
    /// First cycle the process executed.
    pub start_time: i64,
    /// Cycle at which the process finished.
    pub end_time: i64,
    /// Cycles spent waiting.
    pub waiting_time: f64,
}

impl MetricRecord {
    /// Creates a record with zeroed times.
    pub fn new(process_id: impl Into<String>) -> Self {
        Self {
            process_id: process_id.into(),
            arrival_time: 0,
            burst_time: 0,
            priority: 0,
            start_time: 0,
            end_time: 0,
            waiting_time: 0.0,
        }
    }

    /// Sets arrival and burst time.
    pub fn with_demand(mut self, arrival_time: i64, burst_time: i64) -> Self {
        self.arrival_time = arrival_time;
        self.burst_time = burst_time;
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    /// Sets start and end time.
    pub fn with_span(mut self, start_time: i64, end_time: i64) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    /// Sets the waiting time.
    pub fn with_waiting(mut self, waiting_time: f64) -> Self {
        self.waiting_time = waiting_time;
        self
    }

    /// Turnaround time: `end_time - arrival_time`.
    #[inline]
    pub fn turnaround_time(&self) -> i64 {
        self.end_time - self.arrival_time
    }

    /// Response time: `start_time - arrival_time`.
    #[inline]
    pub fn response_time(&self) -> i64 {
        self.start_time - self.arrival_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_derived_times() {
        let m = MetricRecord::new("P1")
            .with_demand(2, 3)
            .with_span(4, 7)
            .with_waiting(2.0);
        assert_eq!(m.turnaround_time(), 5);
        assert_eq!(m.response_time(), 2);
    }

    #[test]
    fn test_metric_deserialize_backend_shape() {
        let m: MetricRecord = serde_json::from_str(
            r#"{"event":"PROCESS_METRIC","pid":"P3","arrivalTime":1,"burstTime":4,
                "priority":2,"startTime":3,"endTime":7,"waitingTime":2}"#,
        )
        .unwrap();
        assert_eq!(m.process_id, "P3");
        assert_eq!(m.burst_time, 4);
        assert!((m.waiting_time - 2.0).abs() < 1e-10);
    }
}
