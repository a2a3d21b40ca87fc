//! Run-level performance averages.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Avg Waiting | Mean cycles spent ready but not executing |
//! | Avg Turnaround | Mean of `end - arrival` |
//! | Avg Response | Mean of `start - arrival` |
//!
//! # Reference
//! Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.2

use crate::models::MetricRecord;

/// Rounds to 2 decimal places.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Run performance averages, all in cycles and rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsReport {
    /// Number of processes with a metric record.
    pub process_count: usize,
    /// Mean waiting time.
    pub avg_waiting: f64,
    /// Mean turnaround time.
    pub avg_turnaround: f64,
    /// Mean response time.
    pub avg_response: f64,
    /// Average waiting time as reported by the backend, if it sent one.
    pub reported_avg_waiting: Option<f64>,
}

impl MetricsReport {
    /// Computes the averages from recorded metrics.
    ///
    /// Returns `None` for an empty record set.
    pub fn calculate(records: &[MetricRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let mut total_waiting = 0.0;
        let mut total_turnaround: i64 = 0;
        let mut total_response: i64 = 0;

        for m in records {
            total_waiting += m.waiting_time;
            total_turnaround += m.turnaround_time();
            total_response += m.response_time();
        }

        let n = records.len() as f64;
        Some(Self {
            process_count: records.len(),
            avg_waiting: round2(total_waiting / n),
            avg_turnaround: round2(total_turnaround as f64 / n),
            avg_response: round2(total_response as f64 / n),
            reported_avg_waiting: None,
        })
    }

    /// Attaches the backend-reported waiting average.
    pub fn with_reported(mut self, reported: Option<f64>) -> Self {
        self.reported_avg_waiting = reported.map(round2);
        self
    }

    /// Whether the backend-reported average agrees with the local one.
    pub fn matches_reported(&self) -> Option<bool> {
        self.reported_avg_waiting
            .map(|r| (r - self.avg_waiting).abs() < 0.005 + 1e-9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(pid: &str, arrival: i64, start: i64, end: i64, waiting: f64) -> MetricRecord {
        MetricRecord::new(pid)
            .with_demand(arrival, end - start)
            .with_span(start, end)
            .with_waiting(waiting)
    }

    #[test]
    fn test_report_basic() {
        let records = vec![rec("P1", 0, 0, 3, 0.0), rec("P2", 1, 3, 5, 2.0)];
        let r = MetricsReport::calculate(&records).unwrap();
        assert_eq!(r.process_count, 2);
        assert!((r.avg_waiting - 1.0).abs() < 1e-10);
        // turnaround: 3, 4
        assert!((r.avg_turnaround - 3.5).abs() < 1e-10);
        // response: 0, 2
        assert!((r.avg_response - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_report_empty() {
        assert!(MetricsReport::calculate(&[]).is_none());
    }

    #[test]
    fn test_report_reported_average() {
        let records = vec![rec("P1", 0, 0, 3, 2.0), rec("P2", 0, 3, 5, 4.0)];
        let r = MetricsReport::calculate(&records)
            .unwrap()
            .with_reported(Some(3.0));
        assert_eq!(r.matches_reported(), Some(true));

        let r = r.with_reported(Some(3.5));
        assert_eq!(r.matches_reported(), Some(false));

        let r = r.with_reported(None);
        assert_eq!(r.matches_reported(), None);
    }
}
