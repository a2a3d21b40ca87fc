//! Per-process metrics and run-level aggregates.
//!
//! # Aggregator
//!
//! `MetricsAggregator` keeps the per-process metric records in arrival
//! order and offers display-only sorting by any field.
//!
//! # Report
//!
//! `MetricsReport` computes the standard CPU scheduling averages from the
//! recorded metrics: waiting time, turnaround time and response time.
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.2: Scheduling Criteria

mod aggregator;
mod report;

pub use aggregator::{MetricField, MetricsAggregator, SortDirection, SortState};
pub use report::{round2, MetricsReport};
