//! Live Gantt visualization for scheduling and synchronization simulations.
//!
//! Consumes the event stream of a CPU-scheduling or synchronization
//! simulator and maintains a process-by-cycle Gantt grid, stable process
//! colors, and per-process waiting-time metrics.
//!
//! # Modules
//!
//! - **`models`**: Wire-level domain types: `OccupancyEvent`, `ProcessState`,
//!   `MetricRecord`, `RunConfig`, `ColorBase`
//! - **`palette`**: Golden-angle color allocation in first-appearance order
//! - **`resolver`**: Overlapping-state precedence for one grid cell
//! - **`ledger`**: Append-only store of everything received in a run
//! - **`render`**: Grid projection, row order, viewport, PNG export
//! - **`metrics`**: Waiting-time summary, sortable table, run averages
//! - **`stream`**: Feed transport, message decoding, controller state machine
//! - **`config`**: YAML engine configuration
//!
//! # Architecture
//!
//! ```text
//! feed ─▶ stream::StreamController ─▶ Session ─▶ ledger ─▶ render ─▶ GanttGrid
//!                                        │                   ▲
//!                                        └─ palette ─────────┘
//! ```
//!
//! A run is owned by one [`stream::Session`]; nothing is global.
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5-6
//! - Clark (1922), "The Gantt Chart: A Working Tool of Management"

pub mod config;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod models;
pub mod palette;
pub mod render;
pub mod resolver;
pub mod stream;

pub use error::{GanttError, Result};
