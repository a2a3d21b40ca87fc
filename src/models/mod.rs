//! Visualization domain models.
//!
//! Provides the value types flowing from the simulation feed into the
//! ledger and renderer. Everything here is immutable once received.
//!
//! # Domain Mappings
//!
//! | u-gantt | Scheduling run | Synchronization run |
//! |---------|----------------|---------------------|
//! | OccupancyEvent | CPU burst / wait slice | Resource access / block |
//! | MetricRecord | Per-process completion stats | Per-process completion stats |
//! | RunConfig | Algorithm, quantum, preemption | Mutex / semaphore |
//! | ColorBase | Process swatch | Process swatch |

mod color;
mod event;
mod metric;
mod run_config;

pub use color::{ColorBase, Hsla, LIGHTNESS, SATURATION};
pub use event::{OccupancyEvent, ProcessState};
pub use metric::MetricRecord;
pub use run_config::{ConfigEcho, RunConfig, PRIORITY, ROUND_ROBIN};
