//! Gantt grid rendering.
//!
//! Projects the ledger into a process-by-cycle table: rows are processes,
//! columns are cycles `0..=max_cycle`, and every cell is resolved by the
//! state resolver and painted with the process color.
//!
//! The grid is rebuilt from scratch on every event. Event volume per run
//! is bounded (hundreds of cells), so no incremental patching is done.
//!
//! # Usage
//!
//! ```
//! use u_gantt::ledger::EventLedger;
//! use u_gantt::models::{OccupancyEvent, ProcessState};
//! use u_gantt::palette::ColorAllocator;
//! use u_gantt::render::{render, RowOrder};
//!
//! let mut ledger = EventLedger::new();
//! ledger.append(OccupancyEvent::new("P1", ProcessState::Accessed, 0, 2).unwrap());
//!
//! let grid = render(&ledger, &mut ColorAllocator::new(), RowOrder::Arrival);
//! assert_eq!(grid.columns, vec![0, 1, 2]);
//! assert_eq!(grid.rows[0].cells[0].label, "P1");
//! ```

mod export;
mod grid;
mod order;
mod view;

pub use export::RasterExporter;
pub use grid::{render, GanttGrid, GanttRow, GridCell, LegendEntry};
pub use order::{suffix_cmp, RowOrder};
pub use view::{GridView, Viewport, WidenedView};
