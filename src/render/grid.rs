//! Gantt grid projection.

use std::fmt;

use crate::ledger::EventLedger;
use crate::models::{ColorBase, Hsla, OccupancyEvent};
use crate::palette::ColorAllocator;
use crate::resolver::{Intensity, StateSet, FULL_ALPHA};

use super::RowOrder;

/// One legend swatch.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub process_id: String,
    /// NEW-state color (full opacity).
    pub color: Hsla,
}

/// One (process, cycle) cell.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub label: String,
    /// `None` for an empty cell.
    pub intensity: Option<Intensity>,
    /// Paint color; `None` for empty and transparent cells.
    pub fill: Option<Hsla>,
}

impl GridCell {
    fn empty() -> Self {
        Self {
            label: String::new(),
            intensity: None,
            fill: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.intensity.is_none()
    }

    fn text(&self) -> &str {
        match self.intensity {
            Some(Intensity::Waiting) if self.label.is_empty() => "~",
            _ => &self.label,
        }
    }
}

/// One process row.
#[derive(Debug, Clone, PartialEq)]
pub struct GanttRow {
    pub process_id: String,
    pub color: ColorBase,
    /// One cell per column.
    pub cells: Vec<GridCell>,
}

/// Rendered process-by-cycle table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GanttGrid {
    pub legend: Vec<LegendEntry>,
    /// Cycle index of each column, `0..=max_cycle`.
    pub columns: Vec<u32>,
    pub rows: Vec<GanttRow>,
}

impl GanttGrid {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row of one process.
    pub fn row(&self, process_id: &str) -> Option<&GanttRow> {
        self.rows.iter().find(|r| r.process_id == process_id)
    }

    /// Legend color of one process.
    pub fn legend_color(&self, process_id: &str) -> Option<Hsla> {
        self.legend
            .iter()
            .find(|l| l.process_id == process_id)
            .map(|l| l.color)
    }
}

/// Rebuilds the grid from the ledger.
///
/// Legend colors are allocated in first-appearance order before rows are
/// reordered, so `order` never changes a process color. An empty ledger
/// yields an empty grid.
pub fn render(ledger: &EventLedger, colors: &mut ColorAllocator, order: RowOrder) -> GanttGrid {
    let ids = ledger.distinct_process_ids();
    let legend: Vec<LegendEntry> = ids
        .iter()
        .map(|pid| LegendEntry {
            process_id: pid.clone(),
            color: colors.color_for(pid).with_alpha(FULL_ALPHA),
        })
        .collect();

    let Some(max_cycle) = ledger.max_cycle() else {
        return GanttGrid {
            legend,
            ..GanttGrid::default()
        };
    };
    let columns: Vec<u32> = (0..=max_cycle).collect();

    let rows = order
        .apply(ids)
        .into_iter()
        .map(|pid| {
            let own: Vec<&OccupancyEvent> = ledger.events_for(pid).collect();
            let color = colors.color_for(pid);
            let cells = columns
                .iter()
                .map(|&cycle| match StateSet::at(pid, cycle, own.iter().copied()).resolve(pid) {
                    Some(resolved) => GridCell {
                        fill: resolved.intensity.paint(color),
                        intensity: Some(resolved.intensity),
                        label: resolved.label,
                    },
                    None => GridCell::empty(),
                })
                .collect();
            GanttRow {
                process_id: pid.to_string(),
                color,
                cells,
            }
        })
        .collect();

    GanttGrid {
        legend,
        columns,
        rows,
    }
}

/// Plain-text table. Waiting cells without a label show `~`.
impl fmt::Display for GanttGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.legend.is_empty() {
            let names: Vec<&str> = self.legend.iter().map(|l| l.process_id.as_str()).collect();
            writeln!(f, "Legend: {}", names.join(" "))?;
        }
        if self.columns.is_empty() {
            return writeln!(f, "(no events)");
        }

        const CORNER: &str = "Process/Cycle";
        let head_width = self
            .rows
            .iter()
            .map(|r| r.process_id.len())
            .chain(std::iter::once(CORNER.len()))
            .max()
            .unwrap_or(CORNER.len());
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                self.rows
                    .iter()
                    .map(|r| r.cells.get(i).map_or(0, |cell| cell.text().len()))
                    .chain(std::iter::once(c.to_string().len()))
                    .max()
                    .unwrap_or(1)
            })
            .collect();

        write!(f, "{CORNER:<head_width$}")?;
        for (c, w) in self.columns.iter().zip(&widths) {
            write!(f, " | {c:^w$}")?;
        }
        writeln!(f)?;
        for row in &self.rows {
            write!(f, "{:<head_width$}", row.process_id)?;
            for (cell, w) in row.cells.iter().zip(&widths) {
                write!(f, " | {:^w$}", cell.text())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessState;
    use crate::resolver::WAITING_ALPHA;

    fn ledger_with(events: &[(&str, ProcessState, u32, u32)]) -> EventLedger {
        let mut ledger = EventLedger::new();
        for &(pid, state, start, end) in events {
            ledger.append(OccupancyEvent::new(pid, state, start, end).unwrap());
        }
        ledger
    }

    #[test]
    fn test_new_accessed_terminated_scenario() {
        let ledger = ledger_with(&[
            ("P1", ProcessState::New, 0, 1),
            ("P1", ProcessState::Accessed, 1, 3),
            ("P1", ProcessState::Terminated, 3, 4),
        ]);
        let mut colors = ColorAllocator::new();
        let grid = render(&ledger, &mut colors, RowOrder::Arrival);

        assert_eq!(ledger.max_cycle(), Some(4));
        assert_eq!(grid.columns, vec![0, 1, 2, 3, 4]);
        let row = grid.row("P1").unwrap();
        assert_eq!(row.cells.len(), 5);

        assert_eq!(row.cells[0].label, "NW-P1");
        assert_eq!(row.cells[0].intensity, Some(Intensity::Transparent));
        assert!(row.cells[0].fill.is_none());

        for c in 1..=2 {
            assert_eq!(row.cells[c].label, "P1");
            assert_eq!(row.cells[c].fill.map(|h| h.alpha), Some(FULL_ALPHA));
        }

        assert_eq!(row.cells[3].label, "TD-P1");
        assert_eq!(row.cells[3].fill.map(|h| h.alpha), Some(FULL_ALPHA));
        assert!(row.cells[4].is_empty());
    }

    #[test]
    fn test_empty_ledger_renders_empty_grid() {
        let ledger = EventLedger::new();
        let mut colors = ColorAllocator::new();
        let grid = render(&ledger, &mut colors, RowOrder::Arrival);
        assert!(grid.is_empty());
        assert!(grid.columns.is_empty());
        assert!(grid.legend.is_empty());
        assert!(grid.to_string().contains("(no events)"));
    }

    #[test]
    fn test_legend_uses_full_opacity_and_first_appearance() {
        let ledger = ledger_with(&[
            ("P10", ProcessState::Waiting, 0, 2),
            ("P2", ProcessState::Accessed, 0, 1),
        ]);
        let mut colors = ColorAllocator::new();
        let grid = render(&ledger, &mut colors, RowOrder::NumericSuffix);

        let legend: Vec<&str> = grid.legend.iter().map(|l| l.process_id.as_str()).collect();
        assert_eq!(legend, vec!["P10", "P2"]);
        assert!(grid.legend.iter().all(|l| l.color.alpha == FULL_ALPHA));

        // rows are sorted, colors still follow first appearance
        let rows: Vec<&str> = grid.rows.iter().map(|r| r.process_id.as_str()).collect();
        assert_eq!(rows, vec!["P2", "P10"]);
        assert!((grid.row("P10").unwrap().color.hue - 0.0).abs() < 1e-9);

        let waiting = &grid.row("P10").unwrap().cells[0];
        assert_eq!(waiting.fill.map(|h| h.alpha), Some(WAITING_ALPHA));
    }

    #[test]
    fn test_toggle_order_does_not_touch_ledger() {
        let ledger = ledger_with(&[
            ("P10", ProcessState::Accessed, 0, 1),
            ("P1", ProcessState::Accessed, 1, 2),
        ]);
        let mut colors = ColorAllocator::new();
        let arrival = render(&ledger, &mut colors, RowOrder::Arrival);
        let sorted = render(&ledger, &mut colors, RowOrder::NumericSuffix);
        assert_eq!(arrival.rows[0].process_id, "P10");
        assert_eq!(sorted.rows[0].process_id, "P1");
        assert_eq!(ledger.distinct_process_ids()[0], "P10");
        assert_eq!(arrival.row("P1"), sorted.row("P1"));
    }

    #[test]
    fn test_text_table() {
        let ledger = ledger_with(&[
            ("P1", ProcessState::Accessed, 0, 2),
            ("P2", ProcessState::Waiting, 0, 1),
        ]);
        let mut colors = ColorAllocator::new();
        let text = render(&ledger, &mut colors, RowOrder::Arrival).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Legend: P1 P2");
        assert!(lines[1].starts_with("Process/Cycle |"));
        assert!(lines[2].starts_with("P1"));
        assert!(lines[2].contains("P1 | P1"));
        assert!(lines[3].contains('~'));
    }
}
