//! Display state layered over a rendered grid.
//!
//! The view holds the row order and a column viewport. Neither touches
//! the ledger; changing them only changes what the next render shows.

use std::ops::Deref;

use super::{GanttGrid, GanttRow, RowOrder};

/// Visible column window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Index of the first visible column.
    pub first_column: usize,
    /// Number of visible columns, `None` for all.
    pub width: Option<usize>,
}

impl Viewport {
    /// A window of `width` columns starting at column 0.
    pub fn columns(width: usize) -> Self {
        Self {
            first_column: 0,
            width: Some(width),
        }
    }

    /// The full grid.
    pub fn full() -> Self {
        Self::default()
    }

    fn range(&self, total: usize) -> std::ops::Range<usize> {
        let start = self.first_column.min(total);
        let end = match self.width {
            Some(w) => start.saturating_add(w).min(total),
            None => total,
        };
        start..end
    }
}

/// Row order plus viewport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridView {
    pub order: RowOrder,
    pub viewport: Viewport,
}

impl GridView {
    pub fn new(order: RowOrder, viewport: Viewport) -> Self {
        Self { order, viewport }
    }

    /// Switches between arrival and numeric-suffix order.
    pub fn toggle_order(&mut self) -> RowOrder {
        self.order = self.order.toggled();
        self.order
    }

    /// Scrolls a fixed-width viewport so the last column is visible.
    pub fn follow(&mut self, grid: &GanttGrid) {
        if let Some(width) = self.viewport.width {
            self.viewport.first_column = grid.columns.len().saturating_sub(width);
        }
    }

    /// Crops `grid` to the viewport. Legend and rows are kept whole.
    pub fn visible(&self, grid: &GanttGrid) -> GanttGrid {
        let range = self.viewport.range(grid.columns.len());
        GanttGrid {
            legend: grid.legend.clone(),
            columns: grid.columns[range.clone()].to_vec(),
            rows: grid
                .rows
                .iter()
                .map(|row| GanttRow {
                    process_id: row.process_id.clone(),
                    color: row.color,
                    cells: row.cells[range.clone()].to_vec(),
                })
                .collect(),
        }
    }

    /// Temporarily shows every column.
    ///
    /// The previous viewport comes back when the returned guard drops.
    pub fn widen(&mut self) -> WidenedView<'_> {
        let saved = self.viewport;
        self.viewport = Viewport::full();
        WidenedView { view: self, saved }
    }
}

/// Full-width view; restores the saved viewport on drop.
#[derive(Debug)]
pub struct WidenedView<'a> {
    view: &'a mut GridView,
    saved: Viewport,
}

impl Deref for WidenedView<'_> {
    type Target = GridView;

    fn deref(&self) -> &GridView {
        &*self.view
    }
}

impl Drop for WidenedView<'_> {
    fn drop(&mut self) {
        self.view.viewport = self.saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::EventLedger;
    use crate::models::{OccupancyEvent, ProcessState};
    use crate::palette::ColorAllocator;
    use crate::render::render;

    fn grid(end: u32) -> GanttGrid {
        let mut ledger = EventLedger::new();
        ledger.append(OccupancyEvent::new("P1", ProcessState::Accessed, 0, end).unwrap());
        render(&ledger, &mut ColorAllocator::new(), RowOrder::Arrival)
    }

    #[test]
    fn test_visible_crops_columns() {
        let g = grid(9); // columns 0..=9
        let view = GridView::new(RowOrder::Arrival, Viewport { first_column: 2, width: Some(3) });
        let v = view.visible(&g);
        assert_eq!(v.columns, vec![2, 3, 4]);
        assert_eq!(v.rows[0].cells.len(), 3);
    }

    #[test]
    fn test_visible_clamps_out_of_range() {
        let g = grid(2);
        let view = GridView::new(RowOrder::Arrival, Viewport { first_column: 10, width: Some(3) });
        assert!(view.visible(&g).columns.is_empty());
    }

    #[test]
    fn test_follow_keeps_latest_visible() {
        let g = grid(9);
        let mut view = GridView::new(RowOrder::Arrival, Viewport::columns(4));
        view.follow(&g);
        assert_eq!(view.visible(&g).columns, vec![6, 7, 8, 9]);
    }

    #[test]
    fn test_widen_restores_on_drop() {
        let g = grid(9);
        let mut view = GridView::new(RowOrder::Arrival, Viewport::columns(2));
        {
            let wide = view.widen();
            assert_eq!(wide.visible(&g).columns.len(), 10);
        }
        assert_eq!(view.viewport, Viewport::columns(2));
    }

    #[test]
    fn test_toggle_order() {
        let mut view = GridView::default();
        assert_eq!(view.toggle_order(), RowOrder::NumericSuffix);
        assert_eq!(view.toggle_order(), RowOrder::Arrival);
    }
}
