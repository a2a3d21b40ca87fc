//! Raster export of the grid and the metrics panel.
//!
//! Export works on an already rendered grid, so it never reads or
//! mutates the ledger. The viewport is widened to the full grid for the
//! capture and restored afterwards, whether the capture succeeds or not.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use tracing::info;

use crate::error::Result;
use crate::metrics::MetricsAggregator;
use crate::resolver::Intensity;

use super::{GanttGrid, GridView};

const BACKGROUND: [u8; 3] = [255, 255, 255];
const GRID_LINE: Rgba<u8> = Rgba([220, 220, 220, 255]);
const HEADER_EVEN: Rgba<u8> = Rgba([200, 200, 200, 255]);
const HEADER_ODD: Rgba<u8> = Rgba([170, 170, 170, 255]);
const NEUTRAL: Rgba<u8> = Rgba([128, 128, 128, 255]);

/// Draws grids into RGBA images.
///
/// Layout, top to bottom: legend swatches, column header band, one row
/// per process (swatch + cells), then one waiting-time bar per metric
/// record in the aggregator's display order.
#[derive(Debug, Clone)]
pub struct RasterExporter {
    /// Cell edge length (px).
    pub cell_px: u32,
    /// Spacing between blocks (px).
    pub gap_px: u32,
    /// Height of a waiting-time bar (px).
    pub bar_px: u32,
    /// Length of the longest waiting-time bar (px).
    pub bar_max_px: u32,
}

impl Default for RasterExporter {
    fn default() -> Self {
        Self {
            cell_px: 24,
            gap_px: 4,
            bar_px: 12,
            bar_max_px: 240,
        }
    }
}

fn opaque(rgb: [u8; 3]) -> Rgba<u8> {
    Rgba([rgb[0], rgb[1], rgb[2], 255])
}

impl RasterExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cell size.
    pub fn with_cell_size(mut self, cell_px: u32) -> Self {
        self.cell_px = cell_px.max(2);
        self
    }

    /// Draws `grid` and the metrics panel.
    pub fn rasterize(&self, grid: &GanttGrid, metrics: &MetricsAggregator) -> RgbaImage {
        let cell = self.cell_px;
        let gap = self.gap_px;
        let body_x = gap + cell + gap;

        let grid_w = grid.columns.len() as u32 * cell;
        let legend_w = grid.legend.len() as u32 * (cell + gap);
        let width = body_x + grid_w.max(legend_w).max(self.bar_max_px) + gap;

        let legend_y = gap;
        let header_y = legend_y + cell + gap;
        let header_h = cell / 2;
        let rows_y = header_y + header_h;
        let metrics_y = rows_y + grid.rows.len() as u32 * cell + gap;
        let height = metrics_y + metrics.len() as u32 * (self.bar_px + gap) + gap;

        let mut img = RgbaImage::from_pixel(width, height, opaque(BACKGROUND));

        for (i, entry) in grid.legend.iter().enumerate() {
            let x = body_x + i as u32 * (cell + gap);
            draw_filled_rect_mut(
                &mut img,
                Rect::at(x as i32, legend_y as i32).of_size(cell, cell),
                opaque(entry.color.over(BACKGROUND)),
            );
        }

        for i in 0..grid.columns.len() as u32 {
            let shade = if i % 2 == 0 { HEADER_EVEN } else { HEADER_ODD };
            draw_filled_rect_mut(
                &mut img,
                Rect::at((body_x + i * cell) as i32, header_y as i32).of_size(cell, header_h.max(1)),
                shade,
            );
        }

        for (r, row) in grid.rows.iter().enumerate() {
            let y = rows_y + r as u32 * cell;
            draw_filled_rect_mut(
                &mut img,
                Rect::at(gap as i32, y as i32).of_size(cell, cell),
                opaque(row.color.to_rgb()),
            );
            for (c, grid_cell) in row.cells.iter().enumerate() {
                let rect = Rect::at((body_x + c as u32 * cell) as i32, y as i32).of_size(cell, cell);
                match (grid_cell.intensity, grid_cell.fill) {
                    (Some(_), Some(fill)) => {
                        draw_filled_rect_mut(&mut img, rect, opaque(fill.over(BACKGROUND)))
                    }
                    (Some(Intensity::Transparent), None) => {
                        draw_hollow_rect_mut(&mut img, rect, opaque(row.color.to_rgb()))
                    }
                    _ => draw_hollow_rect_mut(&mut img, rect, GRID_LINE),
                }
            }
        }

        let sorted = metrics.sorted();
        let longest = sorted
            .iter()
            .map(|m| m.waiting_time)
            .fold(0.0_f64, f64::max);
        for (i, record) in sorted.iter().enumerate() {
            let y = metrics_y + i as u32 * (self.bar_px + gap);
            let color = grid
                .legend_color(&record.process_id)
                .map(|c| opaque(c.over(BACKGROUND)))
                .unwrap_or(NEUTRAL);
            let len = if longest > 0.0 {
                ((record.waiting_time / longest) * f64::from(self.bar_max_px)).round() as u32
            } else {
                0
            };
            draw_filled_rect_mut(
                &mut img,
                Rect::at(body_x as i32, y as i32).of_size(len.max(1), self.bar_px.max(1)),
                color,
            );
        }

        img
    }

    /// Encodes the capture as PNG bytes.
    pub fn encode_png(&self, grid: &GanttGrid, metrics: &MetricsAggregator) -> Result<Vec<u8>> {
        let img = self.rasterize(grid, metrics);
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        Ok(buf)
    }

    /// Captures the full-width grid to a PNG file.
    ///
    /// `view` is widened for the capture and restored before returning,
    /// on both the success and the error path.
    pub fn export_png(
        &self,
        view: &mut GridView,
        grid: &GanttGrid,
        metrics: &MetricsAggregator,
        path: &Path,
    ) -> Result<()> {
        let wide = view.widen();
        let snapshot = wide.visible(grid);
        let img = self.rasterize(&snapshot, metrics);
        img.save_with_format(path, ImageFormat::Png)?;
        info!(path = %path.display(), columns = snapshot.columns.len(), "exported grid");
        Ok(())
    }
}
