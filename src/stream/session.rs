//! Per-run state owned by the stream controller.

use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;
use crate::ledger::{EventLedger, Phase};
use crate::metrics::{MetricField, MetricsReport};
use crate::models::RunConfig;
use crate::palette::ColorAllocator;
use crate::render::{render, GanttGrid, GridView, RasterExporter};

use super::message::InboundMessage;

/// Severity of a user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// A non-fatal message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}: {}", self.level, self.title, self.message)
    }
}

/// Everything one run has produced.
///
/// `grid` is the full-width grid from the last render; callers crop it
/// with [`visible`](Self::visible).
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub ledger: EventLedger,
    pub colors: ColorAllocator,
    pub view: GridView,
    pub grid: GanttGrid,
    /// Run parameters, as requested and then as echoed by the backend.
    pub run: RunConfig,
    pub paused: bool,
    pub notifications: Vec<Notification>,
    /// Inbound messages dropped as undecodable.
    pub dropped: usize,
}

impl Session {
    pub fn new(run: RunConfig, view: GridView) -> Self {
        Self {
            run,
            view,
            ..Self::default()
        }
    }

    /// Applies one decoded message.
    ///
    /// A finished session ignores everything until reset.
    pub fn apply(&mut self, message: InboundMessage) {
        if self.ledger.phase() == Phase::Finished {
            debug!(kind = message.kind(), "run finished, message ignored");
            return;
        }
        match message {
            InboundMessage::Occupancy(event) => {
                self.colors.color_for(event.process_id());
                self.ledger.append(event);
                self.rerender();
            }
            InboundMessage::Metric(record) => self.ledger.append_metric(record),
            InboundMessage::ConfigEcho(echo) => self.run.merge_echo(&echo),
            InboundMessage::Loaded { kind, row } => self.ledger.append_loaded(kind, row),
            InboundMessage::ReportedSummary { avg_waiting } => {
                self.ledger.set_reported_avg_waiting(avg_waiting)
            }
            InboundMessage::RemoteError { message } => {
                warn!(%message, "backend reported an error");
                self.notify(NotificationLevel::Error, "Simulation error", message);
            }
            InboundMessage::Terminal => {
                self.ledger.set_phase(Phase::Finished);
                self.rerender();
            }
        }
    }

    /// Rebuilds the grid from the ledger and scrolls to the newest cycle.
    pub fn rerender(&mut self) {
        self.grid = render(&self.ledger, &mut self.colors, self.view.order);
        self.view.follow(&self.grid);
    }

    /// Clears run data; keeps the requested run parameters and the view settings.
    pub fn reset(&mut self) {
        let run = self.run.clone();
        let mut view = self.view.clone();
        view.viewport.first_column = 0;
        *self = Self::new(run, view);
    }

    pub fn notify(&mut self, level: NotificationLevel, title: impl Into<String>, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, title, message));
    }

    /// The grid cropped to the current viewport.
    pub fn visible(&self) -> GanttGrid {
        self.view.visible(&self.grid)
    }

    /// Averages over recorded metrics, with the backend figure attached.
    pub fn report(&self) -> Option<MetricsReport> {
        MetricsReport::calculate(self.ledger.all_metrics())
            .map(|r| r.with_reported(self.ledger.reported_avg_waiting()))
    }

    /// Exports the last rendered grid and the metrics panel as PNG.
    pub fn export(&mut self, exporter: &RasterExporter, path: &Path) -> Result<()> {
        exporter.export_png(&mut self.view, &self.grid, self.ledger.metrics(), path)
    }

    /// Status, cycle counter, pause flag and run parameters.
    pub fn status_lines(&self) -> Vec<String> {
        let mut lines = vec![self.ledger.phase().status().to_string(), self.ledger.cycle_text()];
        if self.paused {
            lines.push("Paused".to_string());
        }
        lines.extend(self.run.display_lines());
        lines
    }

    /// Metrics table in display order, followed by the summary line.
    pub fn metrics_table(&self) -> String {
        let metrics = self.ledger.metrics();
        let rows: Vec<Vec<String>> = metrics
            .sorted()
            .into_iter()
            .map(|m| MetricField::ALL.iter().map(|f| f.cell(m)).collect())
            .collect();
        let widths: Vec<usize> = MetricField::ALL
            .iter()
            .enumerate()
            .map(|(i, f)| {
                rows.iter()
                    .map(|r| r[i].len())
                    .chain(std::iter::once(f.header().len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |cells: Vec<&str>| {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{c:<w$}"))
                .collect::<Vec<_>>()
                .join(" | ")
        };

        let mut out = line(MetricField::ALL.iter().map(|f| f.header()).collect());
        out.push('\n');
        for row in &rows {
            out.push_str(&line(row.iter().map(String::as_str).collect()));
            out.push('\n');
        }
        out.push_str(&metrics.summary_text());
        out
    }
}
