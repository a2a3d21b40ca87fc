//! Per-cell state resolution.
//!
//! Several occupancy events may overlap the same (process, cycle) cell,
//! e.g. a process that is newly arrived and already waiting. The resolver
//! reduces the overlapping states to exactly one display outcome.
//!
//! # Precedence
//!
//! | # | States present | Label | Intensity |
//! |---|----------------|-------|-----------|
//! | 1 | TERMINATED | `TD-<pid>` | Full |
//! | 2 | ACCESSED + NEW | `NW-<pid>` | Full |
//! | 3 | WAITING + NEW | `NW-<pid>` | Waiting |
//! | 4 | ACCESSED | `<pid>` | Full |
//! | 5 | WAITING | (blank) | Waiting |
//! | 6 | NEW | `NW-<pid>` | Transparent |
//! | 7 | none | empty cell | - |
//!
//! The first matching row wins.

use crate::models::{ColorBase, Hsla, OccupancyEvent, ProcessState};

/// Opacity of a fully painted cell.
pub const FULL_ALPHA: f64 = 1.0;
/// Opacity of a waiting cell.
pub const WAITING_ALPHA: f64 = 0.3;

/// Fill intensity of a resolved cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intensity {
    /// Painted at full opacity.
    Full,
    /// Painted at low opacity.
    Waiting,
    /// Not painted; only the label is shown.
    Transparent,
}

impl Intensity {
    /// Opacity to paint with, `None` for no paint.
    pub fn alpha(&self) -> Option<f64> {
        match self {
            Intensity::Full => Some(FULL_ALPHA),
            Intensity::Waiting => Some(WAITING_ALPHA),
            Intensity::Transparent => None,
        }
    }

    /// Applies this intensity to a color base.
    pub fn paint(&self, base: ColorBase) -> Option<Hsla> {
        self.alpha().map(|a| base.with_alpha(a))
    }
}

/// Display outcome of a non-empty cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCell {
    pub label: String,
    pub intensity: Intensity,
}

/// The set of states present in one cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateSet {
    pub has_new: bool,
    pub has_accessed: bool,
    pub has_waiting: bool,
    pub has_terminated: bool,
}

impl StateSet {
    /// Collects the states of `events` that belong to `process_id` and cover `cycle`.
    pub fn at<'a, I>(process_id: &str, cycle: u32, events: I) -> Self
    where
        I: IntoIterator<Item = &'a OccupancyEvent>,
    {
        events
            .into_iter()
            .filter(|e| e.process_id() == process_id && e.covers(cycle))
            .fold(Self::default(), |set, e| set.with(e.state()))
    }

    /// Adds a state.
    pub fn with(mut self, state: ProcessState) -> Self {
        match state {
            ProcessState::New => self.has_new = true,
            ProcessState::Accessed => self.has_accessed = true,
            ProcessState::Waiting => self.has_waiting = true,
            ProcessState::Terminated => self.has_terminated = true,
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        !(self.has_new || self.has_accessed || self.has_waiting || self.has_terminated)
    }

    /// Applies the precedence table.
    pub fn resolve(&self, process_id: &str) -> Option<ResolvedCell> {
        let (label, intensity) = if self.has_terminated {
            (format!("TD-{process_id}"), Intensity::Full)
        } else if self.has_accessed && self.has_new {
            (format!("NW-{process_id}"), Intensity::Full)
        } else if self.has_waiting && self.has_new {
            (format!("NW-{process_id}"), Intensity::Waiting)
        } else if self.has_accessed {
            (process_id.to_string(), Intensity::Full)
        } else if self.has_waiting {
            (String::new(), Intensity::Waiting)
        } else if self.has_new {
            (format!("NW-{process_id}"), Intensity::Transparent)
        } else {
            return None;
        };
        Some(ResolvedCell { label, intensity })
    }
}

/// Resolves the display outcome of one (process, cycle) cell.
///
/// Returns `None` when no event of `process_id` covers `cycle`.
pub fn resolve<'a, I>(process_id: &str, cycle: u32, events: I) -> Option<ResolvedCell>
where
    I: IntoIterator<Item = &'a OccupancyEvent>,
{
    StateSet::at(process_id, cycle, events).resolve(process_id)
}
