//! Occupancy event model.
//!
//! An occupancy event records that a process held one state over a
//! half-open cycle interval `[start_cycle, end_cycle)`. Events are
//! produced by the simulation backend and are immutable once received.

use serde::{Deserialize, Serialize};

use crate::error::{GanttError, Result};

/// Process state carried by an occupancy event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessState {
    /// Process has arrived in the system.
    New,
    /// Process holds the execution unit.
    Accessed,
    /// Process is ready or blocked, not executing.
    Waiting,
    /// Process has completed.
    Terminated,
}

impl ProcessState {
    /// All states, in declaration order.
    pub const ALL: [ProcessState; 4] = [
        ProcessState::New,
        ProcessState::Accessed,
        ProcessState::Waiting,
        ProcessState::Terminated,
    ];

    /// Wire name (`"NEW"`, `"ACCESSED"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessState::New => "NEW",
            ProcessState::Accessed => "ACCESSED",
            ProcessState::Waiting => "WAITING",
            ProcessState::Terminated => "TERMINATED",
        }
    }
}

/// Occupancy of one process in one state over `[start_cycle, end_cycle)`.
///
/// # Invariant
/// `end_cycle > start_cycle`. Construction and deserialization both
/// reject empty or reversed intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOccupancy", rename_all = "camelCase")]
pub struct OccupancyEvent {
    process_id: String,
    state: ProcessState,
    start_cycle: u32,
    end_cycle: u32,
}

/// Wire shape before the interval check. The backend names the process
/// field `pid`; `processId` is accepted as well.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOccupancy {
    #[serde(alias = "pid")]
    process_id: String,
    state: ProcessState,
    start_cycle: u32,
    end_cycle: u32,
}

impl TryFrom<RawOccupancy> for OccupancyEvent {
    type Error = GanttError;

    fn try_from(raw: RawOccupancy) -> Result<Self> {
        OccupancyEvent::new(raw.process_id, raw.state, raw.start_cycle, raw.end_cycle)
    }
}

impl OccupancyEvent {
    /// Creates an event, rejecting `end_cycle <= start_cycle`.
    pub fn new(
        process_id: impl Into<String>,
        state: ProcessState,
        start_cycle: u32,
        end_cycle: u32,
    ) -> Result<Self> {
        let process_id = process_id.into();
        if end_cycle <= start_cycle {
            return Err(GanttError::InvalidInterval {
                process_id,
                start: start_cycle,
                end: end_cycle,
            });
        }
        Ok(Self {
            process_id,
            state,
            start_cycle,
            end_cycle,
        })
    }

    pub fn process_id(&self) -> &str {
        &self.process_id
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn start_cycle(&self) -> u32 {
        self.start_cycle
    }

    pub fn end_cycle(&self) -> u32 {
        self.end_cycle
    }

    /// Number of cycles covered.
    #[inline]
    pub fn duration(&self) -> u32 {
        self.end_cycle - self.start_cycle
    }

    /// Whether `cycle` falls inside `[start_cycle, end_cycle)`.
    #[inline]
    pub fn covers(&self, cycle: u32) -> bool {
        self.start_cycle <= cycle && cycle < self.end_cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_rejects_empty_interval() {
        assert!(OccupancyEvent::new("P1", ProcessState::New, 3, 3).is_err());
        assert!(OccupancyEvent::new("P1", ProcessState::New, 4, 3).is_err());
        assert!(OccupancyEvent::new("P1", ProcessState::New, 3, 4).is_ok());
    }

    #[test]
    fn test_event_covers_half_open() {
        let e = OccupancyEvent::new("P1", ProcessState::Accessed, 1, 3).unwrap();
        assert!(!e.covers(0));
        assert!(e.covers(1));
        assert!(e.covers(2));
        assert!(!e.covers(3));
        assert_eq!(e.duration(), 2);
    }

    #[test]
    fn test_event_deserialize_pid_alias() {
        let e: OccupancyEvent = serde_json::from_str(
            r#"{"pid":"P7","state":"WAITING","startCycle":2,"endCycle":5}"#,
        )
        .unwrap();
        assert_eq!(e.process_id(), "P7");
        assert_eq!(e.state(), ProcessState::Waiting);
        assert_eq!((e.start_cycle(), e.end_cycle()), (2, 5));

        let e: OccupancyEvent = serde_json::from_str(
            r#"{"processId":"P8","state":"NEW","startCycle":0,"endCycle":1}"#,
        )
        .unwrap();
        assert_eq!(e.process_id(), "P8");
    }

    #[test]
    fn test_event_deserialize_rejects_reversed_interval() {
        let r: std::result::Result<OccupancyEvent, _> = serde_json::from_str(
            r#"{"pid":"P1","state":"NEW","startCycle":5,"endCycle":2}"#,
        );
        assert!(r.is_err());
    }

    #[test]
    fn test_event_deserialize_rejects_unknown_state() {
        let r: std::result::Result<OccupancyEvent, _> = serde_json::from_str(
            r#"{"pid":"P1","state":"RUNNING","startCycle":0,"endCycle":1}"#,
        );
        assert!(r.is_err());
    }
}
