//! Wire messages exchanged with the simulation feed.
//!
//! Inbound text is decoded exactly once, here, into [`InboundMessage`].
//! Nothing downstream inspects raw JSON.
//!
//! # Inbound shapes
//!
//! | Discriminator | Variant |
//! |---------------|---------|
//! | `event: SIMULATION_END` | `Terminal` |
//! | `event: PROCESS_METRIC` | `Metric` |
//! | `event: CONFIG` | `ConfigEcho` |
//! | `event: PROCESS_LOADED / RESOURCE_LOADED / ACTION_LOADED` | `Loaded` |
//! | `event: ERROR` | `RemoteError` |
//! | `type: metrics` | `ReportedSummary` |
//! | none (`pid`, `state`, `startCycle`, `endCycle`) | `Occupancy` |

use serde::Serialize;
use serde_json::Value;

use crate::error::{GanttError, Result};
use crate::ledger::{LoadedKind, LoadedRow};
use crate::models::{ConfigEcho, MetricRecord, OccupancyEvent, RunConfig};

/// Key of the backend's run-level waiting average.
const REPORTED_AVG_KEY: &str = "Average Waiting Time";

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Process occupancy over a cycle interval.
    Occupancy(OccupancyEvent),
    /// Per-process terminal metrics.
    Metric(MetricRecord),
    /// Run parameters echoed by the backend.
    ConfigEcho(ConfigEcho),
    /// An input row the backend loaded (synchronization runs).
    Loaded { kind: LoadedKind, row: LoadedRow },
    /// Run-level waiting average computed by the backend.
    ReportedSummary { avg_waiting: f64 },
    /// The backend failed; carries its message.
    RemoteError { message: String },
    /// End of run; nothing follows.
    Terminal,
}

impl InboundMessage {
    /// Decodes one message.
    ///
    /// Fails for invalid JSON, unknown `event` values, and occupancy
    /// records with an empty or reversed interval.
    pub fn decode(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;

        if let Some(event) = value.get("event").and_then(Value::as_str) {
            return match event {
                "SIMULATION_END" => Ok(InboundMessage::Terminal),
                "PROCESS_METRIC" => Ok(InboundMessage::Metric(serde_json::from_value(value)?)),
                "CONFIG" => Ok(InboundMessage::ConfigEcho(serde_json::from_value(value)?)),
                "PROCESS_LOADED" => Self::loaded(LoadedKind::Process, value),
                "RESOURCE_LOADED" => Self::loaded(LoadedKind::Resource, value),
                "ACTION_LOADED" => Self::loaded(LoadedKind::Action, value),
                "ERROR" => Ok(InboundMessage::RemoteError {
                    message: value
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown error")
                        .to_string(),
                }),
                other => Err(GanttError::UnknownMessage(other.to_string())),
            };
        }

        if value.get("type").and_then(Value::as_str) == Some("metrics") {
            return value
                .get(REPORTED_AVG_KEY)
                .and_then(Value::as_f64)
                .map(|avg_waiting| InboundMessage::ReportedSummary { avg_waiting })
                .ok_or_else(|| GanttError::UnknownMessage("metrics without average".into()));
        }

        Ok(InboundMessage::Occupancy(serde_json::from_value(value)?))
    }

    fn loaded(kind: LoadedKind, value: Value) -> Result<Self> {
        match value {
            Value::Object(mut row) => {
                row.remove("event");
                Ok(InboundMessage::Loaded { kind, row })
            }
            _ => Err(GanttError::UnknownMessage("loaded row is not an object".into())),
        }
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            InboundMessage::Occupancy(_) => "occupancy",
            InboundMessage::Metric(_) => "metric",
            InboundMessage::ConfigEcho(_) => "config",
            InboundMessage::Loaded { .. } => "loaded",
            InboundMessage::ReportedSummary { .. } => "summary",
            InboundMessage::RemoteError { .. } => "error",
            InboundMessage::Terminal => "end",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, InboundMessage::Terminal)
    }
}

/// Run control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlCommand {
    Pause,
    Resume,
}

/// A message sent to the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    /// The run configuration; always the first message on a connection.
    Configure(RunConfig),
    /// `{"command": "pause" | "resume"}`.
    Command { command: ControlCommand },
}

impl OutboundMessage {
    /// JSON text of the message.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessState;

    #[test]
    fn test_decode_occupancy() {
        let m = InboundMessage::decode(
            r#"{"pid":"P1","state":"ACCESSED","startCycle":1,"endCycle":3}"#,
        )
        .unwrap();
        match m {
            InboundMessage::Occupancy(e) => {
                assert_eq!(e.process_id(), "P1");
                assert_eq!(e.state(), ProcessState::Accessed);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_decode_metric_and_end() {
        let m = InboundMessage::decode(
            r#"{"event":"PROCESS_METRIC","pid":"P1","arrivalTime":0,"burstTime":3,
                "priority":1,"startTime":0,"endTime":3,"waitingTime":0}"#,
        )
        .unwrap();
        assert_eq!(m.kind(), "metric");
        assert!(InboundMessage::decode(r#"{"event":"SIMULATION_END"}"#)
            .unwrap()
            .is_terminal());
    }

    #[test]
    fn test_decode_loaded_strips_discriminator() {
        let m = InboundMessage::decode(r#"{"event":"RESOURCE_LOADED","name":"R1","counter":1}"#)
            .unwrap();
        match m {
            InboundMessage::Loaded { kind, row } => {
                assert_eq!(kind, LoadedKind::Resource);
                assert!(row.get("event").is_none());
                assert_eq!(row["name"], "R1");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_decode_config_summary_error() {
        let m = InboundMessage::decode(r#"{"event":"CONFIG","mechanism":"semaphore"}"#).unwrap();
        assert_eq!(
            m,
            InboundMessage::ConfigEcho(ConfigEcho {
                mechanism: Some("semaphore".into()),
                ..ConfigEcho::default()
            })
        );

        let m = InboundMessage::decode(r#"{"type": "metrics", "Average Waiting Time": 2.50}"#)
            .unwrap();
        assert_eq!(m, InboundMessage::ReportedSummary { avg_waiting: 2.5 });

        let m = InboundMessage::decode(r#"{"event":"ERROR","message":"boom"}"#).unwrap();
        assert_eq!(m, InboundMessage::RemoteError { message: "boom".into() });
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(InboundMessage::decode("=== Procesos Cargados (3) ===").is_err());
        assert!(InboundMessage::decode(r#"{"event":"WHATEVER"}"#).is_err());
        assert!(InboundMessage::decode(r#"{"foo":1}"#).is_err());
        assert!(InboundMessage::decode(r#"{"pid":"P1","state":"NEW","startCycle":2,"endCycle":2}"#)
            .is_err());
        assert!(InboundMessage::decode(r#"{"type":"metrics"}"#).is_err());
    }

    #[test]
    fn test_encode_outbound() {
        let cfg = OutboundMessage::Configure(RunConfig::new("RR").with_quantum("2"));
        assert_eq!(cfg.encode().unwrap(), r#"{"algorithm":"RR","quantum":"2"}"#);
        let pause = OutboundMessage::Command {
            command: ControlCommand::Pause,
        };
        assert_eq!(pause.encode().unwrap(), r#"{"command":"pause"}"#);
    }
}
