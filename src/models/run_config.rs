//! Run configuration sent to the simulation backend.
//!
//! The configuration is collected elsewhere and handed to the stream
//! controller before the connection opens. It is sent verbatim as the
//! first outbound message and also drives the run-parameter display.

use serde::{Deserialize, Deserializer, Serialize};

/// Algorithm name the backend uses for Round Robin.
pub const ROUND_ROBIN: &str = "RR";
/// Algorithm name the backend uses for Priority Scheduling.
pub const PRIORITY: &str = "PS";

/// Simulation run configuration.
///
/// Scheduling runs set `algorithm` (plus `quantum` for RR and
/// `is_preemptive` for PS); synchronization runs set `mechanism`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    pub algorithm: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub quantum: Option<String>,
    /// `"0"` or `"1"`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub is_preemptive: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mechanism: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new("FIFO")
    }
}

impl RunConfig {
    /// Creates a scheduling configuration for the given algorithm.
    pub fn new(algorithm: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            quantum: None,
            is_preemptive: None,
            mechanism: None,
        }
    }

    /// Sets the Round Robin quantum.
    pub fn with_quantum(mut self, quantum: impl Into<String>) -> Self {
        self.quantum = Some(quantum.into());
        self
    }

    /// Sets the preemption flag.
    pub fn with_preemptive(mut self, preemptive: bool) -> Self {
        self.is_preemptive = Some(if preemptive { "1" } else { "0" }.to_string());
        self
    }

    /// Sets the synchronization mechanism (`"mutex"`, `"semaphore"`).
    pub fn with_mechanism(mut self, mechanism: impl Into<String>) -> Self {
        self.mechanism = Some(mechanism.into());
        self
    }

    /// Whether the preemption flag is set to `"1"`.
    pub fn preemptive(&self) -> bool {
        self.is_preemptive.as_deref() == Some("1")
    }

    /// Applies the fields present in a backend configuration echo.
    pub fn merge_echo(&mut self, echo: &ConfigEcho) {
        if let Some(algorithm) = &echo.algorithm {
            self.algorithm = algorithm.clone();
        }
        if echo.quantum.is_some() {
            self.quantum = echo.quantum.clone();
        }
        if echo.is_preemptive.is_some() {
            self.is_preemptive = echo.is_preemptive.clone();
        }
        if echo.mechanism.is_some() {
            self.mechanism = echo.mechanism.clone();
        }
    }

    /// Run parameters as display lines.
    ///
    /// The quantum is only shown for RR and the preemption flag only for PS.
    pub fn display_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Algorithm: {}", self.algorithm)];
        if self.algorithm == ROUND_ROBIN {
            if let Some(q) = &self.quantum {
                lines.push(format!("Quantum: {q}"));
            }
        }
        if self.algorithm == PRIORITY {
            let label = if self.preemptive() { "yes" } else { "no" };
            lines.push(format!("Preemptive: {label}"));
        }
        if let Some(m) = &self.mechanism {
            lines.push(format!("Mechanism: {m}"));
        }
        lines
    }
}

/// Configuration echoed back by the backend, e.g. `{"event":"CONFIG","mechanism":"mutex"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEcho {
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub quantum: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub is_preemptive: Option<String>,
    #[serde(default)]
    pub mechanism: Option<String>,
}

/// Accepts `"2"`, `2` or `null`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_is_fifo() {
        let c = RunConfig::default();
        assert_eq!(c.algorithm, "FIFO");
        assert_eq!(serde_json::to_string(&c).unwrap(), r#"{"algorithm":"FIFO"}"#);
    }

    #[test]
    fn test_config_wire_shape() {
        let c = RunConfig::new("PS").with_preemptive(true);
        let v: serde_json::Value = serde_json::to_value(&c).unwrap();
        assert_eq!(v["algorithm"], "PS");
        assert_eq!(v["isPreemptive"], "1");
        assert!(v.get("quantum").is_none());
    }

    #[test]
    fn test_config_numeric_fields_accepted() {
        let c: RunConfig =
            serde_json::from_str(r#"{"algorithm":"RR","quantum":3,"isPreemptive":1}"#).unwrap();
        assert_eq!(c.quantum.as_deref(), Some("3"));
        assert!(c.preemptive());
    }

    #[test]
    fn test_display_lines_rules() {
        let rr = RunConfig::new("RR").with_quantum("2");
        assert_eq!(rr.display_lines(), vec!["Algorithm: RR", "Quantum: 2"]);

        // quantum is ignored for non-RR algorithms
        let fifo = RunConfig::new("FIFO").with_quantum("2");
        assert_eq!(fifo.display_lines(), vec!["Algorithm: FIFO"]);

        let ps = RunConfig::new("PS");
        assert_eq!(ps.display_lines(), vec!["Algorithm: PS", "Preemptive: no"]);
    }

    #[test]
    fn test_merge_echo() {
        let mut c = RunConfig::default();
        let echo: ConfigEcho = serde_json::from_str(r#"{"event":"CONFIG","mechanism":"mutex"}"#).unwrap();
        c.merge_echo(&echo);
        assert_eq!(c.algorithm, "FIFO");
        assert_eq!(c.mechanism.as_deref(), Some("mutex"));
        assert!(c.display_lines().contains(&"Mechanism: mutex".to_string()));
    }
}
