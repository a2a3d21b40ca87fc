//! Engine configuration.
//!
//! Read from an optional YAML file; every field has a default, so a
//! partial file is fine. The CLI applies its flags on top.
//!
//! ```yaml
//! endpoint: ws://127.0.0.1:8000/ws/simulation-scheduling
//! run:
//!   algorithm: RR
//!   quantum: "2"
//! viewport_columns: 30
//! export_path: gantt.png
//! log_level: info
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::models::RunConfig;
use crate::render::{GridView, RowOrder, Viewport};

/// Feed endpoint of a scheduling run.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8000/ws/simulation-scheduling";
/// Feed endpoint of a synchronization run.
pub const SYNCHRONIZATION_ENDPOINT: &str = "ws://127.0.0.1:8000/ws/simulation-synchronization";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// WebSocket URL of the simulation feed.
    pub endpoint: String,
    /// Run configuration sent on connect.
    pub run: RunConfig,
    /// Visible grid columns; `None` shows every cycle.
    pub viewport_columns: Option<usize>,
    /// Sort grid rows by numeric id suffix instead of arrival.
    pub numeric_rows: bool,
    /// Where to write the PNG capture at the end of a run.
    pub export_path: Option<PathBuf>,
    /// Default tracing filter; `RUST_LOG` wins when set.
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            run: RunConfig::default(),
            viewport_columns: None,
            numeric_rows: false,
            export_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Loads `path`, falling back to defaults when it is absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            warn!("config file not found, using defaults: {}", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        let config = Self::from_yaml(&raw)?;
        info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Initial grid view.
    pub fn view(&self) -> GridView {
        let order = if self.numeric_rows {
            RowOrder::NumericSuffix
        } else {
            RowOrder::Arrival
        };
        let viewport = self
            .viewport_columns
            .map(Viewport::columns)
            .unwrap_or_else(Viewport::full);
        GridView::new(order, viewport)
    }
}
