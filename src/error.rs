//! Error types for the visualization engine.

use thiserror::Error;

use crate::stream::ControllerState;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GanttError>;

/// Errors raised by the ledger, the stream controller and the exporters.
#[derive(Debug, Error)]
pub enum GanttError {
    /// An occupancy interval that is empty or reversed.
    #[error("invalid cycle interval [{start}, {end}) for process '{process_id}'")]
    InvalidInterval {
        process_id: String,
        start: u32,
        end: u32,
    },

    /// An inbound message that is not valid JSON or does not match any known shape.
    #[error("undecodable message: {0}")]
    Decode(#[from] serde_json::Error),

    /// An inbound message carrying an `event` discriminator we do not know.
    #[error("unknown message kind '{0}'")]
    UnknownMessage(String),

    /// Connection refused, dropped mid-stream, or a failed send.
    #[error("transport error: {0}")]
    Transport(String),

    /// A command that needs a live connection was issued without one.
    #[error("no live connection")]
    NotConnected,

    /// A second connection was requested while one is still open.
    #[error("a connection is already open; reset first")]
    AlreadyConnected,

    /// A control action that is not valid in the current controller state.
    #[error("cannot {action} while {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: ControllerState,
    },

    /// Raster export failed.
    #[error("export failed: {0}")]
    Export(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<image::ImageError> for GanttError {
    fn from(err: image::ImageError) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<serde_yaml::Error> for GanttError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for GanttError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
