//! Feed connection, message decoding and the per-run session.
//!
//! # Data flow
//!
//! ```text
//! Transport ──text──▶ InboundMessage::decode ──▶ Session::apply
//!                                                  ├─ EventLedger
//!                                                  ├─ ColorAllocator
//!                                                  └─ render ──▶ GanttGrid
//! ```
//!
//! [`StreamController`] owns the transport and the [`Session`]; all
//! mutation happens inside its receive loop, one message or control
//! action at a time.

mod controller;
mod message;
mod session;
mod transport;

pub use controller::{ControlAction, ControllerState, StreamController};
pub use message::{ControlCommand, InboundMessage, OutboundMessage};
pub use session::{Notification, NotificationLevel, Session};
pub use transport::{
    Connector, ReplayConnector, ReplayLog, ReplayTransport, Transport, WsConnector, WsTransport,
};
