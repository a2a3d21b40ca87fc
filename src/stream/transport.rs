//! Feed transports.
//!
//! The controller talks to the feed through [`Connector`] and
//! [`Transport`]; it never sees sockets. Two implementations ship:
//!
//! - [`WsConnector`]: the live WebSocket feed of the simulation server.
//! - [`ReplayConnector`]: replays recorded feed lines, one message per
//!   line, e.g. a capture of the simulator's standard output.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};
use url::Url;

use crate::error::{GanttError, Result};

/// One open connection to the feed.
#[async_trait]
pub trait Transport: Send {
    /// Sends one text message.
    async fn send(&mut self, text: String) -> Result<()>;

    /// Waits for the next text message. `None` once the peer has closed.
    async fn recv(&mut self) -> Option<Result<String>>;

    /// Closes the connection.
    async fn close(&mut self) -> Result<()>;
}

/// Opens connections to the feed.
#[async_trait]
pub trait Connector: Send + Sync {
    type Transport: Transport;

    async fn connect(&self) -> Result<Self::Transport>;
}

// ======================== WebSocket ========================

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connects to a WebSocket feed endpoint.
#[derive(Debug, Clone)]
pub struct WsConnector {
    url: Url,
}

impl WsConnector {
    /// Parses the endpoint, e.g. `ws://127.0.0.1:8000/ws/simulation-scheduling`.
    pub fn new(endpoint: &str) -> Result<Self> {
        let url = Url::parse(endpoint)
            .map_err(|e| GanttError::Config(format!("invalid endpoint '{endpoint}': {e}")))?;
        match url.scheme() {
            "ws" | "wss" => Ok(Self { url }),
            other => Err(GanttError::Config(format!(
                "endpoint scheme must be ws or wss, got '{other}'"
            ))),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Connector for WsConnector {
    type Transport = WsTransport;

    async fn connect(&self) -> Result<WsTransport> {
        let (stream, _response) = connect_async(self.url.as_str()).await?;
        info!(url = %self.url, "feed connected");
        Ok(WsTransport { stream })
    }
}

/// An open WebSocket connection.
pub struct WsTransport {
    stream: WsStream,
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&mut self, text: String) -> Result<()> {
        self.stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    async fn recv(&mut self) -> Option<Result<String>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text.to_string())),
                Ok(Message::Binary(bytes)) => {
                    return Some(
                        String::from_utf8(bytes.to_vec())
                            .map_err(|e| GanttError::Transport(e.to_string())),
                    )
                }
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "feed sent close");
                    return None;
                }
                Ok(_) => continue,
                Err(err) => return Some(Err(err.into())),
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}

// ======================== Replay ========================

/// Shared record of what replay connections did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayLog {
    /// Outbound messages, across all connections.
    pub sent: Vec<String>,
    /// Number of successful connects.
    pub connects: usize,
    /// Number of closes.
    pub closes: usize,
    /// Connections currently open.
    pub open: usize,
    /// Highest number of simultaneously open connections.
    pub max_open: usize,
}

/// Replays a fixed list of feed lines on every connection.
#[derive(Debug, Clone, Default)]
pub struct ReplayConnector {
    lines: Vec<String>,
    refuse: bool,
    fail_after: Option<usize>,
    log: Arc<Mutex<ReplayLog>>,
}

impl ReplayConnector {
    /// Replays `lines` in order, then reports the peer as closed.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Reads a capture file; blank lines are skipped.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(Self::new(
            content.lines().map(str::trim).filter(|l| !l.is_empty()),
        ))
    }

    /// Makes every connect attempt fail.
    pub fn refusing(mut self) -> Self {
        self.refuse = true;
        self
    }

    /// Drops the connection with an error after `n` lines.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Snapshot of the connection log.
    pub fn log(&self) -> ReplayLog {
        self.log.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[async_trait]
impl Connector for ReplayConnector {
    type Transport = ReplayTransport;

    async fn connect(&self) -> Result<ReplayTransport> {
        if self.refuse {
            return Err(GanttError::Transport("connection refused".into()));
        }
        {
            let mut log = self.log.lock();
            log.connects += 1;
            log.open += 1;
            log.max_open = log.max_open.max(log.open);
        }
        Ok(ReplayTransport {
            pending: self.lines.iter().cloned().collect(),
            delivered: 0,
            fail_after: self.fail_after,
            closed: false,
            log: Arc::clone(&self.log),
        })
    }
}

/// One replay connection.
#[derive(Debug)]
pub struct ReplayTransport {
    pending: VecDeque<String>,
    delivered: usize,
    fail_after: Option<usize>,
    closed: bool,
    log: Arc<Mutex<ReplayLog>>,
}

#[async_trait]
impl Transport for ReplayTransport {
    async fn send(&mut self, text: String) -> Result<()> {
        if self.closed {
            return Err(GanttError::NotConnected);
        }
        self.log.lock().sent.push(text);
        Ok(())
    }

    async fn recv(&mut self) -> Option<Result<String>> {
        if self.closed {
            return None;
        }
        if self.fail_after == Some(self.delivered) {
            self.fail_after = None;
            return Some(Err(GanttError::Transport("connection reset by peer".into())));
        }
        let line = self.pending.pop_front()?;
        self.delivered += 1;
        Some(Ok(line))
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            let mut log = self.log.lock();
            log.closes += 1;
            log.open = log.open.saturating_sub(1);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_connector_validates_scheme() {
        assert!(WsConnector::new("ws://127.0.0.1:8000/ws/simulation-scheduling").is_ok());
        assert!(WsConnector::new("http://127.0.0.1:8000/").is_err());
        assert!(WsConnector::new("not a url").is_err());
    }

    #[tokio::test]
    async fn test_replay_delivers_lines_then_closes() {
        let connector = ReplayConnector::new(["a", "b"]);
        let mut t = connector.connect().await.unwrap();
        t.send("cfg".into()).await.unwrap();
        assert_eq!(t.recv().await.unwrap().unwrap(), "a");
        assert_eq!(t.recv().await.unwrap().unwrap(), "b");
        assert!(t.recv().await.is_none());
        t.close().await.unwrap();

        let log = connector.log();
        assert_eq!(log.sent, vec!["cfg"]);
        assert_eq!((log.connects, log.closes, log.open), (1, 1, 0));
    }

    #[tokio::test]
    async fn test_replay_failure_modes() {
        assert!(ReplayConnector::new(["a"]).refusing().connect().await.is_err());

        let connector = ReplayConnector::new(["a", "b"]).failing_after(1);
        let mut t = connector.connect().await.unwrap();
        assert!(t.recv().await.unwrap().is_ok());
        assert!(t.recv().await.unwrap().is_err());
    }

    #[tokio::test]
    async fn test_replay_from_file_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.jsonl");
        std::fs::write(&path, "{\"event\":\"SIMULATION_END\"}\n\n  \n").unwrap();
        let connector = ReplayConnector::from_file(&path).await.unwrap();
        assert_eq!(connector.len(), 1);
    }
}
