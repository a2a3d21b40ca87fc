//! Connection lifecycle and the receive loop.
//!
//! # State machine
//!
//! | From | Event | To |
//! |------|-------|----|
//! | Idle | `connect` | Connecting |
//! | Connecting | connected, config sent | Active |
//! | Connecting | connect failed | Idle |
//! | Active | `SIMULATION_END` | Finished |
//! | any | `reset` | Idle |
//!
//! A transport error while Active leaves the state alone, drops the
//! connection and raises a notification. Reset is the only way out.
//! There is no retry and no liveness timeout on the feed.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{GanttError, Result};
use crate::ledger::Phase;
use crate::metrics::MetricField;
use crate::models::RunConfig;
use crate::render::{GridView, RasterExporter, Viewport};

use super::message::{ControlCommand, InboundMessage, OutboundMessage};
use super::session::{NotificationLevel, Session};
use super::transport::{Connector, Transport};

/// Controller lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Idle,
    Connecting,
    Active,
    Finished,
}

/// User-side control actions, fed to [`StreamController::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    Connect,
    Pause,
    Resume,
    Reset,
    /// Switches the grid between arrival and numeric-suffix row order.
    ToggleSort,
    SortMetrics(MetricField),
    SetViewport(Viewport),
    Export(PathBuf),
}

/// Owns the one logical feed connection and the session it fills.
pub struct StreamController<C: Connector> {
    connector: C,
    transport: Option<C::Transport>,
    state: ControllerState,
    pending: RunConfig,
    session: Session,
    exporter: RasterExporter,
}

impl<C: Connector> StreamController<C> {
    /// Creates an idle controller that will request `run` on connect.
    pub fn new(connector: C, run: RunConfig) -> Self {
        Self {
            connector,
            transport: None,
            state: ControllerState::Idle,
            session: Session::new(run.clone(), GridView::default()),
            pending: run,
            exporter: RasterExporter::default(),
        }
    }

    pub fn with_view(mut self, view: GridView) -> Self {
        self.session.view = view;
        self
    }

    pub fn with_exporter(mut self, exporter: RasterExporter) -> Self {
        self.exporter = exporter;
        self
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Replaces the configuration sent on the next connect.
    pub fn set_run_config(&mut self, run: RunConfig) {
        if self.state == ControllerState::Idle {
            self.session.run = run.clone();
        }
        self.pending = run;
    }

    /// Opens the connection and sends the run configuration.
    ///
    /// Only valid while idle with no open connection. On failure the
    /// controller returns to idle and a notification is raised.
    pub async fn connect(&mut self) -> Result<()> {
        if self.transport.is_some() {
            return Err(GanttError::AlreadyConnected);
        }
        if self.state != ControllerState::Idle {
            return Err(GanttError::InvalidTransition {
                action: "connect",
                state: self.state,
            });
        }

        self.state = ControllerState::Connecting;
        info!(algorithm = %self.pending.algorithm, "connecting to feed");

        match self.open().await {
            Ok(transport) => {
                self.transport = Some(transport);
                self.session.run = self.pending.clone();
                self.session.ledger.set_phase(Phase::Running);
                self.state = ControllerState::Active;
                info!("feed active");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "connection failed");
                self.session
                    .notify(NotificationLevel::Error, "Connection failed", err.to_string());
                self.state = ControllerState::Idle;
                Err(err)
            }
        }
    }

    async fn open(&self) -> Result<C::Transport> {
        let mut transport = self.connector.connect().await?;
        let config = OutboundMessage::Configure(self.pending.clone()).encode()?;
        if let Err(err) = transport.send(config).await {
            let _ = transport.close().await;
            return Err(err);
        }
        Ok(transport)
    }

    /// Decodes and applies one inbound text message.
    ///
    /// Undecodable messages are dropped with a warning.
    pub async fn handle_text(&mut self, text: &str) {
        if self.state != ControllerState::Active {
            debug!(state = ?self.state, "message outside an active run ignored");
            return;
        }
        let message = match InboundMessage::decode(text) {
            Ok(message) => message,
            Err(err) => {
                warn!(error = %err, "dropping undecodable message");
                self.session.dropped += 1;
                return;
            }
        };
        debug!(kind = message.kind(), "inbound");

        let terminal = message.is_terminal();
        self.session.apply(message);
        if terminal {
            self.finish().await;
        }
    }

    /// Closes the connection after the end of the run.
    async fn finish(&mut self) {
        self.close_transport().await;
        self.state = ControllerState::Finished;
        info!(
            cycles = self.session.ledger.current_cycle(),
            processes = self.session.ledger.distinct_process_ids().len(),
            "run finished"
        );
    }

    async fn transport_failed(&mut self, err: GanttError) {
        warn!(error = %err, state = ?self.state, "feed transport failed");
        self.session
            .notify(NotificationLevel::Error, "Connection lost", err.to_string());
        self.close_transport().await;
    }

    async fn close_transport(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            if let Err(err) = transport.close().await {
                debug!(error = %err, "close after run failed");
            }
        }
    }

    async fn send_command(&mut self, command: ControlCommand) -> Result<()> {
        if self.state != ControllerState::Active {
            return Err(GanttError::InvalidTransition {
                action: if command == ControlCommand::Pause { "pause" } else { "resume" },
                state: self.state,
            });
        }
        let text = OutboundMessage::Command { command }.encode()?;
        let transport = self.transport.as_mut().ok_or(GanttError::NotConnected)?;
        if let Err(err) = transport.send(text).await {
            let message = err.to_string();
            self.transport_failed(err).await;
            return Err(GanttError::Transport(message));
        }
        self.session.paused = command == ControlCommand::Pause;
        info!(?command, "command sent");
        Ok(())
    }

    /// Closes any open connection, clears the session and returns to idle.
    pub async fn reset(&mut self) {
        self.close_transport().await;
        self.session.reset();
        self.session.run = self.pending.clone();
        self.state = ControllerState::Idle;
        info!("session reset");
    }

    /// Applies one control action.
    pub async fn apply_control(&mut self, action: ControlAction) -> Result<()> {
        match action {
            ControlAction::Connect => self.connect().await,
            ControlAction::Pause => self.send_command(ControlCommand::Pause).await,
            ControlAction::Resume => self.send_command(ControlCommand::Resume).await,
            ControlAction::Reset => {
                self.reset().await;
                Ok(())
            }
            ControlAction::ToggleSort => {
                let order = self.session.view.toggle_order();
                debug!(?order, "row order");
                self.session.rerender();
                Ok(())
            }
            ControlAction::SortMetrics(field) => {
                self.session.ledger.metrics_mut().sort_by(field);
                Ok(())
            }
            ControlAction::SetViewport(viewport) => {
                self.session.view.viewport = viewport;
                Ok(())
            }
            ControlAction::Export(path) => self.session.export(&self.exporter, &path),
        }
    }

    /// Drives the controller until the connection is gone and the
    /// control channel is closed.
    ///
    /// Inbound messages and control actions are handled one at a time.
    /// Failed actions become warnings, never errors of the loop.
    pub async fn run(&mut self, controls: &mut mpsc::Receiver<ControlAction>) -> ControllerState {
        let mut controls_open = true;
        loop {
            if self.transport.is_none() && !controls_open {
                break;
            }
            tokio::select! {
                inbound = next_inbound(&mut self.transport) => match inbound {
                    Some(Ok(text)) => self.handle_text(&text).await,
                    Some(Err(err)) => self.transport_failed(err).await,
                    None => {
                        self.transport_failed(GanttError::Transport(
                            "connection closed before end of run".into(),
                        ))
                        .await
                    }
                },
                action = controls.recv(), if controls_open => match action {
                    Some(action) => {
                        if let Err(err) = self.apply_control(action).await {
                            warn!(error = %err, "control action failed");
                            self.session
                                .notify(NotificationLevel::Warning, "Action failed", err.to_string());
                        }
                    }
                    None => controls_open = false,
                },
            }
        }
        self.state
    }
}

async fn next_inbound<T: Transport>(transport: &mut Option<T>) -> Option<Result<String>> {
    match transport {
        Some(t) => t.recv().await,
        None => std::future::pending().await,
    }
}
