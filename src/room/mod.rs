//! Room session: one room membership from connect to leave/disconnect.
//!
//! # Architecture
//!
//! ```text
//!   RoomSession::run
//!         │
//!         │ connect, read welcome, send display name
//!         ▼
//!   ┌──────────────────────────┐   shutdown (oneshot)   ┌────────────────────┐
//!   │ outbound loop (caller)   │ ─────────────────────► │ inbound relay task │
//!   │ LineInput → WsWriter     │                        │ WsReader → Console │
//!   │ `/leave` handled locally │ ◄───── JoinHandle ──── │ ends on close/err  │
//!   └──────────────────────────┘                        └────────────────────┘
//! ```
//!
//! The outbound loop races the next input line against the relay's
//! `JoinHandle`. Whichever side finishes first decides the
//! [`SessionOutcome`]. When the outbound side decides, it first closes the
//! relay's render gate, then signals the relay and awaits its handle, so no
//! inbound line is rendered after the decision. Dropping the session
//! mid-chat closes the gate and aborts the relay.

// Rust guideline compliant 2026-02

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::console::Console;
use crate::constants::{LEAVE_COMMAND, NAME_PROMPT, ROOM_PROMPT};
use crate::input::LineInput;
use crate::render;
use crate::ws::{self, WsReader, WsWriter};

/// How a room session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The user typed `/leave` (or input ended).
    LeftVoluntarily,
    /// The room connection dropped.
    Disconnected {
        /// Human-readable reason.
        cause: String,
    },
}

/// A single room membership.
///
/// Borrows the shared [`LineInput`] for its lifetime, so hub-mode input
/// cannot be consumed while the room is active.
#[derive(Debug)]
pub struct RoomSession<'a> {
    address: String,
    console: Arc<dyn Console>,
    input: &'a mut LineInput,
    connect_timeout: Duration,
}

/// Why the outbound loop stopped.
enum Exit {
    Leave,
    SendFailed(String),
    RelayEnded(String),
}

impl<'a> RoomSession<'a> {
    /// Prepare a session for the room at `address`.
    pub fn new(
        address: impl Into<String>,
        console: Arc<dyn Console>,
        input: &'a mut LineInput,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            address: address.into(),
            console,
            input,
            connect_timeout,
        }
    }

    /// Join the room and chat until the user leaves or the connection drops.
    ///
    /// # Errors
    ///
    /// Returns an error if connecting, reading the welcome, reading the
    /// display name or sending it fails. Nothing has been rendered about the
    /// failure yet; the caller reports it.
    pub async fn run(mut self) -> Result<SessionOutcome> {
        let (writer, reader) = self.enter().await?;
        Ok(self.chat(writer, reader).await)
    }

    /// Connect, show the welcome banner and register the display name.
    async fn enter(&mut self) -> Result<(WsWriter, WsReader)> {
        let (mut writer, mut reader) = ws::connect(&self.address, self.connect_timeout).await?;
        log::info!("[Room] Connected to {}", self.address);

        let welcome = reader
            .recv_text()
            .await
            .context("failed to read room welcome")?
            .context("room closed the connection before its welcome")?;
        self.console.line(&render::welcome(&welcome));

        self.console.prompt(NAME_PROMPT);
        let name = self
            .input
            .next_line()
            .await
            .context("input closed before a display name was entered")?;

        writer
            .send_text(&name)
            .await
            .context("failed to send display name")?;

        for line in render::joined(&name) {
            self.console.line(&line);
        }
        Ok((writer, reader))
    }

    /// Steady state: relay inbound lines while forwarding typed ones.
    async fn chat(mut self, mut writer: WsWriter, reader: WsReader) -> SessionOutcome {
        let mut relay = Relay::spawn(reader, Arc::clone(&self.console));

        let exit = loop {
            self.console.prompt(ROOM_PROMPT);
            tokio::select! {
                ended = &mut relay.task => {
                    let cause = match ended {
                        Ok(Some(cause)) => cause,
                        Ok(None) => "inbound relay stopped".to_string(),
                        Err(e) => format!("inbound relay failed: {e}"),
                    };
                    break Exit::RelayEnded(cause);
                }
                line = self.input.next_line() => {
                    let Some(line) = line else {
                        log::info!("[Room] End of input, leaving room");
                        break Exit::Leave;
                    };
                    if line.trim() == LEAVE_COMMAND {
                        break Exit::Leave;
                    }
                    if let Err(e) = writer.send_text(&line).await {
                        break Exit::SendFailed(format!("{e:#}"));
                    }
                }
            }
        };

        let outcome = match exit {
            Exit::Leave => {
                relay.silence();
                self.console.line(render::LEAVING_ROOM);
                relay.stop().await;
                SessionOutcome::LeftVoluntarily
            }
            Exit::SendFailed(cause) => {
                relay.silence();
                self.console.line(render::CONNECTION_LOST);
                relay.stop().await;
                SessionOutcome::Disconnected { cause }
            }
            // The relay has already rendered the disconnect notice.
            Exit::RelayEnded(cause) => SessionOutcome::Disconnected { cause },
        };

        if let Err(e) = writer.close().await {
            log::debug!("[Room] Close after exit: {e:#}");
        }
        log::info!("[Room] Session for {} ended: {:?}", self.address, outcome);
        outcome
    }
}

/// Switch between the relay and the console.
///
/// The relay writes only while holding the lock with the gate open, so
/// once [`RenderGate::close`] returns no inbound line can reach the
/// console, whichever thread the relay runs on.
#[derive(Debug, Clone)]
struct RenderGate {
    open: Arc<Mutex<bool>>,
}

impl RenderGate {
    fn new() -> Self {
        Self {
            open: Arc::new(Mutex::new(true)),
        }
    }

    /// Run `render` if the gate is still open. Returns whether it ran.
    fn render(&self, render: impl FnOnce()) -> bool {
        let open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        if *open {
            render();
        }
        *open
    }

    fn close(&self) {
        *self.open.lock().unwrap_or_else(PoisonError::into_inner) = false;
    }
}

/// Handle to the inbound relay task.
///
/// Dropping it (for example when the session future is cancelled) closes
/// the gate and aborts the task.
#[derive(Debug)]
struct Relay {
    gate: RenderGate,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<Option<String>>,
}

impl Relay {
    fn spawn(reader: WsReader, console: Arc<dyn Console>) -> Self {
        let gate = RenderGate::new();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(relay_inbound(reader, console, gate.clone(), shutdown_rx));
        Self {
            gate,
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }

    /// Stop rendering inbound lines immediately.
    fn silence(&self) {
        self.gate.close();
    }

    /// Signal the relay to stop and wait until it has.
    async fn stop(mut self) {
        self.gate.close();
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            // Err means the relay already finished on its own.
            let _ = shutdown_tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            log::warn!("[Room] Inbound relay task failed: {e}");
        }
    }
}

impl Drop for Relay {
    fn drop(&mut self) {
        self.gate.close();
        self.task.abort();
    }
}

/// Render every inbound line until shutdown or the stream ends.
///
/// Returns `None` when stopped through `shutdown_rx` or the closed gate,
/// otherwise the reason the stream ended (after rendering the disconnect
/// notice).
async fn relay_inbound(
    mut reader: WsReader,
    console: Arc<dyn Console>,
    gate: RenderGate,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> Option<String> {
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown_rx => {
                log::debug!("[Room] Inbound relay stopped");
                return None;
            }
            msg = reader.recv_text() => {
                let cause = match msg {
                    Ok(Some(line)) => {
                        if gate.render(|| console.line(&render::room_line(&line))) {
                            continue;
                        }
                        log::debug!("[Room] Inbound relay silenced");
                        return None;
                    }
                    Ok(None) => "room closed the connection".to_string(),
                    Err(e) => format!("{e:#}"),
                };
                log::info!("[Room] Inbound stream ended: {cause}");
                if !gate.render(|| console.line(render::ROOM_DISCONNECTED)) {
                    return None;
                }
                return Some(cause);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_gate_blocks_after_close() {
        let gate = RenderGate::new();
        let mut rendered = 0;

        assert!(gate.render(|| rendered += 1));
        gate.clone().close();
        assert!(!gate.render(|| rendered += 1));
        assert_eq!(rendered, 1);
    }
}
