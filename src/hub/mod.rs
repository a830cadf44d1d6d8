//! Hub session: room discovery and command dispatch.
//!
//! The hub session owns the hub connection for its whole lifetime and the
//! cached [`RoomDirectory`]. It is the outer loop of the client; joining a
//! room hands the terminal to a [`RoomSession`] and resumes here once that
//! session has returned.
//!
//! # Event loop
//!
//! ```text
//!             ┌───────────── awaiting list ─────────────┐
//!             │ read hub only                           │
//!  get_list ─►│  room_list → replace cache, render ─────┼──► accepting commands
//!             │  admin_broadcast → render               │    (hub ∥ stdin)
//!             └─────────────────────▲───────────────────┘         │
//!                                   │  /list, /refresh, /join     │
//!                                   └─────────────────────────────┘
//! ```
//!
//! While accepting commands, hub messages and user input are awaited
//! concurrently, so broadcasts render without disturbing the prompt. While
//! a room is active the hub connection stays open but is not read.

// Rust guideline compliant 2026-02

pub mod commands;

pub use commands::Command;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::console::Console;
use crate::constants::HUB_PROMPT;
use crate::directory::RoomDirectory;
use crate::input::LineInput;
use crate::protocol::{HubMessage, HubRequest};
use crate::render;
use crate::room::{RoomSession, SessionOutcome};
use crate::ws::{self, WsMessage, WsReader, WsWriter};

/// What the loop does after a command has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Keep accepting commands.
    Continue,
    /// A `get_list` is in flight; wait for the list before the next command.
    AwaitList,
    /// End the session.
    Quit,
}

/// Session with the hub.
#[derive(Debug)]
pub struct HubSession {
    config: Config,
    console: Arc<dyn Console>,
    input: LineInput,
    directory: RoomDirectory,
}

impl HubSession {
    /// Create a session; nothing connects until [`Self::run`].
    pub fn new(config: Config, console: Arc<dyn Console>, input: LineInput) -> Self {
        Self {
            config,
            console,
            input,
            directory: RoomDirectory::default(),
        }
    }

    /// The most recently received room directory.
    #[must_use]
    pub fn directory(&self) -> &RoomDirectory {
        &self.directory
    }

    /// Connect to the hub and run until `/quit`, end of input, or loss of
    /// the hub connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the hub cannot be reached or the connection is
    /// lost mid-session. The failure has already been rendered.
    pub async fn run(&mut self) -> Result<()> {
        let url = self.config.hub_ws_url();
        let (mut writer, mut reader) = match ws::connect(&url, self.config.connect_timeout)
            .await
            .with_context(|| format!("failed to connect to hub at {url}"))
        {
            Ok(pair) => pair,
            Err(e) => {
                self.console.line(&render::hub_connect_failed(&e));
                return Err(e);
            }
        };
        log::info!("[Hub] Connected to {url}");

        self.console.line(render::HUB_CONNECTED);
        self.console.line(render::HUB_COMMANDS);

        let result = self.event_loop(&mut writer, &mut reader).await;

        if let Err(e) = writer.close().await {
            log::debug!("[Hub] Close on exit: {e:#}");
        }
        result
    }

    async fn event_loop(&mut self, writer: &mut WsWriter, reader: &mut WsReader) -> Result<()> {
        self.request_list(writer).await?;
        let mut awaiting_list = true;

        loop {
            if awaiting_list {
                let msg = recv_hub_message(reader).await;
                if self.handle_hub_message(msg)? {
                    awaiting_list = false;
                }
                continue;
            }

            self.console.prompt(HUB_PROMPT);
            tokio::select! {
                msg = recv_hub_message(reader) => {
                    self.handle_hub_message(msg)?;
                }
                line = self.input.next_line() => {
                    let Some(line) = line else {
                        log::info!("[Hub] End of input");
                        self.console.line(render::GOODBYE);
                        return Ok(());
                    };
                    let Some(command) = Command::parse(&line) else {
                        continue;
                    };
                    match self.dispatch(command, writer).await? {
                        Flow::Continue => {}
                        Flow::AwaitList => awaiting_list = true,
                        Flow::Quit => return Ok(()),
                    }
                }
            }
        }
    }

    /// Apply one hub message. Returns whether it was a room list.
    ///
    /// A receive error means the hub connection is gone; it is rendered
    /// and propagated.
    fn handle_hub_message(&mut self, msg: Result<HubMessage>) -> Result<bool> {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                log::warn!("[Hub] Connection lost: {e:#}");
                self.console.line(&render::hub_disconnected(&format!("{e:#}")));
                return Err(e);
            }
        };

        match msg {
            HubMessage::RoomList { directory } => {
                log::debug!("[Hub] Room list with {} rooms", directory.len());
                self.directory = directory;
                for line in render::room_list(&self.directory) {
                    self.console.line(&line);
                }
                Ok(true)
            }
            HubMessage::AdminBroadcast { text } => {
                self.console.line(&render::admin_broadcast(&text));
                Ok(false)
            }
            HubMessage::Unknown => Ok(false),
        }
    }

    async fn dispatch(&mut self, command: Command, writer: &mut WsWriter) -> Result<Flow> {
        log::debug!("[Hub] Dispatching {command:?}");
        match command {
            Command::List => {
                self.request_list(writer).await?;
                Ok(Flow::AwaitList)
            }
            Command::Help => {
                for line in render::help() {
                    self.console.line(&line);
                }
                Ok(Flow::Continue)
            }
            Command::Ping => {
                // Cosmetic: the reply is an ordinary room list, nothing is timed.
                self.request_list(writer).await?;
                self.console.line(render::PONG);
                Ok(Flow::Continue)
            }
            Command::Info { room } => {
                match self.directory.address(&room) {
                    Some(address) => {
                        for line in render::room_info(&room, address) {
                            self.console.line(&line);
                        }
                    }
                    None => self.console.line(&render::room_not_found(&room)),
                }
                Ok(Flow::Continue)
            }
            Command::Join { room } => {
                let address = self.directory.address(&room).filter(|addr| !addr.is_empty());
                let Some(address) = address.map(str::to_string) else {
                    self.console.line(&render::join_not_found(&room));
                    return Ok(Flow::Continue);
                };
                self.console.line(&render::connecting(&room));
                self.join(&address).await;
                self.console.line(render::RETURNED_TO_HUB);
                self.request_list(writer).await?;
                Ok(Flow::AwaitList)
            }
            Command::Quit => {
                self.console.line(render::GOODBYE);
                Ok(Flow::Quit)
            }
            Command::Invalid { raw } => {
                self.console.line(&render::unknown_command(&raw));
                Ok(Flow::Continue)
            }
        }
    }

    /// Run one room session to completion. Never fails: join errors are
    /// rendered here and the hub resumes either way.
    async fn join(&mut self, address: &str) {
        let session = RoomSession::new(
            address,
            Arc::clone(&self.console),
            &mut self.input,
            self.config.connect_timeout,
        );

        match session.run().await {
            Ok(SessionOutcome::LeftVoluntarily) => {
                log::info!("[Hub] Left room at {address}");
            }
            Ok(SessionOutcome::Disconnected { cause }) => {
                log::warn!("[Hub] Room at {address} disconnected: {cause}");
            }
            Err(e) => {
                log::warn!("[Hub] Failed to join room at {address}: {e:#}");
                self.console.line(&render::join_failed(&e));
            }
        }
    }

    /// Send `get_list`. A send failure means the hub is gone.
    async fn request_list(&self, writer: &mut WsWriter) -> Result<()> {
        if let Err(e) = writer.send_text(&HubRequest::GetList.encode()).await {
            log::warn!("[Hub] Failed to send get_list: {e:#}");
            self.console.line(&render::hub_disconnected(&format!("{e:#}")));
            return Err(e);
        }
        log::trace!("[Hub] Sent get_list");
        Ok(())
    }
}

/// Receive the next hub message, skipping non-text frames.
///
/// Cancel-safe. Errors when the hub closes the connection or the read
/// fails.
async fn recv_hub_message(reader: &mut WsReader) -> Result<HubMessage> {
    loop {
        match reader.recv().await {
            Some(Ok(WsMessage::Text(text))) => return Ok(HubMessage::decode(&text)),
            Some(Ok(WsMessage::Close { code, reason })) => {
                anyhow::bail!("hub closed the connection (code {code}{})", close_reason(&reason));
            }
            Some(Ok(other)) => log::trace!("[Hub] Ignoring frame {other:?}"),
            Some(Err(e)) => return Err(e),
            None => anyhow::bail!("hub closed the connection"),
        }
    }
}

fn close_reason(reason: &str) -> String {
    if reason.is_empty() {
        String::new()
    } else {
        format!(": {reason}")
    }
}
