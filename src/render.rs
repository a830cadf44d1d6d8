//! User-facing text.
//!
//! Every line the sessions show is built here as a plain `String`, so the
//! wording lives in one place and tests can match on it. Writing the text
//! out is the [`Console`](crate::console::Console)'s job.

use chrono::{DateTime, Local, TimeZone};

use crate::directory::{RoomDirectory, Transport};
use crate::protocol::LineKind;

/// Banner shown once the hub connection is up.
pub const HUB_CONNECTED: &str = "🌈 Connected to Chroma-Core hub";

/// One-line command summary shown under the hub banner.
pub const HUB_COMMANDS: &str =
    "Enhanced Commands: /list, /join <name>, /info <name>, /refresh, /ping, /help, /quit";

/// Acknowledgment of `/ping`.
pub const PONG: &str = "🏓 Pong! (hub responsive)";

/// Shown after a room session ends and control is back in the hub.
pub const RETURNED_TO_HUB: &str = "🔙 Returned to hub";

/// Shown on `/quit`, end of input and Ctrl-C.
pub const GOODBYE: &str = "👋 Goodbye!";

/// Shown when the user types `/leave`.
pub const LEAVING_ROOM: &str = "🚪 Leaving room...";

/// Shown when the room's inbound stream ends.
pub const ROOM_DISCONNECTED: &str = "❌ Disconnected from room";

/// Shown when a send to the room fails.
pub const CONNECTION_LOST: &str = "❌ Connection lost";

/// Static `/help` text.
#[must_use]
pub fn help() -> Vec<String> {
    [
        "Available commands:",
        "  /list     - Refresh room list",
        "  /join <name> - Join a room",
        "  /info <name> - Show room info",
        "  /refresh  - Refresh room list",
        "  /ping     - Test hub connection",
        "  /quit     - Exit client",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

/// Numbered room list (1-based), with a placeholder when empty.
#[must_use]
pub fn room_list(directory: &RoomDirectory) -> Vec<String> {
    let mut lines = vec![format!("📡 Available rooms ({}):", directory.len())];
    if directory.is_empty() {
        lines.push("  (No rooms available)".to_string());
    } else {
        lines.extend(
            directory
                .iter()
                .enumerate()
                .map(|(i, (name, addr))| format!("  {}. 🏠 {name} -> {addr}", i + 1)),
        );
    }
    lines
}

/// `/info` output for a known room.
#[must_use]
pub fn room_info(name: &str, address: &str) -> Vec<String> {
    vec![
        "📋 Room Info:".to_string(),
        format!("   Name: {name}"),
        format!("   Address: {address}"),
        format!("   Protocol: {}", Transport::of(address)),
    ]
}

/// `/info` on a name missing from the directory.
#[must_use]
pub fn room_not_found(name: &str) -> String {
    format!("❌ Room '{name}' not found")
}

/// `/join` on a name missing from the directory.
#[must_use]
pub fn join_not_found(name: &str) -> String {
    format!("❌ Room '{name}' not found. Use /list to see available rooms.")
}

/// Unrecognized hub-mode input.
#[must_use]
pub fn unknown_command(raw: &str) -> String {
    format!("❌ Unknown command: {raw}. Type /help for available commands.")
}

/// Operator announcement from the hub.
#[must_use]
pub fn admin_broadcast(text: &str) -> String {
    format!("📢 ADMIN: {text}")
}

/// Before handing over to the room session.
#[must_use]
pub fn connecting(name: &str) -> String {
    format!("🚀 Connecting to {name}...")
}

/// The hub could not be reached at startup.
#[must_use]
pub fn hub_connect_failed(cause: &anyhow::Error) -> String {
    format!("❌ {cause:#}")
}

/// The hub connection went away.
#[must_use]
pub fn hub_disconnected(cause: &str) -> String {
    format!("❌ Disconnected from hub: {cause}")
}

/// Welcome banner received from a room.
#[must_use]
pub fn welcome(banner: &str) -> String {
    format!("📨 {banner}")
}

/// Shown once the display name has been sent.
#[must_use]
pub fn joined(name: &str) -> Vec<String> {
    vec![
        format!("🎉 Joined room! You are now '{name}'."),
        "💬 Room commands: /help, /who, /time, /uptime, /motd, /nick <name>".to_string(),
        "🚪 Type /leave to exit the room.".to_string(),
    ]
}

/// Any failure between connecting to a room and entering the chat.
#[must_use]
pub fn join_failed(cause: &anyhow::Error) -> String {
    format!("❌ Failed to join room: {cause:#}")
}

/// Inbound room line, stamped with the local time it is rendered at.
#[must_use]
pub fn room_line(line: &str) -> String {
    room_line_at(line, &Local::now())
}

/// [`room_line`] with an explicit timestamp.
#[must_use]
pub fn room_line_at<Tz: TimeZone>(line: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let stamp = at.format("%H:%M");
    match LineKind::classify(line) {
        LineKind::SystemNotice => format!("[{stamp}] 🔔 {line}"),
        LineKind::TaggedChat => format!("[{stamp}] {line}"),
        LineKind::Info => format!("[{stamp}] ℹ️  {line}"),
    }
}
