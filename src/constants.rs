//! Application-wide constants for chroma-deck.
//!
//! Centralizes environment variable names, defaults, wire markers and
//! prompts so the session modules carry no magic strings.

use std::time::Duration;

// ============================================================================
// Configuration
// ============================================================================

/// Environment variable holding the hub base URL.
pub const ENV_HUB_URL: &str = "HUB_URL";

/// Environment variable overriding the hub WebSocket path.
pub const ENV_HUB_PATH: &str = "CHROMA_HUB_PATH";

/// Environment variable overriding the handshake timeout (seconds).
pub const ENV_CONNECT_TIMEOUT: &str = "CHROMA_CONNECT_TIMEOUT_SECS";

/// Environment variable redirecting diagnostics to a file.
pub const ENV_LOG_FILE: &str = "CHROMA_LOG_FILE";

/// Hub base URL used when `HUB_URL` is unset.
pub const DEFAULT_HUB_URL: &str = "ws://localhost:8080";

/// Path of the hub's WebSocket endpoint.
pub const DEFAULT_HUB_PATH: &str = "/ws";

/// Handshake timeout for hub and room connections.
///
/// Hardening only: no read timeouts are applied once connected.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Room protocol
// ============================================================================

/// Prefix marking a server announcement in a room.
pub const SYSTEM_MARKER: &str = "---";

/// Prefix marking an attributed chat line (`[alice] hi`).
pub const TAG_MARKER: char = '[';

/// Client-local command that leaves the current room. Never forwarded.
pub const LEAVE_COMMAND: &str = "/leave";

/// Capacity of the stdin line channel.
pub const INPUT_CHANNEL_CAPACITY: usize = 64;

// ============================================================================
// Prompts
// ============================================================================

/// Prompt shown while accepting hub commands.
pub const HUB_PROMPT: &str = "🔷 > ";

/// Prompt shown once when asking for a display name.
pub const NAME_PROMPT: &str = "👤 Your name: ";

/// Prompt shown while chatting in a room.
pub const ROOM_PROMPT: &str = "💬 ";
