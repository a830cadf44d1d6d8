//! Wire types for hub and room traffic.
//!
//! Hub payloads are JSON objects discriminated by a `type` field. They are
//! decoded at the boundary into the closed [`HubMessage`] enum; anything
//! unrecognized collapses into [`HubMessage::Unknown`] instead of leaking
//! untyped JSON into the session.
//!
//! Room payloads are raw text. The only structure the client applies is
//! the display classification in [`LineKind`].

use serde::Deserialize;

use crate::constants::{SYSTEM_MARKER, TAG_MARKER};
use crate::directory::RoomDirectory;

/// Message received from the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubMessage {
    /// Full room list; replaces the cached directory.
    RoomList {
        /// New directory snapshot.
        directory: RoomDirectory,
    },
    /// Operator announcement.
    AdminBroadcast {
        /// Announcement text.
        text: String,
    },
    /// Malformed or unrecognized payload.
    Unknown,
}

/// Tagged shape of the hub payloads the client understands.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireHubMessage {
    RoomList {
        #[serde(default)]
        rooms: RoomDirectory,
    },
    AdminBroadcast {
        #[serde(default)]
        message: String,
    },
}

impl HubMessage {
    /// Decode a hub text frame. Never fails: bad payloads are `Unknown`.
    #[must_use]
    pub fn decode(text: &str) -> Self {
        match serde_json::from_str::<WireHubMessage>(text) {
            Ok(WireHubMessage::RoomList { rooms }) => Self::RoomList { directory: rooms },
            Ok(WireHubMessage::AdminBroadcast { message }) => Self::AdminBroadcast { text: message },
            Err(e) => {
                let preview: String = text.chars().take(100).collect();
                log::debug!("[Hub] Discarding unrecognized payload ({e}): {preview}");
                Self::Unknown
            }
        }
    }
}

/// Request sent to the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubRequest {
    /// Ask for the current room list.
    GetList,
}

impl HubRequest {
    /// JSON text frame for this request.
    #[must_use]
    pub fn encode(self) -> String {
        match self {
            Self::GetList => serde_json::json!({ "type": "get_list" }).to_string(),
        }
    }
}

/// Display classification of an inbound room line.
///
/// Total over all strings; rules are checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Server announcement, prefixed with `---`.
    SystemNotice,
    /// Attributed chat line, starting with `[`.
    TaggedChat,
    /// Anything else.
    Info,
}

impl LineKind {
    /// Classify one inbound room line.
    #[must_use]
    pub fn classify(line: &str) -> Self {
        if line.starts_with(SYSTEM_MARKER) {
            Self::SystemNotice
        } else if line.starts_with(TAG_MARKER) {
            Self::TaggedChat
        } else {
            Self::Info
        }
    }
}
