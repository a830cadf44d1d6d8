//! Chroma-Deck - terminal client for the Chroma hub and its chat rooms.
//!
//! The client connects to a hub, lists the rooms it advertises, and lets
//! the user join one room at a time to chat.
//!
//! # Architecture
//!
//! Two sessions run one after the other, never concurrently:
//!
//! - **Hub** ([`HubSession`]) - owns the hub connection and the cached
//!   room directory, dispatches user commands, and is the outer loop
//! - **Room** ([`RoomSession`]) - owns one room connection and runs the
//!   inbound relay and outbound send side by side until leave/disconnect
//!
//! # Modules
//!
//! - [`config`] - Environment-based configuration
//! - [`ws`] - WebSocket transport shared by both sessions
//! - [`protocol`] - Hub message decoding and room line classification
//! - [`console`] / [`input`] - Terminal output sink and line input
//! - [`render`] - All user-visible text

pub mod config;
pub mod console;
pub mod constants;
pub mod directory;
pub mod hub;
pub mod input;
pub mod protocol;
pub mod render;
pub mod room;
pub mod ws;

// Re-export commonly used types
pub use config::Config;
pub use console::{Console, MemoryConsole, StdoutConsole};
pub use directory::RoomDirectory;
pub use hub::{Command, HubSession};
pub use input::LineInput;
pub use protocol::{HubMessage, LineKind};
pub use room::{RoomSession, SessionOutcome};
