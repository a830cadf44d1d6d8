//! Hub-mode user commands.
//!
//! One line of user input parses into at most one [`Command`]. Parsing is
//! pure; dispatch lives in the session loop.

/// Command typed at the hub prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/list` or `/refresh`: request a fresh room list.
    List,
    /// `/help`: show the command list.
    Help,
    /// `/ping`: cosmetic liveness probe.
    Ping,
    /// `/info <name>`: show a room's address.
    Info {
        /// Room name as typed.
        room: String,
    },
    /// `/join <name>`: enter a room.
    Join {
        /// Room name as typed.
        room: String,
    },
    /// `/quit`: end the session.
    Quit,
    /// Anything else.
    Invalid {
        /// Trimmed input.
        raw: String,
    },
}

impl Command {
    /// Parse one line of input. Blank input yields `None`.
    ///
    /// `/info` and `/join` take the rest of the line as the room name, so
    /// names may contain spaces. A missing name makes the command invalid.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let line = input.trim();
        if line.is_empty() {
            return None;
        }

        let command = match line {
            "/list" | "/refresh" => Self::List,
            "/help" => Self::Help,
            "/ping" => Self::Ping,
            "/quit" => Self::Quit,
            _ => {
                if let Some(room) = room_argument(line, "/info") {
                    Self::Info { room }
                } else if let Some(room) = room_argument(line, "/join") {
                    Self::Join { room }
                } else {
                    Self::Invalid {
                        raw: line.to_string(),
                    }
                }
            }
        };
        Some(command)
    }
}

/// Room name following `keyword` and whitespace, if non-empty.
fn room_argument(line: &str, keyword: &str) -> Option<String> {
    let rest = line.strip_prefix(keyword)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let room = rest.trim();
    (!room.is_empty()).then(|| room.to_string())
}
