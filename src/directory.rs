//! Cached room directory.
//!
//! A [`RoomDirectory`] is an immutable snapshot of the hub's room list.
//! The hub session replaces it wholesale on every `room_list`; it is
//! never merged or patched.

use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

/// Mapping of room name to connection address.
///
/// Iteration follows the order the hub listed the rooms in, which fixes
/// the 1-based indices shown in the rendered list. A name listed twice
/// keeps its first position and its last address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomDirectory {
    rooms: Vec<(String, String)>,
}

/// Transport security of a room address, inferred from its scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// `wss` address.
    Secure,
    /// Anything else.
    Insecure,
}

impl Transport {
    /// Infer transport security from an address prefix.
    #[must_use]
    pub fn of(address: &str) -> Self {
        if address.starts_with("wss") {
            Self::Secure
        } else {
            Self::Insecure
        }
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Secure => write!(f, "WSS (Secure)"),
            Self::Insecure => write!(f, "WS (Insecure)"),
        }
    }
}

impl RoomDirectory {
    /// Address of `name`, if the room is known.
    #[must_use]
    pub fn address(&self, name: &str) -> Option<&str> {
        self.rooms
            .iter()
            .find(|(room, _)| room == name)
            .map(|(_, addr)| addr.as_str())
    }

    /// Number of rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether the directory has no rooms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// `(name, address)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rooms.iter().map(|(name, addr)| (name.as_str(), addr.as_str()))
    }

    fn insert(&mut self, name: String, address: String) {
        match self.rooms.iter_mut().find(|(room, _)| *room == name) {
            Some(entry) => entry.1 = address,
            None => self.rooms.push((name, address)),
        }
    }
}

impl<'de> Deserialize<'de> for RoomDirectory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DirectoryVisitor;

        impl<'de> Visitor<'de> for DirectoryVisitor {
            type Value = RoomDirectory;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of room name to address")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
                let mut directory = RoomDirectory::default();
                while let Some((name, address)) = map.next_entry::<String, String>()? {
                    directory.insert(name, address);
                }
                Ok(directory)
            }
        }

        deserializer.deserialize_map(DirectoryVisitor)
    }
}

impl<N, A> FromIterator<(N, A)> for RoomDirectory
where
    N: Into<String>,
    A: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, A)>>(iter: I) -> Self {
        let mut directory = Self::default();
        for (name, addr) in iter {
            directory.insert(name.into(), addr.into());
        }
        directory
    }
}
