//! Configuration loading.
//!
//! The client is configured entirely from the environment. Values are
//! resolved once at startup into a [`Config`] that is passed into the hub
//! session; session code never reads the environment itself.

use std::time::Duration;

use crate::constants;

/// Configuration for the chroma-deck client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the hub (`ws://`, `wss://`, `http://` or `https://`).
    pub hub_url: String,
    /// Path of the hub's WebSocket endpoint, appended to `hub_url`.
    pub hub_path: String,
    /// Upper bound for every WebSocket handshake (hub and rooms).
    pub connect_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hub_url: constants::DEFAULT_HUB_URL.to_string(),
            hub_path: constants::DEFAULT_HUB_PATH.to_string(),
            connect_timeout: constants::DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl Config {
    /// Loads configuration from defaults with environment variable overrides.
    #[must_use]
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// `load` uses the process environment; tests pass a closure over a map.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(lookup);
        config
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(hub_url) = lookup(constants::ENV_HUB_URL) {
            if !hub_url.trim().is_empty() {
                self.hub_url = hub_url.trim().to_string();
            }
        }

        if let Some(hub_path) = lookup(constants::ENV_HUB_PATH) {
            self.hub_path = hub_path.trim().to_string();
        }

        if let Some(timeout) = lookup(constants::ENV_CONNECT_TIMEOUT) {
            match timeout.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.connect_timeout = Duration::from_secs(secs),
                _ => log::warn!(
                    "Ignoring invalid {}={:?}, keeping {}s",
                    constants::ENV_CONNECT_TIMEOUT,
                    timeout,
                    self.connect_timeout.as_secs()
                ),
            }
        }
    }

    /// Full WebSocket URL of the hub endpoint.
    ///
    /// Converts `http(s)://` to `ws(s)://` and joins the base URL and path
    /// with exactly one slash.
    #[must_use]
    pub fn hub_ws_url(&self) -> String {
        let base = crate::ws::http_to_ws_scheme(self.hub_url.trim_end_matches('/'));
        let path = self.hub_path.trim_start_matches('/');
        if path.is_empty() {
            base
        } else {
            format!("{base}/{path}")
        }
    }
}
