//! Terminal output sink.
//!
//! Sessions never print directly; they write through a [`Console`] shared
//! as `Arc<dyn Console>` between the outbound loop and the inbound relay
//! task. Each call writes one whole line, so concurrent writers never
//! split a line (interleaving of whole lines is expected).

use std::io::Write;
use std::sync::{Arc, Mutex};

/// Line-oriented output used by both sessions.
pub trait Console: Send + Sync + std::fmt::Debug {
    /// Write one complete line.
    fn line(&self, text: &str);

    /// Write a prompt without a trailing newline.
    fn prompt(&self, text: &str);
}

/// [`Console`] backed by the process stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn line(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout leaves nothing to report to.
        let _ = writeln!(out, "{text}");
    }

    fn prompt(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "{text}");
        let _ = out.flush();
    }
}

/// One entry of a [`MemoryConsole`] transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEntry {
    /// A complete output line.
    Line(String),
    /// A prompt.
    Prompt(String),
}

/// In-memory [`Console`] that records everything written to it.
#[derive(Debug, Default, Clone)]
pub struct MemoryConsole {
    entries: Arc<Mutex<Vec<ConsoleEntry>>>,
}

impl MemoryConsole {
    /// Create an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries written so far.
    #[must_use]
    pub fn entries(&self) -> Vec<ConsoleEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Snapshot of the complete lines written so far (prompts excluded).
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                ConsoleEntry::Line(text) => Some(text),
                ConsoleEntry::Prompt(_) => None,
            })
            .collect()
    }

    /// Whether any written line contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    fn push(&self, entry: ConsoleEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}

impl Console for MemoryConsole {
    fn line(&self, text: &str) {
        self.push(ConsoleEntry::Line(text.to_string()));
    }

    fn prompt(&self, text: &str) {
        self.push(ConsoleEntry::Prompt(text.to_string()));
    }
}
