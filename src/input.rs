//! Line-oriented user input.
//!
//! Reading stdin blocks, so [`LineInput::stdin`] runs the read loop on a
//! dedicated OS thread and forwards each line over a bounded tokio channel.
//! Sessions await [`LineInput::next_line`], which parks on the channel and
//! is cancel-safe, so it can be raced against a socket in `tokio::select!`.
//!
//! The reader is a plain `std::thread` rather than `spawn_blocking`: a
//! thread stuck in `read_line` must not hold up runtime shutdown.

use std::io::BufRead;

use tokio::sync::mpsc;

use crate::constants::INPUT_CHANNEL_CAPACITY;

/// Source of user input lines.
#[derive(Debug)]
pub struct LineInput {
    rx: mpsc::Receiver<String>,
}

impl LineInput {
    /// Start reading lines from the process stdin.
    ///
    /// The reader thread exits on end of input, on a read error, or once
    /// the returned `LineInput` has been dropped and another line arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader thread cannot be spawned.
    pub fn stdin() -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);

        std::thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || read_lines(std::io::stdin().lock(), &tx))?;

        Ok(Self { rx })
    }

    /// Create an input fed by the returned sender.
    ///
    /// Dropping the sender is end of input.
    #[must_use]
    pub fn channel(capacity: usize) -> (mpsc::Sender<String>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self { rx })
    }

    /// Wait for the next line, without its line terminator.
    ///
    /// Returns `None` at end of input.
    pub async fn next_line(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

/// Blocking read loop: forward every line of `reader` to `tx`.
///
/// Lines are decoded lossily, so a stray non-UTF-8 byte costs one
/// replacement character rather than the rest of the input.
fn read_lines<R: BufRead>(mut reader: R, tx: &mpsc::Sender<String>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches('\n').trim_end_matches('\r').to_string();
                if tx.blocking_send(line).is_err() {
                    log::debug!("[Input] Receiver dropped, stopping stdin reader");
                    return;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => {
                log::warn!("[Input] stdin read failed: {e}");
                return;
            }
        }
    }
    log::debug!("[Input] End of input");
}
