//! Chroma-Deck CLI - interactive client for the Chroma hub.
//!
//! This is the main binary entry point. See the `chroma_deck` library for
//! the session logic.

use std::process::ExitCode;
use std::sync::Arc;

use chroma_deck::{constants, render, Config, Console, HubSession, LineInput, StdoutConsole};
use mimalloc::MiMalloc;

/// Global allocator configured per M-MIMALLOC-APPS guideline.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Route diagnostics to `CHROMA_LOG_FILE` when set, otherwise stderr.
///
/// The default filter is `warn` so an interactive session stays readable;
/// `RUST_LOG` overrides it.
fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.format_timestamp_secs();

    let mut file_error = None;
    if let Ok(path) = std::env::var(constants::ENV_LOG_FILE) {
        match std::fs::File::create(&path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => file_error = Some((path, e)),
        }
    }

    builder.init();

    if let Some((path, e)) = file_error {
        log::warn!("Could not open log file {path}: {e}; logging to stderr");
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Could not listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let config = Config::load();
    log::info!(
        "Chroma-Deck v{} using hub {}",
        env!("CARGO_PKG_VERSION"),
        config.hub_ws_url()
    );

    let console: Arc<dyn Console> = Arc::new(StdoutConsole);
    let input = match LineInput::stdin() {
        Ok(input) => input,
        Err(e) => {
            console.line(&format!("❌ Could not read from the terminal: {e:#}"));
            return ExitCode::FAILURE;
        }
    };

    let mut hub = HubSession::new(config, Arc::clone(&console), input);

    tokio::select! {
        result = hub.run() => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("Hub session ended with error: {e:#}");
                ExitCode::FAILURE
            }
        },
        () = interrupted() => {
            console.line("");
            console.line(render::GOODBYE);
            ExitCode::SUCCESS
        }
    }
}
