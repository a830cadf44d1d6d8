// Shared fixtures for session integration tests.
//
// Every fixture binds 127.0.0.1:0 and serves exactly one WebSocket
// connection with tokio-tungstenite, so tests can run in parallel.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chroma_deck::{Config, MemoryConsole};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

/// Upper bound for anything a test waits on.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Server side of one accepted WebSocket connection.
pub type ServerSocket = WebSocketStream<TcpStream>;

/// Accept one WebSocket connection on a fresh port and hand it to `handler`.
///
/// Returns the `ws://127.0.0.1:<port>` base URL and the server task.
pub async fn spawn_ws_server<F, Fut>(handler: F) -> (String, JoinHandle<()>)
where
    F: FnOnce(ServerSocket) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        handler(ws).await;
    });
    (format!("ws://{addr}"), handle)
}

/// A TCP listener that only counts incoming connections.
pub async fn spawn_counting_listener() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&accepted);
    tokio::spawn(async move {
        while listener.accept().await.is_ok() {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });
    (format!("ws://{addr}/room"), accepted)
}

/// Address with nothing listening on it.
pub fn unreachable_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{addr}/room")
}

/// Test configuration pointing at `hub_url`.
pub fn config_for(hub_url: &str) -> Config {
    Config {
        hub_url: hub_url.to_string(),
        hub_path: "/ws".to_string(),
        connect_timeout: Duration::from_secs(2),
    }
}

/// Poll `console` until a line contains `needle`.
pub async fn wait_for_line(console: &MemoryConsole, needle: &str) {
    let found = tokio::time::timeout(TEST_TIMEOUT, async {
        while !console.contains(needle) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(
        found.is_ok(),
        "timed out waiting for {needle:?}; transcript: {:#?}",
        console.lines()
    );
}

/// Number of lines containing `needle`.
pub fn count_lines(console: &MemoryConsole, needle: &str) -> usize {
    console.lines().iter().filter(|l| l.contains(needle)).count()
}

/// Room that sends its welcome, waits for the display name, then sends
/// `tick N` every few milliseconds until the client goes away.
///
/// Returns the room address and the server task.
pub async fn spawn_flooding_room() -> (String, JoinHandle<()>) {
    let (base, server) = spawn_ws_server(|mut ws| async move {
        if ws.send(Message::Text("Welcome".to_string())).await.is_err() {
            return;
        }
        let _ = ws.next().await;
        let mut n = 0u32;
        loop {
            n += 1;
            if ws.send(Message::Text(format!("tick {n}"))).await.is_err() {
                return;
            }
            tokio::select! {
                msg = ws.next() => match msg {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
                    Some(Ok(_)) => {}
                },
                () = tokio::time::sleep(Duration::from_millis(1)) => {}
            }
        }
    })
    .await;
    (format!("{base}/room"), server)
}

// ============================================================================
// Mock hub
// ============================================================================

/// Instruction for a running [`MockHub`].
#[derive(Debug)]
pub enum HubControl {
    /// Push an `admin_broadcast`.
    Broadcast(String),
    /// Push a raw text frame.
    Raw(String),
    /// Close the connection.
    Disconnect,
}

/// In-process hub answering every `get_list` with a fixed room list.
pub struct MockHub {
    /// Base URL to put in [`Config::hub_url`].
    pub url: String,
    get_list_count: Arc<AtomicUsize>,
    control: mpsc::UnboundedSender<HubControl>,
    handle: JoinHandle<()>,
}

impl MockHub {
    /// Start a hub advertising `rooms` (a JSON object of name → address).
    pub async fn start(rooms: serde_json::Value) -> Self {
        let get_list_count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&get_list_count);
        let (control, mut control_rx) = mpsc::unbounded_channel();

        let room_list = serde_json::json!({ "type": "room_list", "rooms": rooms }).to_string();

        let (url, handle) = spawn_ws_server(move |mut ws| async move {
            loop {
                tokio::select! {
                    msg = ws.next() => match msg {
                        Some(Ok(Message::Text(text))) => {
                            let request: serde_json::Value =
                                serde_json::from_str(&text).unwrap_or_default();
                            if request["type"] == "get_list" {
                                counter.fetch_add(1, Ordering::SeqCst);
                                if ws.send(Message::Text(room_list.clone())).await.is_err() {
                                    break;
                                }
                            }
                        }
                        Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                        Some(Ok(_)) => {}
                    },
                    ctl = control_rx.recv() => match ctl {
                        Some(HubControl::Broadcast(message)) => {
                            let frame = serde_json::json!({
                                "type": "admin_broadcast",
                                "message": message,
                            });
                            if ws.send(Message::Text(frame.to_string())).await.is_err() {
                                break;
                            }
                        }
                        Some(HubControl::Raw(text)) => {
                            if ws.send(Message::Text(text)).await.is_err() {
                                break;
                            }
                        }
                        Some(HubControl::Disconnect) | None => {
                            let _ = ws.close(None).await;
                            break;
                        }
                    },
                }
            }
        })
        .await;

        Self {
            url,
            get_list_count,
            control,
            handle,
        }
    }

    /// Send an instruction to the running hub.
    pub fn control(&self, ctl: HubControl) {
        self.control.send(ctl).unwrap();
    }

    /// Wait for the connection to end, then return how many `get_list`
    /// requests the hub received.
    pub async fn finish(self) -> usize {
        tokio::time::timeout(TEST_TIMEOUT, self.handle)
            .await
            .expect("mock hub did not finish")
            .expect("mock hub panicked");
        self.get_list_count.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Mock room
// ============================================================================

/// In-process room: sends `welcome`, records the display name and every
/// later text frame, and sends `after_join` once the name has arrived.
pub struct MockRoom {
    /// Address to advertise in the hub's room list.
    pub url: String,
    handle: JoinHandle<Vec<String>>,
}

impl MockRoom {
    /// Start a room that stays open until the client closes.
    pub async fn start(welcome: &str, after_join: &[&str]) -> Self {
        Self::start_with(welcome, after_join, false).await
    }

    /// Start a room that closes right after sending `after_join`.
    pub async fn start_closing(welcome: &str, after_join: &[&str]) -> Self {
        Self::start_with(welcome, after_join, true).await
    }

    async fn start_with(welcome: &str, after_join: &[&str], close_after: bool) -> Self {
        let welcome = welcome.to_string();
        let after_join: Vec<String> = after_join.iter().map(ToString::to_string).collect();
        let (received_tx, mut received_rx) = mpsc::unbounded_channel::<String>();

        let (base, server) = spawn_ws_server(move |mut ws| async move {
            if ws.send(Message::Text(welcome)).await.is_err() {
                return;
            }
            let mut joined = false;
            while let Some(Ok(msg)) = ws.next().await {
                match msg {
                    Message::Text(text) => {
                        let _ = received_tx.send(text);
                        if !joined {
                            joined = true;
                            for line in &after_join {
                                if ws.send(Message::Text(line.clone())).await.is_err() {
                                    return;
                                }
                            }
                            if close_after {
                                let _ = ws.close(None).await;
                                // Drain until the client's close reply.
                                while let Some(Ok(_)) = ws.next().await {}
                                return;
                            }
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        })
        .await;

        let handle = tokio::spawn(async move {
            let _ = server.await;
            let mut received = Vec::new();
            while let Ok(text) = received_rx.try_recv() {
                received.push(text);
            }
            received
        });

        Self {
            url: format!("{base}/room"),
            handle,
        }
    }

    /// Wait for the client to disconnect and return every text frame the
    /// room received, display name first.
    pub async fn finish(self) -> Vec<String> {
        tokio::time::timeout(TEST_TIMEOUT, self.handle)
            .await
            .expect("mock room did not finish")
            .expect("mock room panicked")
    }
}
