//! Shared test helpers for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use gacha_api::AppState;
use gacha_core::config::AppConfig;

/// Client side of a test WebSocket.
pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A running server on an ephemeral port.
pub struct TestServer {
    /// Bound address
    pub addr: SocketAddr,
    /// Shared state, for inspecting the engine directly
    pub state: AppState,
}

impl TestServer {
    /// Start a server with default configuration and a fixed draw seed.
    pub async fn spawn() -> Self {
        let mut config = AppConfig::default();
        config.realtime.draw_seed = Some(2024);
        let state = AppState::new(config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");

        let app = gacha_api::build_router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });

        Self { addr, state }
    }

    /// WebSocket URL, with an optional session query parameter.
    pub fn ws_url(&self, session: Option<&str>) -> String {
        match session {
            Some(id) => format!("ws://{}/ws?session={}", self.addr, id),
            None => format!("ws://{}/ws", self.addr),
        }
    }

    /// Open a WebSocket for `session`.
    pub async fn connect(&self, session: &str) -> Client {
        let (client, _) = connect_async(self.ws_url(Some(session)))
            .await
            .expect("WebSocket handshake");
        client
    }
}

/// Send one text command.
pub async fn send(client: &mut Client, command: &str) {
    client
        .send(Message::Text(command.to_string().into()))
        .await
        .expect("send command");
}

/// Wait for the next text frame.
pub async fn next_text(client: &mut Client) -> String {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("frame within timeout")
            .expect("stream open")
            .expect("valid frame");
        if msg.is_text() {
            return msg.to_text().expect("utf-8 frame").to_string();
        }
    }
}

/// Read `n` text frames.
pub async fn next_texts(client: &mut Client, n: usize) -> Vec<String> {
    let mut frames = Vec::with_capacity(n);
    for _ in 0..n {
        frames.push(next_text(client).await);
    }
    frames
}

/// Whether a frame is one of the tier labels.
pub fn is_outcome(frame: &str) -> bool {
    matches!(frame, "🎴 Common" | "✨ Rare" | "🌟 Ultra Rare")
}
