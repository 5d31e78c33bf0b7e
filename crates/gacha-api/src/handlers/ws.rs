//! WebSocket upgrade handler.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use tracing::debug;

use gacha_core::AppResult;
use gacha_core::error::{AppError, ErrorKind};
use gacha_realtime::DuplexChannel;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the WebSocket upgrade.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// Client-chosen session identifier.
    pub session: Option<String>,
}

/// GET /ws?session={id} — WebSocket upgrade
///
/// The session id is validated before the upgrade, so a missing id gets a
/// plain 400 response and never reaches the command loop.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let handler = state.engine.attach(query.session.as_deref())?;
    let max_message_bytes = state.config.realtime.max_message_bytes;

    Ok(ws
        .max_message_size(max_message_bytes)
        .on_upgrade(move |socket| async move {
            let mut channel = WsChannel::new(socket);
            handler.run(&mut channel).await;
            channel.close().await;
        }))
}

/// [`DuplexChannel`] over an upgraded axum WebSocket.
pub struct WsChannel {
    socket: WebSocket,
}

impl WsChannel {
    /// Wrap an upgraded socket.
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }

    /// Best-effort close frame.
    pub async fn close(mut self) {
        let _ = self.socket.send(Message::Close(None)).await;
    }
}

#[async_trait]
impl DuplexChannel for WsChannel {
    async fn receive(&mut self) -> Option<String> {
        loop {
            match self.socket.recv().await? {
                Ok(Message::Text(text)) => return Some(text.as_str().to_owned()),
                Ok(Message::Close(_)) => return None,
                // Binary and ping/pong frames are not commands
                Ok(_) => continue,
                Err(e) => {
                    debug!(error = %e, "WebSocket read error");
                    return None;
                }
            }
        }
    }

    async fn send(&mut self, frame: &str) -> AppResult<()> {
        self.socket
            .send(Message::Text(frame.to_owned().into()))
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Transport, "WebSocket send failed", e))
    }
}
