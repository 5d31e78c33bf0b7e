//! Integration tests for the WebSocket draw protocol.

mod helpers;

use async_trait::async_trait;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Error as WsError;

use gacha_core::error::AppError;
use gacha_core::{AppResult, SessionId};
use gacha_realtime::DuplexChannel;

use helpers::{TestServer, is_outcome, next_text, next_texts, send};

/// Accepts one command and fails every send after the first `limit`.
struct DroppingChannel {
    command: Option<String>,
    limit: usize,
    sent: Vec<String>,
}

#[async_trait]
impl DuplexChannel for DroppingChannel {
    async fn receive(&mut self) -> Option<String> {
        self.command.take()
    }

    async fn send(&mut self, frame: &str) -> AppResult<()> {
        if self.sent.len() >= self.limit {
            return Err(AppError::transport("connection dropped"));
        }
        self.sent.push(frame.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn test_ws_upgrade_without_session() {
    let server = TestServer::spawn().await;

    let err = connect_async(server.ws_url(None))
        .await
        .expect_err("handshake must be refused");

    match err {
        WsError::Http(response) => assert_eq!(response.status(), 400),
        other => panic!("expected HTTP 400, got {other:?}"),
    }
    assert!(server.state.engine.sessions.is_empty());
    assert_eq!(server.state.engine.metrics.snapshot().connections_rejected, 1);
}

#[tokio::test]
async fn test_pull10_then_status() {
    let server = TestServer::spawn().await;
    let mut client = server.connect("alice").await;

    send(&mut client, "pull10").await;
    let frames = next_texts(&mut client, 11).await;

    assert!(frames[..10].iter().all(|f| is_outcome(f)), "{frames:?}");
    assert_eq!(frames[10], "Pulls left: 10");
}

#[tokio::test]
async fn test_quota_exhaustion() {
    let server = TestServer::spawn().await;
    let mut client = server.connect("bob").await;

    send(&mut client, "pull10").await;
    next_texts(&mut client, 11).await;
    send(&mut client, "pull10").await;
    let second = next_texts(&mut client, 11).await;
    assert_eq!(second[10], "Pulls left: 0");

    send(&mut client, "pull1").await;
    assert_eq!(next_text(&mut client).await, "Pulls left: 0");
}

#[tokio::test]
async fn test_unknown_command_is_ignored() {
    let server = TestServer::spawn().await;
    let mut client = server.connect("carol").await;

    send(&mut client, "hello").await;
    send(&mut client, "PULL10").await;
    send(&mut client, "pull1").await;

    let first = next_text(&mut client).await;
    assert!(is_outcome(&first), "got {first}");
    assert_eq!(next_text(&mut client).await, "Pulls left: 19");
}

#[tokio::test]
async fn test_reconnect_receives_backlog_first() {
    let server = TestServer::spawn().await;
    let engine = &server.state.engine;

    // A connection that drops after three frames leaves seven buffered.
    let mut dropping = DroppingChannel {
        command: Some("pull10".to_string()),
        limit: 3,
        sent: Vec::new(),
    };
    engine
        .attach(Some("dave"))
        .expect("attach")
        .run(&mut dropping)
        .await;

    let id = SessionId::parse(Some("dave"), 128).expect("valid id");
    let session = engine.sessions.get(&id).expect("session survives the drop");
    let backlog: Vec<String> = session
        .snapshot()
        .await
        .pending
        .iter()
        .map(|t| t.label().to_string())
        .collect();
    assert_eq!(backlog.len(), 7);

    let mut client = server.connect("dave").await;
    let flushed = next_texts(&mut client, 7).await;
    assert_eq!(flushed, backlog);

    send(&mut client, "pull1").await;
    let fresh = next_text(&mut client).await;
    assert!(is_outcome(&fresh));
    assert_eq!(next_text(&mut client).await, "Pulls left: 9");
    assert_eq!(session.pending_len().await, 0);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let server = TestServer::spawn().await;
    let mut erin = server.connect("erin").await;
    let mut frank = server.connect("frank").await;

    send(&mut erin, "pull10").await;
    send(&mut frank, "pull1").await;

    assert_eq!(next_texts(&mut erin, 11).await[10], "Pulls left: 10");
    assert_eq!(next_texts(&mut frank, 2).await[1], "Pulls left: 19");
}
