//! Shared harness: a relay served on an ephemeral port plus WS client helpers.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tower::ServiceExt;

use wsrelay_gateway::app_state::AppState;
use wsrelay_gateway::{config, router};

pub const TIMEOUT: Duration = Duration::from_secs(5);
pub const QUIET: Duration = Duration::from_millis(200);

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct Relay {
    pub addr: SocketAddr,
    pub state: AppState,
    pub app: Router,
}

/// Serve a relay with default config on 127.0.0.1:0.
pub async fn boot() -> Relay {
    boot_with("version: 1\n").await
}

pub async fn boot_with(yaml: &str) -> Relay {
    let cfg = config::load_from_str(yaml).expect("test config");
    let state = AppState::new(cfg).expect("state");
    let app = router::build_router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let served = app.clone();
    tokio::spawn(async move {
        axum::serve(listener, served).await.expect("serve");
    });

    Relay { addr, state, app }
}

impl Relay {
    pub async fn connect(&self, client_id: u64) -> WsStream {
        let (ws, _) = connect_async(format!("ws://{}/ws/{client_id}", self.addr))
            .await
            .expect("ws connect");
        ws
    }

    /// Connect and consume the client's own join notice, so it is registered.
    pub async fn join(&self, client_id: u64) -> WsStream {
        let mut ws = self.connect(client_id).await;
        assert_eq!(next_text(&mut ws).await, format!("Client #{client_id} joined the chat"));
        ws
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, String) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(b) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let resp = self.app.clone().oneshot(req).await.expect("infallible");
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, String::from_utf8(bytes.to_vec()).expect("utf8 body"))
    }

    /// Wait until the registry holds exactly `n` connections.
    pub async fn wait_for_members(&self, n: usize) {
        timeout(TIMEOUT, async {
            while self.state.registry().len() != n {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("registry size never settled");
    }
}

/// Next text frame, skipping control frames.
pub async fn next_text(ws: &mut WsStream) -> String {
    loop {
        let msg = timeout(TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("ws error");
        if let Message::Text(t) = msg {
            return t;
        }
    }
}

/// Assert no text frame arrives for a short while.
pub async fn assert_quiet(ws: &mut WsStream) {
    let got = timeout(QUIET, async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(t))) => return Some(t),
                Some(Ok(_)) => continue,
                _ => return None,
            }
        }
    })
    .await;
    if let Ok(Some(t)) = got {
        panic!("unexpected frame: {t}");
    }
}

/// Drain until the server ends the stream.
pub async fn wait_closed(ws: &mut WsStream) {
    timeout(TIMEOUT, async {
        loop {
            match ws.next().await {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await
    .expect("server never closed the stream");
}
