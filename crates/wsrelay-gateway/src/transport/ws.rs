//! WebSocket gateway session.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS on `/ws/:client_id`
//! - Register the connection and announce the join
//! - Echo + relay every inbound text frame
//! - On close (any cause): stop writing, deregister, announce the departure
//!
//! Each session runs two tasks: the reader loop below and a writer task that
//! drains the connection's outbound queue into the socket and sends heartbeat
//! pings. Broadcasts only ever touch the queue, so a slow socket stalls its
//! own writer and nothing else.

use std::sync::Arc;

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, Path, State},
    response::Response,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Duration, MissedTickBehavior};
use tracing::Instrument;

use wsrelay_core::error::WsRelayError;
use wsrelay_core::protocol::{ClientId, Notice};
use wsrelay_core::DeliveryError;

use crate::app_state::AppState;
use crate::realtime::{Connection, ConnectionRegistry};
use crate::transport::codec::{decode, Inbound};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Upgrade in progress.
    Connecting,
    /// Registered and relaying.
    Open,
    /// Terminal.
    Closed,
}

/// Why a session left `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Close frame or end of stream.
    ClientClosed,
    /// Read error on the socket.
    TransportError,
    /// The writer task stopped (socket write failed) or the queue is closed.
    WriterGone,
    /// Server shutdown.
    Shutdown,
}

impl CloseReason {
    pub fn as_str(self) -> &'static str {
        match self {
            CloseReason::ClientClosed => "client_closed",
            CloseReason::TransportError => "transport_error",
            CloseReason::WriterGone => "writer_gone",
            CloseReason::Shutdown => "shutdown",
        }
    }
}

// --------------------
// Entry
// --------------------
pub async fn ws_upgrade(
    State(app): State<AppState>,
    Path(client_id): Path<ClientId>,
    ws: WebSocketUpgrade,
) -> Response {
    app.metrics().ws_upgrades.inc(&[]);
    tracing::debug!(client_id, phase = ?SessionPhase::Connecting, "ws upgrade");

    let max_bytes = app.cfg().gateway.max_message_bytes;
    let on_failure = app.clone();

    ws.max_message_size(max_bytes)
        .on_failed_upgrade(move |e: axum::Error| {
            let err = WsRelayError::Accept(e.to_string());
            on_failure.metrics().accept_failures.inc(&[]);
            tracing::warn!(client_id, error = %err, "ws session discarded before registration");
        })
        .on_upgrade(move |socket| {
            let span = tracing::info_span!("ws_session", client_id);
            run_session(app, client_id, socket).instrument(span)
        })
}

// --------------------
// Core session loop
// --------------------
async fn run_session(app: AppState, client_id: ClientId, socket: WebSocket) {
    let registry = app.registry();
    let gw = &app.cfg().gateway;
    let ping_every = Duration::from_millis(gw.ping_interval_ms);

    let (out_tx, out_rx) = mpsc::channel::<Message>(gw.outbound_queue);
    let (ws_tx, mut ws_rx) = socket.split();
    let conn = Connection::new(client_id, out_tx);

    // ---- Connecting -> Open
    registry.register(conn.clone());
    let mut writer = tokio::spawn(write_loop(ws_tx, out_rx, ping_every));
    app.metrics().ws_active_sessions.inc(&[]);
    tracing::info!(conn_id = %conn.id(), phase = ?SessionPhase::Open, "session open");

    registry
        .broadcast(&Notice::Joined { client: client_id }.to_string())
        .await;

    let mut shutdown = app.shutdown_signal();
    let reason = if *shutdown.borrow() {
        CloseReason::Shutdown
    } else {
        loop {
            let inbound = tokio::select! {
                read = ws_rx.next() => decode(read),
                _ = &mut writer => Inbound::Closed(CloseReason::WriterGone),
                _ = shutdown.changed() => Inbound::Closed(CloseReason::Shutdown),
            };

            match inbound {
                Inbound::Skip => continue,
                Inbound::Closed(reason) => break reason,
                Inbound::Text(text) => {
                    if let Some(reason) = relay(&registry, &conn, &text).await {
                        break reason;
                    }
                }
            }
        }
    };

    // ---- Open -> Closed (runs on every exit path)
    writer.abort();
    registry.deregister(conn.id());
    app.metrics().ws_active_sessions.dec(&[]);
    app.metrics()
        .session_closes
        .inc(&[("reason", reason.as_str())]);
    tracing::info!(
        conn_id = %conn.id(),
        phase = ?SessionPhase::Closed,
        reason = reason.as_str(),
        "session closed"
    );

    registry
        .broadcast(&Notice::Left { client: client_id }.to_string())
        .await;
}

/// Echo to the sender, then relay to everyone (sender included).
///
/// Returns a close reason only when the sender's own queue is gone.
async fn relay(registry: &Arc<ConnectionRegistry>, conn: &Connection, text: &str) -> Option<CloseReason> {
    match registry.unicast(conn, &Notice::Echo { text }.to_string()).await {
        Ok(()) => {}
        Err(DeliveryError::Closed { .. }) => return Some(CloseReason::WriterGone),
        Err(e) => tracing::warn!(error = %e, "echo not delivered"),
    }

    let says = Notice::Says { client: conn.client_id(), text }.to_string();
    let report = registry.broadcast(&says).await;
    if !report.is_clean() {
        tracing::debug!(failed = report.failed.len(), "relay partially delivered");
    }
    None
}

// --------------------
// Writer task
// --------------------
async fn write_loop(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<Message>,
    ping_every: Duration,
) {
    let mut ping = tokio::time::interval_at(tokio::time::Instant::now() + ping_every, ping_every);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            maybe_out = rx.recv() => {
                let Some(msg) = maybe_out else { break; };
                if sink.send(msg).await.is_err() {
                    break;
                }
            }
            _ = ping.tick() => {
                if sink.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }
        }
    }

    let _ = sink.close().await;
}
