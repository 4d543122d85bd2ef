//! Shared error types across wsRelay crates.

use thiserror::Error;

use crate::protocol::ConnId;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// Requested record does not exist.
    NotFound,
    /// Unsupported config or protocol version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, WsRelayError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum WsRelayError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    /// A WebSocket upgrade failed before the session was registered.
    #[error("accept failed: {0}")]
    Accept(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl WsRelayError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            WsRelayError::BadRequest(_) => ClientCode::BadRequest,
            WsRelayError::NotFound(_) => ClientCode::NotFound,
            WsRelayError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            WsRelayError::Accept(_) | WsRelayError::Internal(_) => ClientCode::Internal,
        }
    }
}

/// A write to one specific connection failed.
///
/// Scoped to that connection: a broadcast collects these and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The connection's writer is gone; nothing will reach the transport.
    #[error("connection {conn} is closed")]
    Closed { conn: ConnId },
    /// The outbound queue is full and the policy does not wait.
    #[error("connection {conn} outbound queue is full")]
    Backpressure { conn: ConnId },
    /// The outbound queue stayed full for the whole send window.
    #[error("connection {conn} send timed out after {timeout_ms}ms")]
    TimedOut { conn: ConnId, timeout_ms: u64 },
}

impl DeliveryError {
    /// Connection the failure belongs to.
    pub fn conn(&self) -> ConnId {
        match self {
            DeliveryError::Closed { conn }
            | DeliveryError::Backpressure { conn }
            | DeliveryError::TimedOut { conn, .. } => *conn,
        }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DeliveryError::Closed { .. } => "closed",
            DeliveryError::Backpressure { .. } => "backpressure",
            DeliveryError::TimedOut { .. } => "timeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_codes_are_stable() {
        assert_eq!(WsRelayError::BadRequest("x".into()).client_code().as_str(), "BAD_REQUEST");
        assert_eq!(WsRelayError::NotFound("x".into()).client_code().as_str(), "NOT_FOUND");
        assert_eq!(WsRelayError::Accept("x".into()).client_code().as_str(), "INTERNAL");
    }

    #[test]
    fn delivery_error_names_its_connection() {
        let err = DeliveryError::TimedOut { conn: ConnId(4), timeout_ms: 250 };
        assert_eq!(err.conn(), ConnId(4));
        assert_eq!(err.kind(), "timeout");
        assert_eq!(err.to_string(), "connection conn-4 send timed out after 250ms");
    }
}
