use axum::extract::ws::Message;

use wsrelay_core::DeliveryError;

/// Delivery strategy applied to every unicast and broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QoS {
    /// Do not await: if a recipient's queue is full, that send fails.
    Lossy,
    /// Wait for queue space up to `timeout_ms` per recipient. With 0 only the
    /// non-blocking attempt is made.
    Reliable { timeout_ms: u64 },
}

impl Default for QoS {
    fn default() -> Self {
        QoS::Reliable { timeout_ms: 1500 }
    }
}

/// Text prepared once and cloned per recipient.
#[derive(Debug, Clone)]
pub struct PreparedText(String);

impl PreparedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn to_ws_message(&self) -> Message {
        Message::Text(self.0.clone())
    }
}

/// Outcome of one broadcast call.
///
/// `attempted` is the membership size at the snapshot; every member was tried
/// exactly once. Failures never abort the fan-out, they end up in `failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: Vec<DeliveryError>,
}

impl BroadcastReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub(crate) fn record(&mut self, outcome: Result<(), DeliveryError>) {
        self.attempted += 1;
        match outcome {
            Ok(()) => self.delivered += 1,
            Err(e) => self.failed.push(e),
        }
    }
}
