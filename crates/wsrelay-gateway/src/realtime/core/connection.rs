use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::Message;
use tokio::sync::mpsc;

use wsrelay_core::protocol::{ClientId, ConnId};

static NEXT_CONN_ID: AtomicU64 = AtomicU64::new(1);

/// One session's outbound handle.
///
/// The queue is drained by the session's writer task; once that task stops,
/// every send fails with `DeliveryError::Closed`.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnId,
    client_id: ClientId,
    tx: mpsc::Sender<Message>,
}

impl Connection {
    /// Wrap a freshly accepted session's queue with a new process-unique id.
    pub fn new(client_id: ClientId, tx: mpsc::Sender<Message>) -> Self {
        let id = ConnId(NEXT_CONN_ID.fetch_add(1, Ordering::Relaxed));
        Self { id, client_id, tx }
    }

    pub fn id(&self) -> ConnId {
        self.id
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub(crate) fn tx(&self) -> &mpsc::Sender<Message> {
        &self.tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_even_for_the_same_client() {
        let (tx, _rx) = mpsc::channel(1);
        let a = Connection::new(7, tx.clone());
        let b = Connection::new(7, tx);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.client_id(), b.client_id());
    }
}
