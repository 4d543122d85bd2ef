use axum::extract::ws::Message;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::{timeout, Duration};

use wsrelay_core::DeliveryError;

use crate::realtime::core::Connection;
use crate::realtime::types::QoS;

/// Push one message into one connection's outbound queue.
///
/// Both strategies try a non-blocking send first. `Reliable` then waits for
/// queue space, never longer than its timeout.
pub(crate) async fn deliver(conn: &Connection, msg: Message, qos: QoS) -> Result<(), DeliveryError> {
    let id = conn.id();
    let msg = match conn.tx().try_send(msg) {
        Ok(()) => return Ok(()),
        Err(TrySendError::Closed(_)) => return Err(DeliveryError::Closed { conn: id }),
        Err(TrySendError::Full(msg)) => msg,
    };

    match qos {
        QoS::Lossy => Err(DeliveryError::Backpressure { conn: id }),
        QoS::Reliable { timeout_ms } => {
            match timeout(Duration::from_millis(timeout_ms), conn.tx().send(msg)).await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(_)) => Err(DeliveryError::Closed { conn: id }),
                Err(_) => Err(DeliveryError::TimedOut { conn: id, timeout_ms }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn text(s: &str) -> Message {
        Message::Text(s.to_string())
    }

    #[tokio::test]
    async fn lossy_reports_backpressure_when_full() {
        let (tx, _rx) = mpsc::channel(1);
        let conn = Connection::new(1, tx);
        deliver(&conn, text("a"), QoS::Lossy).await.unwrap();
        let err = deliver(&conn, text("b"), QoS::Lossy).await.unwrap_err();
        assert_eq!(err, DeliveryError::Backpressure { conn: conn.id() });
    }

    #[tokio::test(start_paused = true)]
    async fn reliable_times_out_on_a_stalled_queue() {
        let (tx, _rx) = mpsc::channel(1);
        let conn = Connection::new(1, tx);
        let qos = QoS::Reliable { timeout_ms: 50 };
        deliver(&conn, text("a"), qos).await.unwrap();
        let err = deliver(&conn, text("b"), qos).await.unwrap_err();
        assert_eq!(err, DeliveryError::TimedOut { conn: conn.id(), timeout_ms: 50 });
    }

    #[tokio::test(start_paused = true)]
    async fn zero_timeout_never_waits_on_a_full_queue() {
        let (tx, _rx) = mpsc::channel(1);
        let conn = Connection::new(1, tx);
        let qos = QoS::Reliable { timeout_ms: 0 };
        deliver(&conn, text("a"), qos).await.unwrap();

        let started = tokio::time::Instant::now();
        let err = deliver(&conn, text("b"), qos).await.unwrap_err();
        assert_eq!(err, DeliveryError::TimedOut { conn: conn.id(), timeout_ms: 0 });
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn reliable_waits_for_space() {
        let (tx, mut rx) = mpsc::channel(1);
        let conn = Connection::new(1, tx);
        let qos = QoS::Reliable { timeout_ms: 5_000 };
        deliver(&conn, text("a"), qos).await.unwrap();

        let drain = tokio::spawn(async move {
            let mut seen = Vec::new();
            while let Some(Message::Text(t)) = rx.recv().await {
                seen.push(t);
                if seen.len() == 2 {
                    break;
                }
            }
            seen
        });
        deliver(&conn, text("b"), qos).await.unwrap();
        assert_eq!(drain.await.unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn closed_queue_is_reported() {
        let (tx, rx) = mpsc::channel(4);
        let conn = Connection::new(1, tx);
        drop(rx);
        for qos in [QoS::Lossy, QoS::Reliable { timeout_ms: 10 }] {
            let err = deliver(&conn, text("a"), qos).await.unwrap_err();
            assert_eq!(err, DeliveryError::Closed { conn: conn.id() });
        }
    }
}
