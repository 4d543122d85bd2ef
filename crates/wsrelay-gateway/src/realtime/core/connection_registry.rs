use std::sync::Arc;
use std::time::Instant;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;

use wsrelay_core::protocol::ConnId;
use wsrelay_core::DeliveryError;

use crate::obs::RelayMetrics;
use crate::realtime::core::delivery::deliver;
use crate::realtime::core::Connection;
use crate::realtime::types::{BroadcastReport, PreparedText, QoS};

/// Authoritative set of open connections, keyed by `ConnId`.
///
/// Broadcast works on a snapshot taken at call start: members that register
/// afterwards miss that broadcast, members that deregister afterwards may
/// still have it queued, but their writer is already stopped by then so it
/// never reaches the transport.
pub struct ConnectionRegistry {
    conns: DashMap<ConnId, Connection>,
    qos: QoS,
    metrics: Arc<RelayMetrics>,
}

impl ConnectionRegistry {
    pub fn new(qos: QoS) -> Self {
        Self::with_metrics(qos, Arc::new(RelayMetrics::default()))
    }

    pub fn with_metrics(qos: QoS, metrics: Arc<RelayMetrics>) -> Self {
        Self {
            conns: DashMap::new(),
            qos,
            metrics,
        }
    }

    /// Add a connection. Re-registering a present `ConnId` changes nothing and
    /// returns `false`.
    pub fn register(&self, conn: Connection) -> bool {
        match self.conns.entry(conn.id()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(conn);
                true
            }
        }
    }

    /// Remove a connection if present. Does not touch the transport.
    pub fn deregister(&self, id: ConnId) -> Option<Connection> {
        self.conns.remove(&id).map(|(_, conn)| conn)
    }

    pub fn contains(&self, id: ConnId) -> bool {
        self.conns.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.conns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }

    /// Copy of the current membership, in map order.
    pub fn snapshot(&self) -> Vec<Connection> {
        self.conns.iter().map(|e| e.value().clone()).collect()
    }

    /// Send `text` to exactly one connection.
    ///
    /// A connection that is no longer a member is treated as closed.
    pub async fn unicast(&self, conn: &Connection, text: &str) -> Result<(), DeliveryError> {
        if !self.contains(conn.id()) {
            return Err(DeliveryError::Closed { conn: conn.id() });
        }
        let outcome = deliver(conn, PreparedText::new(text).to_ws_message(), self.qos).await;
        self.record_delivery(&outcome);
        outcome
    }

    /// Send `text` to every member registered at call start.
    ///
    /// Never fails as a whole: per-connection failures are collected in the
    /// report and the remaining members are still attempted. An empty registry
    /// yields an empty report.
    pub async fn broadcast(&self, text: &str) -> BroadcastReport {
        let started = Instant::now();
        let members = self.snapshot();
        let mut report = BroadcastReport::default();

        let prepared = PreparedText::new(text);
        match self.qos {
            QoS::Lossy => {
                for conn in &members {
                    report.record(deliver(conn, prepared.to_ws_message(), self.qos).await);
                }
            }
            QoS::Reliable { .. } => {
                let mut sends: FuturesUnordered<_> = members
                    .iter()
                    .map(|conn| deliver(conn, prepared.to_ws_message(), self.qos))
                    .collect();
                while let Some(outcome) = sends.next().await {
                    report.record(outcome);
                }
            }
        }

        self.metrics.broadcasts.inc(&[]);
        self.metrics.broadcast_duration.observe(&[], started.elapsed());
        self.metrics
            .deliveries
            .add(&[("outcome", "ok")], report.delivered as u64);
        for err in &report.failed {
            self.metrics.deliveries.inc(&[("outcome", err.kind())]);
            tracing::debug!(conn_id = %err.conn(), error = %err, "broadcast delivery failed");
        }
        tracing::debug!(
            recipients = report.attempted,
            delivered = report.delivered,
            failed = report.failed.len(),
            "broadcast"
        );
        report
    }

    fn record_delivery(&self, outcome: &Result<(), DeliveryError>) {
        let label = match outcome {
            Ok(()) => "ok",
            Err(e) => e.kind(),
        };
        self.metrics.deliveries.inc(&[("outcome", label)]);
    }
}
