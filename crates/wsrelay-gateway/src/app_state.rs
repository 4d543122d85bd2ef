//! Shared application state for the relay.
//!
//! Owns the connection registry, the resource stores and the metrics. Every
//! session and every HTTP handler reaches them through this handle; nothing is
//! global.

use std::sync::Arc;

use tokio::sync::watch;

use wsrelay_core::error::Result;

use crate::config::RelayConfig;
use crate::obs::RelayMetrics;
use crate::realtime::ConnectionRegistry;
use crate::resources::Stores;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    registry: Arc<ConnectionRegistry>,
}

struct AppStateInner {
    cfg: RelayConfig,
    stores: Stores,
    metrics: Arc<RelayMetrics>,
    shutdown: watch::Sender<bool>,
}

impl AppState {
    /// Build state with in-memory stores.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: RelayConfig) -> Result<Self> {
        Self::with_stores(cfg, Stores::in_memory())
    }

    pub fn with_stores(cfg: RelayConfig, stores: Stores) -> Result<Self> {
        cfg.validate()?;

        let metrics = Arc::new(RelayMetrics::default());
        let registry = Arc::new(ConnectionRegistry::with_metrics(
            cfg.realtime.qos(),
            Arc::clone(&metrics),
        ));
        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                stores,
                metrics,
                shutdown,
            }),
            registry,
        })
    }

    pub fn cfg(&self) -> &RelayConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> Arc<ConnectionRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    pub fn metrics(&self) -> &RelayMetrics {
        &self.inner.metrics
    }

    /// Extra gauge lines appended to `/metrics`.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![("wsrelay_registry_connections", self.registry.len() as u64)]
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }

    /// Flip readiness to draining and tell every open session to close.
    pub fn begin_shutdown(&self) {
        self.inner.metrics.set_draining();
        self.inner.shutdown.send_replace(true);
    }

    /// Receiver that observes `begin_shutdown`.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.inner.shutdown.subscribe()
    }
}
