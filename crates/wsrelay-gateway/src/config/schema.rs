use serde::Deserialize;
use wsrelay_core::error::{Result, WsRelayError};

use crate::realtime::QoS;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub realtime: RealtimeSection,

    #[serde(default)]
    pub resources: ResourcesSection,
}

impl RelayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(WsRelayError::UnsupportedVersion);
        }

        self.gateway.validate()?;
        self.realtime.validate()?;
        self.resources.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    /// Largest inbound WebSocket message the transport accepts.
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,

    /// Capacity of each session's outbound queue.
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            ping_interval_ms: default_ping_interval_ms(),
            max_message_bytes: default_max_message_bytes(),
            outbound_queue: default_outbound_queue(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if !(5000..=120000).contains(&self.ping_interval_ms) {
            return Err(WsRelayError::BadRequest(
                "gateway.ping_interval_ms must be between 5000 and 120000".into(),
            ));
        }
        if !(64..=16 * 1024 * 1024).contains(&self.max_message_bytes) {
            return Err(WsRelayError::BadRequest(
                "gateway.max_message_bytes must be between 64 and 16777216".into(),
            ));
        }
        if !(1..=65536).contains(&self.outbound_queue) {
            return Err(WsRelayError::BadRequest(
                "gateway.outbound_queue must be between 1 and 65536".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_ping_interval_ms() -> u64 {
    20000
}
fn default_max_message_bytes() -> usize {
    64 * 1024
}
fn default_outbound_queue() -> usize {
    1024
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    Lossy,
    Reliable,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RealtimeSection {
    #[serde(default = "default_delivery")]
    pub delivery: DeliveryMode,

    /// Per-recipient send window for `reliable`.
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,
}

impl Default for RealtimeSection {
    fn default() -> Self {
        Self {
            delivery: default_delivery(),
            send_timeout_ms: default_send_timeout_ms(),
        }
    }
}

impl RealtimeSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=60000).contains(&self.send_timeout_ms) {
            return Err(WsRelayError::BadRequest(
                "realtime.send_timeout_ms must be between 1 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn qos(&self) -> QoS {
        match self.delivery {
            DeliveryMode::Lossy => QoS::Lossy,
            DeliveryMode::Reliable => QoS::Reliable {
                timeout_ms: self.send_timeout_ms,
            },
        }
    }
}

fn default_delivery() -> DeliveryMode {
    DeliveryMode::Reliable
}
fn default_send_timeout_ms() -> u64 {
    1500
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourcesSection {
    #[serde(default = "default_page_limit")]
    pub default_page_limit: usize,

    #[serde(default = "default_max_page_limit")]
    pub max_page_limit: usize,
}

impl Default for ResourcesSection {
    fn default() -> Self {
        Self {
            default_page_limit: default_page_limit(),
            max_page_limit: default_max_page_limit(),
        }
    }
}

impl ResourcesSection {
    pub fn validate(&self) -> Result<()> {
        if self.max_page_limit == 0 {
            return Err(WsRelayError::BadRequest(
                "resources.max_page_limit must be positive".into(),
            ));
        }
        if self.default_page_limit == 0 || self.default_page_limit > self.max_page_limit {
            return Err(WsRelayError::BadRequest(
                "resources.default_page_limit must be between 1 and max_page_limit".into(),
            ));
        }
        Ok(())
    }
}

fn default_page_limit() -> usize {
    10
}
fn default_max_page_limit() -> usize {
    100
}
