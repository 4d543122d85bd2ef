//! Relay config loader (strict parsing).

pub mod schema;

use std::fs;

use wsrelay_core::error::{Result, WsRelayError};

pub use schema::{DeliveryMode, GatewaySection, RealtimeSection, RelayConfig, ResourcesSection};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "WSRELAY_CONFIG";
/// Config path used when `WSRELAY_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "wsrelay.yaml";

pub fn config_path() -> String {
    std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

pub fn load_from_file(path: &str) -> Result<RelayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| WsRelayError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<RelayConfig> {
    let cfg: RelayConfig = serde_yaml::from_str(s)
        .map_err(|e| WsRelayError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
