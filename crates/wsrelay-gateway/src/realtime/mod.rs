//! Realtime runtime (egress engine) for the relay.
//!
//! ConnectionRegistry + QoS-based unicast/broadcast helpers.

pub mod core;
pub mod types;

pub use self::core::{Connection, ConnectionRegistry};
pub use types::{BroadcastReport, PreparedText, QoS};
