//! Realtime core components for the relay runtime.
//!
//! Connection handles, the connection registry, and the per-recipient
//! delivery primitive shared by unicast and broadcast.

mod connection;
mod connection_registry;
mod delivery;

pub use connection::Connection;
pub use connection_registry::ConnectionRegistry;
