//! wsRelay gateway library entry.
//!
//! This crate wires the WebSocket transport, the connection registry, the
//! resource CRUD routes and the ops endpoints into one axum application. It
//! is consumed by the binary (`main.rs`) and by integration tests.

pub mod api_error;
pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod realtime;
pub mod resources;
pub mod router;
pub mod transport;
