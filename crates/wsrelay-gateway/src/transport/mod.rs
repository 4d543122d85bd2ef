//! Transport layer (WebSocket).
//!
//! Exposes the WS upgrade handler, the session loop, and the read-side codec
//! that turns every socket read into a relay/skip/close decision.

pub mod codec;
pub mod ws;
