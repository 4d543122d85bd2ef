//! Protocol primitives shared by the gateway and its clients.
//!
//! - `types`: connection and client identifiers.
//! - `notice`: the human-readable text frames pushed to connected clients.
//!
//! Frames are plain UTF-8 text. Nothing here parses them back; clients are
//! expected to display them as-is.

pub mod notice;
pub mod types;

pub use notice::{Notice, ResourceKind};
pub use types::{ClientId, ConnId};
