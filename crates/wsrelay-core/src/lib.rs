//! wsRelay core: transport-agnostic identifiers, text protocol, and error types.
//!
//! This crate defines the wire-level strings and error surface shared by the
//! gateway and its tests. It carries no transport or runtime dependencies so
//! the notice formats can be reused by clients and tooling.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `WsRelayError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{DeliveryError, Result, WsRelayError};
