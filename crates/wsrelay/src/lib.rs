//! Top-level facade crate for wsRelay.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use wsrelay_core::*;
}

pub mod gateway {
    pub use wsrelay_gateway::*;
}
