//! Network infrastructure for the receiver.
//!
//! # Sub-modules
//!
//! - **`server`** – WebSocket accept loop with a single connection slot, and
//!   the per-connection read/dispatch/reply loop.

pub mod server;
