//! Infrastructure layer for the receiver.
//!
//! Contains OS-facing adapters: the injection capability implementations and
//! the WebSocket server.
//!
//! **Dependency rule**: this layer may depend on `application` and `mows_core`,
//! but MUST NOT be imported by the `application` or domain layers.

pub mod input_injection;
pub mod network;
