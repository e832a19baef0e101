//! Infrastructure layer for the sender.
//!
//! Contains OS-facing adapters: the input capture seam and the WebSocket
//! client.
//!
//! **Dependency rule**: this layer may depend on `application` and `mows_core`,
//! but MUST NOT be imported by the domain layer.

pub mod input_capture;
pub mod network;
