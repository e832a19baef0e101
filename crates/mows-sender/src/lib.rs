//! mows-sender library entry point.
//!
//! The sender turns local input into an ordered stream of [`mows_core::Event`]s
//! and writes it to a receiver over one WebSocket connection.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the `mows` binary share the same module tree.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::capture_bridge::{BridgeState, CaptureBridge, CaptureDirective, HeldCtrl};
pub use application::event_queue::{event_queue, EventQueue, EventQueueReceiver, Outbound, StopReason};
pub use application::session::{SenderSession, SessionError};
pub use domain::config::SenderConfig;
pub use infrastructure::input_capture::{CaptureError, InputSource, RawInputEvent};
pub use infrastructure::network::transport::{
    pull_clipboard, push_clipboard, SenderTransport, TransportError,
};
