//! # mows-core
//!
//! Shared library for mows ("mouse over WebSocket") containing the event
//! protocol, its JSON codec, and the motion-correction logic used on both ends
//! of a session.
//!
//! This crate is used by both the sender and the receiver.
//! It has zero dependencies on OS APIs or network sockets.
//!
//! # Architecture overview
//!
//! mows relays keyboard, pointer, and clipboard activity from one machine
//! (the "sender") to another (the "receiver").  The sender captures local
//! input, turns it into a stream of [`Event`]s, and writes one JSON text
//! message per event to a WebSocket.  The receiver decodes each message and
//! replays it through the operating system's input-injection API.
//!
//! This crate is the shared foundation.  It defines:
//!
//! - **`protocol`** – The event vocabulary and how it travels on the wire.
//!   Every message is a JSON object whose `"type"` field names the event kind.
//!
//! - **`domain`** – Pure motion arithmetic with no OS dependencies: the
//!   sender-side [`MotionTracker`] that turns absolute pointer samples into
//!   drift-free deltas, and the receiver-side [`TrackedPosition`] accumulator.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `mows_core::Event` instead of `mows_core::protocol::messages::Event`.
pub use domain::motion::{MotionTracker, TrackedPosition};
pub use protocol::codec::{decode_event, decode_event_bytes, encode_event, DecodeError, EncodeError};
pub use protocol::messages::{keys, Event, KeyRef, MouseButton};
pub use protocol::DEFAULT_PORT;
