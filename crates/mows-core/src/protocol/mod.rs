//! Protocol module containing the event types and the JSON codec.

pub mod codec;
pub mod messages;

/// Port the receiver listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 8765;

pub use codec::{decode_event, decode_event_bytes, encode_event, DecodeError, EncodeError};
pub use messages::*;
