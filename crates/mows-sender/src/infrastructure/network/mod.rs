//! Network infrastructure for the sender.
//!
//! # Sub-modules
//!
//! - **`transport`** – The WebSocket client: drains the event queue onto the
//!   connection in FIFO order and hands inbound `clipboard_data` back to the
//!   caller.  Also provides the one-shot clipboard push/pull helpers.

pub mod transport;
