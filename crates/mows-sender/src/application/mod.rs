//! Application layer use cases for the sender.
//!
//! # What is the "application" layer? (for beginners)
//!
//! The application layer sits between the domain types in `mows-core` and the
//! infrastructure (OS capture hooks, sockets).  Code here decides *what* to do
//! with each captured input callback; it never talks to the OS or the network
//! directly.
//!
//! # Sub-modules
//!
//! - **`event_queue`**    – The single ordered hand-off between the capture
//!   thread and the transport task.
//!
//! - **`capture_bridge`** – Turns raw capture callbacks into protocol events
//!   and runs the Ctrl+Tab / Ctrl+Esc hotkey state machine.  Runs on every
//!   keystroke and pointer sample.
//!
//! - **`session`**        – Owns one run of the sender: starts capture, drives
//!   the bridge on its own thread, connects, and tears everything down.

pub mod capture_bridge;
pub mod event_queue;
pub mod session;
