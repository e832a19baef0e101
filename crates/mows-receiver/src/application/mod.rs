//! Application layer use cases for the receiver.
//!
//! # Sub-modules
//!
//! - **`dispatch`** – Applies decoded events through the injection capability
//!   traits, keeping the absolute pointer accumulator when no relative-motion
//!   primitive exists.  Contains no OS calls and no network I/O.

pub mod dispatch;
