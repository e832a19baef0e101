//! Domain types for the receiver.

pub mod config;
