//! Domain types for the sender.

pub mod config;
