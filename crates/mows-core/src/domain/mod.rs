//! Domain logic for mows.
//!
//! This module contains pure computations with no infrastructure dependencies.
//! Nothing in here touches a socket, a capture hook, or an injection API, so
//! every rule can be exercised from a plain unit test.
//!
//! Code in outer layers (the sender's capture bridge, the receiver's
//! dispatcher) depends on the domain, but the domain never depends on them.

/// Pointer motion correction for both sides of a session.
///
/// See [`motion::MotionTracker`] and [`motion::TrackedPosition`].
pub mod motion;
