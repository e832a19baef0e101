//! Input capture infrastructure for the sender.
//!
//! A capture backend installs OS-level pointer and keyboard hooks on its own
//! thread and reports each callback as a [`RawInputEvent`] over a std `mpsc`
//! channel.  The hook callbacks never do any processing themselves; the
//! bridge driver thread consumes the channel.
//!
//! # Suppression
//!
//! When started with `suppress = true` the backend withholds the captured
//! input from the local OS.  The pointer is then frozen where it was, while
//! the callbacks keep reporting the position it *would* have moved to.
//!
//! # Testability
//!
//! The [`InputSource`] trait lets tests drive the sender with synthetic
//! callbacks through [`mock::MockInputSource`].  This build ships no OS
//! backend, so [`platform_source`] reports [`CaptureError::Unavailable`].

use std::sync::{mpsc, Arc};

use mows_core::{KeyRef, MouseButton};
use thiserror::Error;

pub mod mock;

/// One raw capture callback.
///
/// Pointer coordinates are absolute screen positions as reported by the
/// capture layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInputEvent {
    /// The pointer moved (or would have moved, when suppressed) to `(x, y)`.
    PointerMoved { x: i32, y: i32 },
    /// A pointer button changed state while the pointer was at `(x, y)`.
    ButtonChanged {
        x: i32,
        y: i32,
        button: MouseButton,
        pressed: bool,
    },
    /// The wheel turned by `(dx, dy)` steps while the pointer was at `(x, y)`.
    Scrolled { x: i32, y: i32, dx: i32, dy: i32 },
    /// A key went down.
    KeyPressed { key: KeyRef },
    /// A key came up.
    KeyReleased { key: KeyRef },
}

/// Error type for input capture operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    /// No capture backend exists (or the OS refused access).  Fatal at startup.
    #[error("input capture unavailable: {0}")]
    Unavailable(String),
    /// The backend exists but could not (re)install its hooks.
    #[error("failed to start input capture: {0}")]
    StartFailed(String),
}

/// Trait abstracting input event production.
///
/// A source can be started, stopped, and started again; the sender restarts it
/// on every pause/resume toggle to switch suppression on or off.
pub trait InputSource: Send + Sync {
    /// Installs the hooks and returns the channel the callbacks feed.
    fn start(&self, suppress: bool) -> Result<mpsc::Receiver<RawInputEvent>, CaptureError>;

    /// Removes the hooks.
    ///
    /// Must not return until no further callback can fire, and must close the
    /// channel returned by the matching `start`.  Stopping a stopped source is
    /// a no-op.
    fn stop(&self);
}

/// Returns the capture backend compiled into this build.
///
/// # Errors
///
/// Always returns [`CaptureError::Unavailable`]: OS hook backends are external
/// collaborators and none is linked in.
pub fn platform_source() -> Result<Arc<dyn InputSource>, CaptureError> {
    Err(CaptureError::Unavailable(format!(
        "no input capture backend is available on {}",
        std::env::consts::OS
    )))
}
