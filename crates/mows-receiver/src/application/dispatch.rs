//! Dispatcher: applies received events through the injection capability.
//!
//! The dispatcher delegates every OS effect to an [`InputInjector`] trait
//! object.  Platform implementations live in the infrastructure layer.
//!
//! # Pointer motion
//!
//! Events carry relative motion.  When the platform offers a relative-motion
//! primitive ([`MotionInjector`]) the delta is passed straight through and the
//! OS cursor is never read back.  Otherwise the dispatcher keeps a
//! [`TrackedPosition`] seeded once from the live pointer and issues absolute
//! moves from it, so OS rounding under display scaling never feeds back into
//! the next move.

use std::sync::Arc;

use mows_core::{Event, KeyRef, MouseButton, TrackedPosition};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Error type for injection operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InjectionError {
    #[error("platform error: {0}")]
    Platform(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Error returned when one event could not be applied.
///
/// Callers log it and keep going; it never ends a connection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to apply {kind}: {source}")]
pub struct DispatchError {
    /// Wire name of the event that failed.
    pub kind: &'static str,
    #[source]
    pub source: InjectionError,
}

/// OS input and clipboard injection capability.
#[cfg_attr(test, mockall::automock)]
pub trait InputInjector: Send + Sync {
    /// Reads the current pointer position.
    fn pointer_position(&self) -> Result<(i32, i32), InjectionError>;

    /// Moves the pointer to an absolute position.
    fn move_pointer_to(&self, x: i32, y: i32) -> Result<(), InjectionError>;

    /// Presses or releases a pointer button.
    fn set_button(&self, button: MouseButton, pressed: bool) -> Result<(), InjectionError>;

    /// Turns the wheel by `(dx, dy)` steps.
    fn scroll(&self, dx: i32, dy: i32) -> Result<(), InjectionError>;

    /// Presses or releases a key.
    fn set_key(&self, key: &KeyRef, pressed: bool) -> Result<(), InjectionError>;

    /// Reads the clipboard text.
    fn read_clipboard(&self) -> Result<String, InjectionError>;

    /// Replaces the clipboard text.
    fn write_clipboard(&self, text: &str) -> Result<(), InjectionError>;
}

/// Relative pointer motion that does not read the cursor back.
pub trait MotionInjector: Send + Sync {
    fn move_pointer_by(&self, dx: i32, dy: i32) -> Result<(), InjectionError>;
}

enum MotionStrategy {
    Relative(Arc<dyn MotionInjector>),
    Absolute(TrackedPosition),
}

/// Per-connection event dispatcher.
pub struct Dispatcher {
    input: Arc<dyn InputInjector>,
    motion: MotionStrategy,
}

impl Dispatcher {
    /// Creates a dispatcher for one connection.
    ///
    /// Without a `relative` injector the absolute accumulator is seeded from
    /// the live pointer position; if that cannot be read it starts at `(0, 0)`.
    pub fn new(input: Arc<dyn InputInjector>, relative: Option<Arc<dyn MotionInjector>>) -> Self {
        let motion = match relative {
            Some(relative) => MotionStrategy::Relative(relative),
            None => {
                let (x, y) = input.pointer_position().unwrap_or_else(|e| {
                    warn!("cannot read pointer position ({e}); tracking from (0, 0)");
                    (0, 0)
                });
                debug!("tracking absolute pointer position from ({x}, {y})");
                MotionStrategy::Absolute(TrackedPosition::new(x, y))
            }
        };
        Self { input, motion }
    }

    /// Returns `true` if motion goes through the relative primitive.
    pub fn uses_relative_motion(&self) -> bool {
        matches!(self.motion, MotionStrategy::Relative(_))
    }

    /// The accumulated absolute position, in absolute mode.
    pub fn tracked_position(&self) -> Option<(i32, i32)> {
        match &self.motion {
            MotionStrategy::Relative(_) => None,
            MotionStrategy::Absolute(pos) => Some(pos.current()),
        }
    }

    /// Applies one event.
    ///
    /// Returns the reply to send back, if the event expects one.  A
    /// `clipboard_pull` always gets exactly one `clipboard_data` reply; if the
    /// clipboard cannot be read the reply carries empty text.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] if the injection capability fails.
    pub fn dispatch(&mut self, event: Event) -> Result<Option<Event>, DispatchError> {
        let kind = event.type_name();
        let wrap = |source| DispatchError { kind, source };

        match event {
            Event::MouseMove { dx, dy } => self.move_pointer(dx, dy).map_err(wrap)?,
            Event::MouseClick { button, pressed } => {
                if button == MouseButton::Unknown {
                    return Err(wrap(InjectionError::Unsupported(
                        "unknown mouse button".to_string(),
                    )));
                }
                self.input.set_button(button, pressed).map_err(wrap)?
            }
            Event::MouseScroll { dx, dy } => self.input.scroll(dx, dy).map_err(wrap)?,
            Event::KeyPress { key } => self.input.set_key(&key, true).map_err(wrap)?,
            Event::KeyRelease { key } => self.input.set_key(&key, false).map_err(wrap)?,
            Event::ClipboardPush { text } => {
                self.input.write_clipboard(&text).map_err(wrap)?;
                info!("clipboard updated from sender ({} chars)", text.chars().count());
            }
            Event::ClipboardPull => {
                let text = self.input.read_clipboard().unwrap_or_else(|e| {
                    warn!("cannot read clipboard ({e}); replying with empty text");
                    String::new()
                });
                info!("clipboard sent to sender ({} chars)", text.chars().count());
                return Ok(Some(Event::ClipboardData { text }));
            }
            Event::ClipboardData { .. } => {
                debug!("ignoring clipboard_data sent to the receiver");
            }
        }
        Ok(None)
    }

    fn move_pointer(&mut self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        match &mut self.motion {
            MotionStrategy::Relative(relative) => relative.move_pointer_by(dx, dy),
            MotionStrategy::Absolute(pos) => {
                // Advance first: a failed move must not desync later ones.
                let (x, y) = pos.apply(dx, dy);
                self.input.move_pointer_to(x, y)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
