//! Recording injector for tests.
//!
//! Every call is pushed onto one `Mutex<Vec<Injected>>` so tests can assert on
//! exactly what was injected and in what order.  The clipboard is kept in
//! memory, and the pointer position reported to the dispatcher is fixed at
//! construction.
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` to make every input call (not the clipboard)
//! return [`InjectionError::Platform`].

use std::sync::Mutex;

use mows_core::{KeyRef, MouseButton};

use crate::application::dispatch::{InjectionError, InputInjector, MotionInjector};

/// One recorded injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injected {
    MoveBy(i32, i32),
    MoveTo(i32, i32),
    Button(MouseButton, bool),
    Scroll(i32, i32),
    Key(KeyRef, bool),
    ClipboardWrite(String),
}

/// A mock injector that records all calls without touching the OS.
#[derive(Default)]
pub struct MockInjector {
    pub calls: Mutex<Vec<Injected>>,
    pub clipboard: Mutex<String>,
    /// Reported by `pointer_position`.
    pub pointer: (i32, i32),
    pub should_fail: bool,
}

impl MockInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose live pointer sits at `(x, y)`.
    pub fn with_pointer(x: i32, y: i32) -> Self {
        Self {
            pointer: (x, y),
            ..Self::default()
        }
    }

    /// A snapshot of every recorded call.
    pub fn calls(&self) -> Vec<Injected> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    /// Current clipboard text.
    pub fn clipboard_text(&self) -> String {
        self.clipboard.lock().expect("lock poisoned").clone()
    }

    fn record(&self, call: Injected) -> Result<(), InjectionError> {
        if self.should_fail {
            return Err(InjectionError::Platform("injected failure".to_string()));
        }
        self.calls.lock().expect("lock poisoned").push(call);
        Ok(())
    }
}

impl InputInjector for MockInjector {
    fn pointer_position(&self) -> Result<(i32, i32), InjectionError> {
        Ok(self.pointer)
    }

    fn move_pointer_to(&self, x: i32, y: i32) -> Result<(), InjectionError> {
        self.record(Injected::MoveTo(x, y))
    }

    fn set_button(&self, button: MouseButton, pressed: bool) -> Result<(), InjectionError> {
        self.record(Injected::Button(button, pressed))
    }

    fn scroll(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        self.record(Injected::Scroll(dx, dy))
    }

    fn set_key(&self, key: &KeyRef, pressed: bool) -> Result<(), InjectionError> {
        self.record(Injected::Key(key.clone(), pressed))
    }

    fn read_clipboard(&self) -> Result<String, InjectionError> {
        Ok(self.clipboard_text())
    }

    fn write_clipboard(&self, text: &str) -> Result<(), InjectionError> {
        *self.clipboard.lock().expect("lock poisoned") = text.to_string();
        self.calls
            .lock()
            .expect("lock poisoned")
            .push(Injected::ClipboardWrite(text.to_string()));
        Ok(())
    }
}

impl MotionInjector for MockInjector {
    fn move_pointer_by(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        self.record(Injected::MoveBy(dx, dy))
    }
}
