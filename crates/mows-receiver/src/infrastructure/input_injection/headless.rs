//! Headless injector: an in-memory pointer and clipboard.
//!
//! Used when no OS injection backend is linked in.  Every injection is logged
//! at `debug` level so a receiver started with `RUST_LOG=debug` shows exactly
//! what a real backend would have done.

use std::collections::BTreeSet;
use std::sync::Mutex;

use mows_core::{KeyRef, MouseButton};
use tracing::debug;

use crate::application::dispatch::{InjectionError, InputInjector};

#[derive(Debug, Default)]
struct HeadlessState {
    pointer: (i32, i32),
    buttons: BTreeSet<&'static str>,
    keys_down: usize,
    clipboard: String,
}

/// In-memory [`InputInjector`] with no relative-motion primitive.
#[derive(Debug, Default)]
pub struct HeadlessInjector {
    state: Mutex<HeadlessState>,
}

impl HeadlessInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pointer position.
    pub fn pointer(&self) -> (i32, i32) {
        self.lock().pointer
    }

    /// Current clipboard text.
    pub fn clipboard(&self) -> String {
        self.lock().clipboard.clone()
    }

    /// Names of the buttons currently held down.
    pub fn pressed_buttons(&self) -> Vec<&'static str> {
        self.lock().buttons.iter().copied().collect()
    }

    /// Number of keys currently held down.
    pub fn keys_down(&self) -> usize {
        self.lock().keys_down
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HeadlessState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl InputInjector for HeadlessInjector {
    fn pointer_position(&self) -> Result<(i32, i32), InjectionError> {
        Ok(self.pointer())
    }

    fn move_pointer_to(&self, x: i32, y: i32) -> Result<(), InjectionError> {
        self.lock().pointer = (x, y);
        debug!("pointer -> ({x}, {y})");
        Ok(())
    }

    fn set_button(&self, button: MouseButton, pressed: bool) -> Result<(), InjectionError> {
        let mut state = self.lock();
        if pressed {
            state.buttons.insert(button.name());
        } else {
            state.buttons.remove(button.name());
        }
        debug!("button {} {}", button.name(), if pressed { "down" } else { "up" });
        Ok(())
    }

    fn scroll(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        debug!("scroll ({dx}, {dy})");
        Ok(())
    }

    fn set_key(&self, key: &KeyRef, pressed: bool) -> Result<(), InjectionError> {
        let mut state = self.lock();
        state.keys_down = if pressed {
            state.keys_down.saturating_add(1)
        } else {
            state.keys_down.saturating_sub(1)
        };
        debug!("key {key:?} {}", if pressed { "down" } else { "up" });
        Ok(())
    }

    fn read_clipboard(&self) -> Result<String, InjectionError> {
        Ok(self.clipboard())
    }

    fn write_clipboard(&self, text: &str) -> Result<(), InjectionError> {
        self.lock().clipboard = text.to_string();
        debug!("clipboard <- {} chars", text.chars().count());
        Ok(())
    }
}
