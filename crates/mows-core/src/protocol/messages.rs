//! All mows protocol event types.
//!
//! Every event travels as one JSON object.  The `"type"` field names the event
//! kind and the remaining fields are flattened into the same object:
//!
//! ```json
//! {"type":"mouse_move","dx":3,"dy":-1}
//! {"type":"key_press","key":{"kind":"special","name":"ctrl_l"}}
//! {"type":"clipboard_pull"}
//! ```
//!
//! Serde's `#[serde(tag = "type")]` attribute handles the discriminant, so
//! decoding maps the wire name straight onto an enum variant.

use serde::{Deserialize, Serialize};

// ── Well-known special key names ──────────────────────────────────────────────

/// Names of the [`KeyRef::Special`] keys that drive the sender's hotkeys.
///
/// These match the names produced by the capture layer for the physical keys.
pub mod keys {
    /// Left control key.
    pub const CTRL_LEFT: &str = "ctrl_l";
    /// Right control key.
    pub const CTRL_RIGHT: &str = "ctrl_r";
    /// Tab: pressed with a control key it toggles pause/resume.
    pub const TAB: &str = "tab";
    /// Escape: pressed with a control key it stops the sender.
    pub const ESC: &str = "esc";
}

// ── Key reference ─────────────────────────────────────────────────────────────

/// A captured key, in the most specific form the capture layer could name it.
///
/// # Serde representation
///
/// ```json
/// {"kind":"special","name":"esc"}
/// {"kind":"char","char":"a"}
/// {"kind":"vk","vk":65}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyRef {
    /// A named non-printable key (escape, control, tab, function keys, ...).
    Special {
        /// Capture-layer key name, e.g. `"ctrl_l"`.
        name: String,
    },
    /// A key that produced a printable character.
    Char {
        /// The character as typed.
        #[serde(rename = "char")]
        value: char,
    },
    /// A platform key code with no character mapping.
    #[serde(rename = "vk")]
    VirtualCode {
        /// Platform virtual-key code.
        #[serde(rename = "vk")]
        code: u32,
    },
}

impl KeyRef {
    /// Builds a [`KeyRef::Special`] from a key name.
    pub fn special(name: impl Into<String>) -> Self {
        KeyRef::Special { name: name.into() }
    }

    /// Builds a [`KeyRef::Char`].
    pub fn char(value: char) -> Self {
        KeyRef::Char { value }
    }

    /// Builds a [`KeyRef::VirtualCode`].
    pub fn vk(code: u32) -> Self {
        KeyRef::VirtualCode { code }
    }

    /// Returns `true` if this is the special key called `name`.
    pub fn is_special(&self, name: &str) -> bool {
        matches!(self, KeyRef::Special { name: n } if n == name)
    }

    /// Returns `true` for either control key.
    pub fn is_ctrl(&self) -> bool {
        self.is_special(keys::CTRL_LEFT) || self.is_special(keys::CTRL_RIGHT)
    }
}

// ── Mouse buttons ─────────────────────────────────────────────────────────────

/// Mouse button identifier, carried on the wire as its lowercase name.
///
/// Names the receiver does not know (`"button8"`, `"scroll_up"`, ...) decode
/// to [`MouseButton::Unknown`] rather than failing the whole message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    X1,
    X2,
    #[serde(other)]
    Unknown,
}

impl MouseButton {
    /// The wire name of this button.
    pub fn name(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
            MouseButton::X1 => "x1",
            MouseButton::X2 => "x2",
            MouseButton::Unknown => "unknown",
        }
    }
}

// ── Top-level event enum ──────────────────────────────────────────────────────

/// All valid mows messages, discriminated by the `"type"` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Relative pointer motion since the last reported position.
    MouseMove { dx: i32, dy: i32 },
    /// A pointer button changed state.
    MouseClick { button: MouseButton, pressed: bool },
    /// Wheel motion in scroll steps (positive `dy` = away from the user).
    MouseScroll { dx: i32, dy: i32 },
    /// A key went down.
    KeyPress { key: KeyRef },
    /// A key came up.
    KeyRelease { key: KeyRef },
    /// Replace the receiver's clipboard text.  No reply.
    ClipboardPush { text: String },
    /// Ask the receiver for its clipboard text.
    ClipboardPull,
    /// Reply to [`Event::ClipboardPull`].
    ClipboardData { text: String },
}

impl Event {
    /// Every wire discriminant the codec accepts.
    pub const TYPE_NAMES: [&'static str; 8] = [
        "mouse_move",
        "mouse_click",
        "mouse_scroll",
        "key_press",
        "key_release",
        "clipboard_push",
        "clipboard_pull",
        "clipboard_data",
    ];

    /// Returns the wire discriminant for this event.
    pub fn type_name(&self) -> &'static str {
        match self {
            Event::MouseMove { .. } => "mouse_move",
            Event::MouseClick { .. } => "mouse_click",
            Event::MouseScroll { .. } => "mouse_scroll",
            Event::KeyPress { .. } => "key_press",
            Event::KeyRelease { .. } => "key_release",
            Event::ClipboardPush { .. } => "clipboard_push",
            Event::ClipboardPull => "clipboard_pull",
            Event::ClipboardData { .. } => "clipboard_data",
        }
    }

    /// Convenience constructor for a key release.
    pub fn release(key: KeyRef) -> Self {
        Event::KeyRelease { key }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_move_serializes_with_snake_case_type() {
        // Arrange
        let event = Event::MouseMove { dx: 3, dy: -1 };

        // Act
        let json = serde_json::to_string(&event).unwrap();

        // Assert
        assert_eq!(json, r#"{"type":"mouse_move","dx":3,"dy":-1}"#);
    }

    #[test]
    fn test_clipboard_pull_serializes_without_fields() {
        let json = serde_json::to_string(&Event::ClipboardPull).unwrap();
        assert_eq!(json, r#"{"type":"clipboard_pull"}"#);
    }

    #[test]
    fn test_key_ref_variants_use_wire_field_names() {
        // Arrange / Act
        let special = serde_json::to_string(&KeyRef::special("esc")).unwrap();
        let ch = serde_json::to_string(&KeyRef::char('a')).unwrap();
        let vk = serde_json::to_string(&KeyRef::vk(65)).unwrap();

        // Assert
        assert_eq!(special, r#"{"kind":"special","name":"esc"}"#);
        assert_eq!(ch, r#"{"kind":"char","char":"a"}"#);
        assert_eq!(vk, r#"{"kind":"vk","vk":65}"#);
    }

    #[test]
    fn test_unknown_button_name_decodes_to_unknown() {
        let button: MouseButton = serde_json::from_str(r#""button8""#).unwrap();
        assert_eq!(button, MouseButton::Unknown);
    }

    #[test]
    fn test_button_name_matches_serde_name() {
        for button in [
            MouseButton::Left,
            MouseButton::Right,
            MouseButton::Middle,
            MouseButton::X1,
            MouseButton::X2,
        ] {
            let json = serde_json::to_string(&button).unwrap();
            assert_eq!(json, format!("\"{}\"", button.name()));
        }
    }

    #[test]
    fn test_is_ctrl_recognises_both_sides() {
        assert!(KeyRef::special(keys::CTRL_LEFT).is_ctrl());
        assert!(KeyRef::special(keys::CTRL_RIGHT).is_ctrl());
        assert!(!KeyRef::special(keys::TAB).is_ctrl());
        assert!(!KeyRef::char('c').is_ctrl());
    }

    #[test]
    fn test_type_name_is_listed_in_type_names() {
        let events = [
            Event::MouseMove { dx: 0, dy: 0 },
            Event::MouseClick { button: MouseButton::Left, pressed: true },
            Event::MouseScroll { dx: 0, dy: 1 },
            Event::KeyPress { key: KeyRef::char('x') },
            Event::KeyRelease { key: KeyRef::char('x') },
            Event::ClipboardPush { text: String::new() },
            Event::ClipboardPull,
            Event::ClipboardData { text: String::new() },
        ];
        for event in events {
            assert!(Event::TYPE_NAMES.contains(&event.type_name()));
        }
    }
}
