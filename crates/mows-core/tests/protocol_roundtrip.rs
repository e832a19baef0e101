//! Integration tests for the mows-core protocol codec.
//!
//! These tests drive the public API the way a connection loop does: a stream
//! of wire texts, some of them broken, decoded one at a time.

use mows_core::{
    decode_event, decode_event_bytes, encode_event, keys, DecodeError, Event, KeyRef,
    MotionTracker, MouseButton,
};

/// Encodes an event and decodes it again.
fn roundtrip(event: &Event) -> Event {
    let text = encode_event(event).expect("encode must succeed");
    decode_event(&text).expect("decode must succeed")
}

#[test]
fn test_roundtrip_every_event_kind() {
    let events = vec![
        Event::MouseMove { dx: -7, dy: 12 },
        Event::MouseClick {
            button: MouseButton::Middle,
            pressed: true,
        },
        Event::MouseScroll { dx: 1, dy: -3 },
        Event::KeyPress {
            key: KeyRef::special("f5"),
        },
        Event::KeyRelease {
            key: KeyRef::char('é'),
        },
        Event::KeyPress { key: KeyRef::vk(0xB3) },
        Event::ClipboardPush {
            text: "line one\nline \"two\" ✓".to_string(),
        },
        Event::ClipboardPull,
        Event::ClipboardData {
            text: String::new(),
        },
    ];

    for event in &events {
        assert_eq!(&roundtrip(event), event);
    }
}

#[test]
fn test_decode_stream_skips_bad_messages_and_keeps_order() {
    // Arrange: what a receiver might read off one connection
    let wire = [
        r#"{"type":"mouse_move","dx":1,"dy":0}"#,
        "not json at all",
        r#"{"type":"warp","x":1}"#,
        r#"{"dx":1}"#,
        r#"{"type":"mouse_click","button":"left"}"#,
        r#"{"type":"key_press","key":{"kind":"char","char":"q"}}"#,
        r#"{"type":"mouse_move","dx":0,"dy":2}"#,
    ];

    // Act
    let mut decoded = Vec::new();
    let mut errors = Vec::new();
    for text in wire {
        match decode_event(text) {
            Ok(event) => decoded.push(event),
            Err(e) => errors.push(e),
        }
    }

    // Assert
    assert_eq!(
        decoded,
        vec![
            Event::MouseMove { dx: 1, dy: 0 },
            Event::KeyPress {
                key: KeyRef::char('q')
            },
            Event::MouseMove { dx: 0, dy: 2 },
        ]
    );
    assert_eq!(errors.len(), 4);
    assert!(matches!(errors[0], DecodeError::InvalidJson(_)));
    assert_eq!(errors[1], DecodeError::UnknownType("warp".to_string()));
    assert_eq!(errors[2], DecodeError::MissingType);
    assert!(matches!(errors[3], DecodeError::Malformed { .. }));
}

#[test]
fn test_unknown_button_survives_decoding() {
    let event = decode_event(r#"{"type":"mouse_click","button":"button9","pressed":true}"#)
        .expect("unknown button names still decode");
    assert_eq!(
        event,
        Event::MouseClick {
            button: MouseButton::Unknown,
            pressed: true
        }
    );
}

#[test]
fn test_binary_frame_payload_decodes_like_text() {
    let text = encode_event(&Event::ClipboardPull).unwrap();
    assert_eq!(decode_event_bytes(text.as_bytes()).unwrap(), Event::ClipboardPull);
}

#[test]
fn test_motion_tracker_feeds_codec() {
    // Arrange
    let samples = [(200, 200), (205, 198), (205, 198), (190, 210)];

    // Act
    let texts: Vec<String> = MotionTracker::deltas(&samples, false)
        .into_iter()
        .map(|(dx, dy)| encode_event(&Event::MouseMove { dx, dy }).unwrap())
        .collect();

    // Assert
    assert_eq!(
        texts,
        vec![
            r#"{"type":"mouse_move","dx":5,"dy":-2}"#.to_string(),
            r#"{"type":"mouse_move","dx":-15,"dy":12}"#.to_string(),
        ]
    );
}

#[test]
fn test_hotkey_names_encode_as_special_keys() {
    // Arrange
    let event = Event::KeyPress {
        key: KeyRef::special(keys::CTRL_LEFT),
    };

    // Act
    let text = encode_event(&event).unwrap();

    // Assert
    assert_eq!(
        text,
        r#"{"type":"key_press","key":{"kind":"special","name":"ctrl_l"}}"#
    );
    assert_eq!(roundtrip(&event), event);
    assert!(KeyRef::special(keys::CTRL_RIGHT).is_ctrl());
    assert!(!KeyRef::special(keys::ESC).is_ctrl());
}
