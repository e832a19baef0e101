//! CaptureBridge: turns raw capture callbacks into the outbound event stream.
//!
//! This is the heart of the sender.  Every callback from the capture thread
//! goes through [`CaptureBridge::handle`], which:
//!
//! 1. Tracks which control keys are held.
//! 2. Evaluates the hotkeys *before* anything is queued:
//!    - **Ctrl+Tab** toggles `Active ⇄ Paused` and asks the caller to restart
//!      capture with the suppression setting of the new state.
//!    - **Ctrl+Esc** queues the terminal sentinel and asks the caller to stop.
//! 3. Translates everything else into an [`Event`] and queues it, but only
//!    while `Active`.  Paused callbacks are observed for hotkeys and dropped.
//!
//! When a hotkey fires while `Active`, the receiver has already seen the
//! control key go down.  The bridge first queues releases for the trigger key
//! and for every control key still held, so nothing stays stuck down on the
//! remote side.
//!
//! # Architecture
//!
//! The bridge owns no thread and does no I/O.  It writes to an [`EventQueue`]
//! and returns a [`CaptureDirective`]; the session acts on the directive.

use mows_core::{keys, Event, KeyRef, MotionTracker};
use tracing::{debug, info, warn};

use crate::application::event_queue::{EventQueue, StopReason};
use crate::infrastructure::input_capture::RawInputEvent;

/// Whether captured input is currently streamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BridgeState {
    /// Input is forwarded to the receiver.
    #[default]
    Active,
    /// Input stays local; only hotkeys are watched.
    Paused,
}

/// Which control keys are currently held, tracked per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldCtrl {
    pub left: bool,
    pub right: bool,
}

impl HeldCtrl {
    /// Returns `true` while either control key is down.
    pub fn any(&self) -> bool {
        self.left || self.right
    }

    /// Every held control key, left first.
    pub fn keys(&self) -> Vec<KeyRef> {
        let mut held = Vec::with_capacity(2);
        if self.left {
            held.push(KeyRef::special(keys::CTRL_LEFT));
        }
        if self.right {
            held.push(KeyRef::special(keys::CTRL_RIGHT));
        }
        held
    }

    fn set(&mut self, key: &KeyRef, down: bool) {
        if key.is_special(keys::CTRL_LEFT) {
            self.left = down;
        } else if key.is_special(keys::CTRL_RIGHT) {
            self.right = down;
        }
    }
}

/// What the caller must do with the capture backend after a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureDirective {
    /// Keep going.
    Continue,
    /// Stop the backend, then start it again with this suppression flag.
    Restart { suppress: bool },
    /// Stop the backend for good.
    Stop,
}

/// The capture-side session state machine.
pub struct CaptureBridge {
    state: BridgeState,
    held: HeldCtrl,
    tracker: MotionTracker,
    /// Suppression requested by the operator; applies while `Active`.
    suppress: bool,
    stopped: bool,
    queue: EventQueue,
}

impl CaptureBridge {
    /// Creates an `Active` bridge writing to `queue`.
    pub fn new(queue: EventQueue, suppress: bool) -> Self {
        Self {
            state: BridgeState::Active,
            held: HeldCtrl::default(),
            tracker: MotionTracker::new(suppress),
            suppress,
            stopped: false,
            queue,
        }
    }

    /// Returns the current streaming state.
    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Returns which control keys are held.
    pub fn held_ctrl(&self) -> HeldCtrl {
        self.held
    }

    /// Position pointer deltas are measured from, if known.
    pub fn last_known_position(&self) -> Option<(i32, i32)> {
        self.tracker.last_known()
    }

    /// Returns `true` once the sentinel has been queued.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Suppression flag the capture backend must run with in the current state.
    pub fn capture_suppression(&self) -> bool {
        match self.state {
            BridgeState::Active => self.suppress,
            BridgeState::Paused => false,
        }
    }

    /// Handles one raw capture callback.
    pub fn handle(&mut self, raw: RawInputEvent) -> CaptureDirective {
        if self.stopped {
            return CaptureDirective::Stop;
        }

        match raw {
            RawInputEvent::KeyPressed { key } => self.key_pressed(key),
            RawInputEvent::KeyReleased { key } => {
                self.held.set(&key, false);
                self.forward(Event::KeyRelease { key });
                CaptureDirective::Continue
            }
            RawInputEvent::PointerMoved { x, y } => {
                if self.state == BridgeState::Active {
                    if let Some((dx, dy)) = self.tracker.observe(x, y) {
                        self.forward(Event::MouseMove { dx, dy });
                    }
                }
                CaptureDirective::Continue
            }
            RawInputEvent::ButtonChanged {
                x,
                y,
                button,
                pressed,
            } => {
                if self.state == BridgeState::Active {
                    self.tracker.anchor_at(x, y);
                    self.forward(Event::MouseClick { button, pressed });
                }
                CaptureDirective::Continue
            }
            RawInputEvent::Scrolled { x, y, dx, dy } => {
                if self.state == BridgeState::Active {
                    self.tracker.anchor_at(x, y);
                    self.forward(Event::MouseScroll { dx, dy });
                }
                CaptureDirective::Continue
            }
        }
    }

    /// Ends the session because the capture backend could not be restarted.
    pub fn capture_lost(&mut self) {
        if self.stopped {
            return;
        }
        warn!("input capture lost; ending session");
        self.release_held_keys(None);
        self.stopped = true;
        self.queue.stop(StopReason::CaptureLost);
    }

    // ── Private handlers ──────────────────────────────────────────────────────

    fn key_pressed(&mut self, key: KeyRef) -> CaptureDirective {
        if key.is_ctrl() {
            self.held.set(&key, true);
            self.forward(Event::KeyPress { key });
            return CaptureDirective::Continue;
        }

        if self.held.any() {
            if key.is_special(keys::TAB) {
                return self.toggle(key);
            }
            if key.is_special(keys::ESC) {
                return self.stop(key);
            }
        }

        self.forward(Event::KeyPress { key });
        CaptureDirective::Continue
    }

    fn toggle(&mut self, trigger: KeyRef) -> CaptureDirective {
        self.release_held_keys(Some(trigger));

        self.state = match self.state {
            BridgeState::Active => BridgeState::Paused,
            BridgeState::Paused => BridgeState::Active,
        };
        self.held = HeldCtrl::default();
        let suppress = self.capture_suppression();
        self.tracker.set_suppressed(suppress);

        match self.state {
            BridgeState::Active => info!("resumed streaming (suppress: {suppress})"),
            BridgeState::Paused => info!("paused streaming; press Ctrl+Tab to resume"),
        }
        CaptureDirective::Restart { suppress }
    }

    fn stop(&mut self, trigger: KeyRef) -> CaptureDirective {
        self.release_held_keys(Some(trigger));
        self.held = HeldCtrl::default();
        self.stopped = true;
        self.queue.stop(StopReason::Hotkey);
        info!("stop hotkey pressed");
        CaptureDirective::Stop
    }

    /// Queues releases for `trigger` and every held control key, if `Active`.
    fn release_held_keys(&mut self, trigger: Option<KeyRef>) {
        if self.state != BridgeState::Active {
            return;
        }
        for key in trigger.into_iter().chain(self.held.keys()) {
            self.forward(Event::release(key));
        }
    }

    fn forward(&self, event: Event) {
        if self.state != BridgeState::Active {
            return;
        }
        debug!(kind = event.type_name(), "queueing event");
        if !self.queue.push(event) {
            debug!("event queue closed; dropping event");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::event_queue::{event_queue, EventQueueReceiver, Outbound};
    use mows_core::MouseButton;

    fn make_bridge(suppress: bool) -> (CaptureBridge, EventQueueReceiver) {
        let (queue, rx) = event_queue();
        (CaptureBridge::new(queue, suppress), rx)
    }

    fn press(key: KeyRef) -> RawInputEvent {
        RawInputEvent::KeyPressed { key }
    }

    fn release(key: KeyRef) -> RawInputEvent {
        RawInputEvent::KeyReleased { key }
    }

    fn ctrl_l() -> KeyRef {
        KeyRef::special(keys::CTRL_LEFT)
    }

    fn ctrl_r() -> KeyRef {
        KeyRef::special(keys::CTRL_RIGHT)
    }

    fn moved(x: i32, y: i32) -> RawInputEvent {
        RawInputEvent::PointerMoved { x, y }
    }

    // ── Forwarding ────────────────────────────────────────────────────────────

    #[test]
    fn test_active_bridge_forwards_keys_and_motion() {
        // Arrange
        let (mut bridge, mut rx) = make_bridge(false);

        // Act
        bridge.handle(press(KeyRef::char('a')));
        bridge.handle(moved(10, 10));
        bridge.handle(moved(12, 7));
        bridge.handle(release(KeyRef::char('a')));

        // Assert
        assert_eq!(
            rx.drain(),
            vec![
                Outbound::Event(Event::KeyPress {
                    key: KeyRef::char('a')
                }),
                Outbound::Event(Event::MouseMove { dx: 2, dy: -3 }),
                Outbound::Event(Event::KeyRelease {
                    key: KeyRef::char('a')
                }),
            ]
        );
    }

    #[test]
    fn test_click_reanchors_motion_when_not_suppressed() {
        // Arrange
        let (mut bridge, mut rx) = make_bridge(false);
        bridge.handle(moved(0, 0));

        // Act
        bridge.handle(RawInputEvent::ButtonChanged {
            x: 50,
            y: 50,
            button: MouseButton::Left,
            pressed: true,
        });
        bridge.handle(moved(51, 50));

        // Assert
        assert_eq!(
            rx.drain(),
            vec![
                Outbound::Event(Event::MouseClick {
                    button: MouseButton::Left,
                    pressed: true
                }),
                Outbound::Event(Event::MouseMove { dx: 1, dy: 0 }),
            ]
        );
    }

    #[test]
    fn test_suppressed_motion_is_measured_from_pinned_origin() {
        // Arrange
        let (mut bridge, mut rx) = make_bridge(true);

        // Act
        bridge.handle(moved(100, 100));
        bridge.handle(moved(103, 101));
        bridge.handle(moved(103, 105));

        // Assert
        assert_eq!(
            rx.drain(),
            vec![
                Outbound::Event(Event::MouseMove { dx: 3, dy: 1 }),
                Outbound::Event(Event::MouseMove { dx: 0, dy: 4 }),
            ]
        );
        assert_eq!(bridge.last_known_position(), Some((100, 100)));
    }

    #[test]
    fn test_scroll_is_forwarded_with_wheel_steps() {
        let (mut bridge, mut rx) = make_bridge(false);
        bridge.handle(RawInputEvent::Scrolled {
            x: 1,
            y: 1,
            dx: 0,
            dy: -1,
        });
        assert_eq!(
            rx.drain(),
            vec![Outbound::Event(Event::MouseScroll { dx: 0, dy: -1 })]
        );
    }

    // ── Stop hotkey ───────────────────────────────────────────────────────────

    #[test]
    fn test_ctrl_esc_releases_both_keys_before_sentinel() {
        // Arrange
        let (mut bridge, mut rx) = make_bridge(false);

        // Act
        bridge.handle(press(ctrl_l()));
        let directive = bridge.handle(press(KeyRef::special(keys::ESC)));
        bridge.handle(press(KeyRef::char('z')));
        bridge.handle(moved(1, 1));

        // Assert
        assert_eq!(directive, CaptureDirective::Stop);
        assert!(bridge.is_stopped());
        assert_eq!(
            rx.drain(),
            vec![
                Outbound::Event(Event::KeyPress { key: ctrl_l() }),
                Outbound::Event(Event::release(KeyRef::special(keys::ESC))),
                Outbound::Event(Event::release(ctrl_l())),
                Outbound::Stop(StopReason::Hotkey),
            ]
        );
    }

    #[test]
    fn test_ctrl_esc_releases_every_held_ctrl_side() {
        // Arrange
        let (mut bridge, mut rx) = make_bridge(false);
        bridge.handle(press(ctrl_l()));
        bridge.handle(press(ctrl_r()));
        rx.drain();

        // Act
        let directive = bridge.handle(press(KeyRef::special(keys::ESC)));

        // Assert
        assert_eq!(directive, CaptureDirective::Stop);
        assert_eq!(
            rx.drain(),
            vec![
                Outbound::Event(Event::release(KeyRef::special(keys::ESC))),
                Outbound::Event(Event::release(ctrl_l())),
                Outbound::Event(Event::release(ctrl_r())),
                Outbound::Stop(StopReason::Hotkey),
            ]
        );
    }

    #[test]
    fn test_releasing_one_ctrl_side_keeps_hotkey_armed() {
        // Arrange
        let (mut bridge, mut rx) = make_bridge(false);
        bridge.handle(press(ctrl_l()));
        bridge.handle(press(ctrl_r()));
        bridge.handle(release(ctrl_r()));
        rx.drain();
        assert_eq!(
            bridge.held_ctrl(),
            HeldCtrl {
                left: true,
                right: false
            }
        );

        // Act
        let directive = bridge.handle(press(KeyRef::special(keys::ESC)));

        // Assert
        assert_eq!(directive, CaptureDirective::Stop);
        assert_eq!(
            rx.drain(),
            vec![
                Outbound::Event(Event::release(KeyRef::special(keys::ESC))),
                Outbound::Event(Event::release(ctrl_l())),
                Outbound::Stop(StopReason::Hotkey),
            ]
        );
    }

    #[test]
    fn test_esc_without_ctrl_is_forwarded() {
        let (mut bridge, mut rx) = make_bridge(false);
        let directive = bridge.handle(press(KeyRef::special(keys::ESC)));
        assert_eq!(directive, CaptureDirective::Continue);
        assert_eq!(
            rx.drain(),
            vec![Outbound::Event(Event::KeyPress {
                key: KeyRef::special(keys::ESC)
            })]
        );
    }

    #[test]
    fn test_ctrl_released_before_esc_does_not_stop() {
        let (mut bridge, _rx) = make_bridge(false);
        bridge.handle(press(ctrl_l()));
        bridge.handle(release(ctrl_l()));
        assert!(!bridge.held_ctrl().any());
        assert_eq!(
            bridge.handle(press(KeyRef::special(keys::ESC))),
            CaptureDirective::Continue
        );
    }

    #[test]
    fn test_stop_while_paused_queues_only_sentinel() {
        // Arrange
        let (mut bridge, mut rx) = make_bridge(false);
        bridge.handle(press(ctrl_l()));
        bridge.handle(press(KeyRef::special(keys::TAB)));
        rx.drain();

        // Act
        bridge.handle(press(KeyRef::special(keys::CTRL_RIGHT)));
        let directive = bridge.handle(press(KeyRef::special(keys::ESC)));

        // Assert
        assert_eq!(directive, CaptureDirective::Stop);
        assert_eq!(rx.drain(), vec![Outbound::Stop(StopReason::Hotkey)]);
    }

    // ── Pause / resume ────────────────────────────────────────────────────────

    #[test]
    fn test_ctrl_tab_pauses_after_releasing_keys() {
        // Arrange
        let (mut bridge, mut rx) = make_bridge(true);
        bridge.handle(moved(5, 5));

        // Act
        bridge.handle(press(KeyRef::special(keys::CTRL_RIGHT)));
        let directive = bridge.handle(press(KeyRef::special(keys::TAB)));

        // Assert
        assert_eq!(directive, CaptureDirective::Restart { suppress: false });
        assert_eq!(bridge.state(), BridgeState::Paused);
        assert!(!bridge.held_ctrl().any());
        assert_eq!(bridge.last_known_position(), None);
        assert_eq!(
            rx.drain(),
            vec![
                Outbound::Event(Event::KeyPress {
                    key: KeyRef::special(keys::CTRL_RIGHT)
                }),
                Outbound::Event(Event::release(KeyRef::special(keys::TAB))),
                Outbound::Event(Event::release(KeyRef::special(keys::CTRL_RIGHT))),
            ]
        );
    }

    #[test]
    fn test_paused_bridge_drops_everything_but_hotkeys() {
        // Arrange
        let (mut bridge, mut rx) = make_bridge(false);
        bridge.handle(press(ctrl_l()));
        bridge.handle(press(KeyRef::special(keys::TAB)));
        rx.drain();

        // Act
        bridge.handle(release(ctrl_l()));
        bridge.handle(press(KeyRef::char('x')));
        bridge.handle(moved(3, 3));
        bridge.handle(moved(9, 9));
        bridge.handle(RawInputEvent::Scrolled {
            x: 9,
            y: 9,
            dx: 0,
            dy: 1,
        });

        // Assert
        assert!(rx.drain().is_empty());
        assert_eq!(bridge.last_known_position(), None);
    }

    #[test]
    fn test_toggling_twice_returns_to_active_with_clean_state() {
        // Arrange
        let (mut bridge, mut rx) = make_bridge(true);
        bridge.handle(moved(40, 40));

        // Act
        bridge.handle(press(ctrl_l()));
        let first = bridge.handle(press(KeyRef::special(keys::TAB)));
        bridge.handle(press(ctrl_l()));
        let second = bridge.handle(press(KeyRef::special(keys::TAB)));

        // Assert
        assert_eq!(first, CaptureDirective::Restart { suppress: false });
        assert_eq!(second, CaptureDirective::Restart { suppress: true });
        assert_eq!(bridge.state(), BridgeState::Active);
        assert!(!bridge.held_ctrl().any());
        assert_eq!(bridge.last_known_position(), None);
        // Resuming from Paused queues no releases.
        assert_eq!(rx.drain().len(), 3);
    }

    #[test]
    fn test_capture_lost_releases_held_ctrl_and_queues_sentinel() {
        // Arrange
        let (mut bridge, mut rx) = make_bridge(false);
        bridge.handle(press(ctrl_l()));
        rx.drain();

        // Act
        bridge.capture_lost();
        bridge.capture_lost();

        // Assert
        assert_eq!(
            rx.drain(),
            vec![
                Outbound::Event(Event::release(ctrl_l())),
                Outbound::Stop(StopReason::CaptureLost),
            ]
        );
    }
}
