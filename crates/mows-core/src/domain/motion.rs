//! Pointer motion correction.
//!
//! # Sender side: [`MotionTracker`]
//!
//! Capture layers report the pointer as an *absolute* position.  The wire
//! carries *relative* motion, so the sender remembers the last known position
//! and emits the difference.
//!
//! When input suppression is on, the local cursor is frozen: the OS never
//! actually moves it, but the capture callback still reports where it would
//! have gone.  Advancing the remembered position to those raw samples makes
//! the computed deltas drift toward zero.  Instead the tracker pins the origin
//! at the frozen coordinate and measures every raw sample against that pin.
//! `raw - origin` is the cumulative motion since the pin; each emitted delta is
//! the part of it that has not been reported yet.
//!
//! # Receiver side: [`TrackedPosition`]
//!
//! A receiver without a relative-motion primitive has to place the cursor with
//! absolute moves.  Reading the OS cursor back before every move accumulates
//! rounding error under display scaling, so the receiver keeps its own
//! accumulator, seeded once from the live pointer position.

use tracing::trace;

/// Where the tracker measures the next raw sample from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    /// No position seen since the last reset.
    Unknown,
    /// Suppression off: follow the pointer sample by sample.
    Following { last: (i32, i32) },
    /// Suppression on: origin stays at the frozen coordinate.
    Pinned {
        origin: (i32, i32),
        /// Cumulative motion already emitted since the pin.
        reported: (i32, i32),
    },
}

/// Turns absolute pointer samples into relative motion deltas.
///
/// # Examples
///
/// ```rust
/// use mows_core::MotionTracker;
///
/// let mut tracker = MotionTracker::new(false);
/// assert_eq!(tracker.observe(10, 10), None); // first sample only seeds
/// assert_eq!(tracker.observe(13, 9), Some((3, -1)));
/// ```
#[derive(Debug, Clone)]
pub struct MotionTracker {
    suppressed: bool,
    anchor: Anchor,
}

impl MotionTracker {
    /// Creates a tracker with no known position.
    ///
    /// `suppressed` must match whether the capture layer is currently
    /// withholding input from the local OS.
    pub fn new(suppressed: bool) -> Self {
        Self {
            suppressed,
            anchor: Anchor::Unknown,
        }
    }

    /// Returns whether the tracker is in pinned (suppressed) mode.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Switches suppression mode.  The remembered position is forgotten.
    pub fn set_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
        self.reset();
    }

    /// Forgets the remembered position.
    pub fn reset(&mut self) {
        self.anchor = Anchor::Unknown;
    }

    /// The position deltas are currently measured from, if known.
    ///
    /// In pinned mode this is the frozen origin, not the latest raw sample.
    pub fn last_known(&self) -> Option<(i32, i32)> {
        match self.anchor {
            Anchor::Unknown => None,
            Anchor::Following { last } => Some(last),
            Anchor::Pinned { origin, .. } => Some(origin),
        }
    }

    /// Feeds one raw pointer-moved sample.
    ///
    /// Returns the delta to transmit, or `None` when there is nothing to send
    /// (first sample after a reset, or no net motion).
    pub fn observe(&mut self, x: i32, y: i32) -> Option<(i32, i32)> {
        match self.anchor {
            Anchor::Unknown => {
                self.seed(x, y);
                None
            }
            Anchor::Following { last } => {
                self.anchor = Anchor::Following { last: (x, y) };
                non_zero(x.wrapping_sub(last.0), y.wrapping_sub(last.1))
            }
            Anchor::Pinned { origin, reported } => {
                let cumulative = (x.wrapping_sub(origin.0), y.wrapping_sub(origin.1));
                let delta = non_zero(
                    cumulative.0.wrapping_sub(reported.0),
                    cumulative.1.wrapping_sub(reported.1),
                )?;
                self.anchor = Anchor::Pinned {
                    origin,
                    reported: cumulative,
                };
                Some(delta)
            }
        }
    }

    /// Records the pointer position reported with a click or scroll.
    ///
    /// Following mode re-anchors at `(x, y)`.  Pinned mode only uses it to seed
    /// an unknown origin; an existing pin is never moved.
    pub fn anchor_at(&mut self, x: i32, y: i32) {
        match self.anchor {
            Anchor::Unknown => self.seed(x, y),
            Anchor::Following { .. } => self.anchor = Anchor::Following { last: (x, y) },
            Anchor::Pinned { .. } => {}
        }
    }

    /// Runs a whole sample sequence through a fresh tracker.
    ///
    /// Returns only the emitted deltas, in order.
    pub fn deltas(positions: &[(i32, i32)], suppressed: bool) -> Vec<(i32, i32)> {
        let mut tracker = MotionTracker::new(suppressed);
        positions
            .iter()
            .filter_map(|&(x, y)| tracker.observe(x, y))
            .collect()
    }

    fn seed(&mut self, x: i32, y: i32) {
        self.anchor = if self.suppressed {
            trace!("pinning pointer origin at ({x}, {y})");
            Anchor::Pinned {
                origin: (x, y),
                reported: (0, 0),
            }
        } else {
            Anchor::Following { last: (x, y) }
        };
    }
}

fn non_zero(dx: i32, dy: i32) -> Option<(i32, i32)> {
    if dx == 0 && dy == 0 {
        None
    } else {
        Some((dx, dy))
    }
}

/// Receiver-side absolute position accumulator.
///
/// Invariant: `current() == initial + sum of every applied delta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedPosition {
    x: i32,
    y: i32,
}

impl TrackedPosition {
    /// Seeds the accumulator, normally from the live pointer position.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Adds a delta and returns the new absolute position.
    pub fn apply(&mut self, dx: i32, dy: i32) -> (i32, i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
        (self.x, self.y)
    }

    /// The current absolute position.
    pub fn current(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
