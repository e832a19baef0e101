//! Ordered, unbounded hand-off from capture context to the transport.
//!
//! Producers push from plain OS threads (the capture callback thread, the
//! bridge driver thread, the caller's own thread for clipboard requests).  The
//! consumer is the async transport task.  A tokio unbounded channel serves
//! both sides: `send` never blocks and needs no runtime, `recv` is async.
//!
//! Items are delivered in the order they were pushed.  Nothing is dropped once
//! accepted.

use mows_core::Event;
use tokio::sync::mpsc;

/// Why the transport should end the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The operator pressed Ctrl+Esc.
    Hotkey,
    /// The capture backend went away and could not be restarted.
    CaptureLost,
}

/// One queue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// An event to write to the connection.
    Event(Event),
    /// Terminal sentinel: close the connection, send nothing after it.
    Stop(StopReason),
}

/// Producer handle.  Cheap to clone; every clone feeds the same queue.
#[derive(Debug, Clone)]
pub struct EventQueue {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl EventQueue {
    /// Queues an event.
    ///
    /// Returns `false` if the consumer is gone (session over).
    pub fn push(&self, event: Event) -> bool {
        self.tx.send(Outbound::Event(event)).is_ok()
    }

    /// Queues the terminal sentinel.
    pub fn stop(&self, reason: StopReason) -> bool {
        self.tx.send(Outbound::Stop(reason)).is_ok()
    }
}

/// Consumer handle, owned by the transport.
#[derive(Debug)]
pub struct EventQueueReceiver {
    rx: mpsc::UnboundedReceiver<Outbound>,
}

impl EventQueueReceiver {
    /// Waits for the next entry.  `None` once every producer is dropped.
    pub async fn recv(&mut self) -> Option<Outbound> {
        self.rx.recv().await
    }

    /// Takes the next entry if one is ready.
    pub fn try_recv(&mut self) -> Option<Outbound> {
        self.rx.try_recv().ok()
    }

    /// Takes every entry that is ready right now.
    pub fn drain(&mut self) -> Vec<Outbound> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

/// Creates a connected producer/consumer pair.
pub fn event_queue() -> (EventQueue, EventQueueReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventQueue { tx }, EventQueueReceiver { rx })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
