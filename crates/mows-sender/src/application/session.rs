//! One run of the sender, from capture start to connection close.
//!
//! # Threads and tasks
//!
//! ```text
//!  capture backend thread ──mpsc──▶ bridge driver thread ──EventQueue──▶ transport task ──▶ ws
//!                                        │                                     ▲
//!                                        └── restart / stop the backend         └── inbound clipboard_data
//! ```
//!
//! Capture is started *before* connecting: a sender that cannot capture input
//! fails with [`CaptureError::Unavailable`] and never opens a connection.
//!
//! Pause/resume restarts the backend from the driver thread.  Shutdown can
//! race with such a restart (connection lost while the operator presses
//! Ctrl+Tab), so both go through one lifecycle lock: the old backend is always
//! fully stopped before a new one starts, and nothing starts after shutdown.

use std::sync::{mpsc, Arc, Mutex};
use std::thread::JoinHandle;

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::application::capture_bridge::{CaptureBridge, CaptureDirective};
use crate::application::event_queue::{event_queue, EventQueue, EventQueueReceiver, StopReason};
use crate::domain::config::SenderConfig;
use crate::infrastructure::input_capture::{CaptureError, InputSource, RawInputEvent};
use crate::infrastructure::network::transport::{SenderTransport, TransportError};

/// Error type for a sender session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// An owned sender session: queue, capture supervisor and transport settings.
pub struct SenderSession {
    id: Uuid,
    config: SenderConfig,
    source: Arc<dyn InputSource>,
    queue: EventQueue,
    queue_rx: EventQueueReceiver,
    clipboard: Option<UnboundedSender<String>>,
}

impl SenderSession {
    /// Creates a session; nothing is started until [`run`](Self::run).
    pub fn new(config: SenderConfig, source: Arc<dyn InputSource>) -> Self {
        let (queue, queue_rx) = event_queue();
        Self {
            id: Uuid::new_v4(),
            config,
            source,
            queue,
            queue_rx,
            clipboard: None,
        }
    }

    /// Forwards every `clipboard_data` text received during the session.
    pub fn with_clipboard_sink(mut self, sink: UnboundedSender<String>) -> Self {
        self.clipboard = Some(sink);
        self
    }

    /// A producer handle for events that do not come from capture (clipboard
    /// requests).  They are interleaved with captured input in push order.
    pub fn queue(&self) -> EventQueue {
        self.queue.clone()
    }

    /// Session identifier used in log lines.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Runs the session to completion.
    ///
    /// Returns why the session stopped: the stop hotkey or lost capture.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Capture`] if capture cannot start; no connection is
    ///   attempted.
    /// - [`SessionError::Transport`] if the connection fails or is closed by
    ///   the receiver.  Not retried.
    pub async fn run(self) -> Result<StopReason, SessionError> {
        let SenderSession {
            id,
            config,
            source,
            queue,
            queue_rx,
            clipboard,
        } = self;

        let supervisor = CaptureSupervisor::start(source, queue, config.suppress)?;
        info!(session = %id, "input capture started (suppress: {})", config.suppress);

        let url = config.url();
        info!(session = %id, "connecting to {url} ...");
        let result = match SenderTransport::connect(&url).await {
            Ok(transport) => {
                let mode = if config.suppress { "suppress ON" } else { "suppress off" };
                info!(session = %id, "connected; streaming events ({mode}, Ctrl+Esc to stop)");
                transport.run(queue_rx, clipboard).await
            }
            Err(e) => Err(e),
        };

        supervisor.shutdown_async().await;
        match &result {
            Ok(reason) => info!(session = %id, "session stopped: {reason:?}"),
            Err(e) => warn!(session = %id, "session ended: {e}"),
        }
        result.map_err(SessionError::from)
    }
}

// ── Capture supervisor ────────────────────────────────────────────────────────

/// Owns the capture backend and the thread that drives the bridge.
pub struct CaptureSupervisor {
    source: Arc<dyn InputSource>,
    /// `true` once shutdown began.  Held while stopping or starting the backend.
    lifecycle: Arc<Mutex<bool>>,
    driver: Option<JoinHandle<()>>,
}

impl CaptureSupervisor {
    /// Starts capture and the bridge driver thread.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`CaptureError`] if the first start fails.
    pub fn start(
        source: Arc<dyn InputSource>,
        queue: EventQueue,
        suppress: bool,
    ) -> Result<Self, CaptureError> {
        let rx = source.start(suppress)?;
        let bridge = CaptureBridge::new(queue, suppress);
        let lifecycle = Arc::new(Mutex::new(false));

        let spawned = {
            let source = Arc::clone(&source);
            let lifecycle = Arc::clone(&lifecycle);
            std::thread::Builder::new()
                .name("mows-capture-bridge".to_string())
                .spawn(move || drive_bridge(bridge, rx, source, lifecycle))
        };
        let driver = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                source.stop();
                return Err(CaptureError::StartFailed(e.to_string()));
            }
        };

        Ok(Self {
            source,
            lifecycle,
            driver: Some(driver),
        })
    }

    /// Stops capture and waits for the driver thread to exit.
    pub fn shutdown(mut self) {
        self.stop_source();
        if let Some(driver) = self.driver.take() {
            if driver.join().is_err() {
                error!("capture bridge thread panicked");
            }
        }
    }

    /// [`shutdown`](Self::shutdown) without blocking the async runtime.
    pub async fn shutdown_async(self) {
        if tokio::task::spawn_blocking(move || self.shutdown())
            .await
            .is_err()
        {
            error!("capture shutdown task failed");
        }
    }

    fn stop_source(&self) {
        let mut closed = lock_lifecycle(&self.lifecycle);
        if !*closed {
            *closed = true;
            self.source.stop();
            debug!("input capture stopped");
        }
    }
}

impl Drop for CaptureSupervisor {
    fn drop(&mut self) {
        // Covers early returns; the thread exits on its own once the channel closes.
        self.stop_source();
    }
}

fn lock_lifecycle(lifecycle: &Mutex<bool>) -> std::sync::MutexGuard<'_, bool> {
    lifecycle
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Driver thread body: feeds callbacks to the bridge and acts on directives.
fn drive_bridge(
    mut bridge: CaptureBridge,
    mut rx: mpsc::Receiver<RawInputEvent>,
    source: Arc<dyn InputSource>,
    lifecycle: Arc<Mutex<bool>>,
) {
    loop {
        let raw = match rx.recv() {
            Ok(raw) => raw,
            Err(_) => {
                // Channel closed: either shutdown, or the backend died on its own.
                if !*lock_lifecycle(&lifecycle) {
                    bridge.capture_lost();
                }
                break;
            }
        };

        match bridge.handle(raw) {
            CaptureDirective::Continue => {}
            CaptureDirective::Restart { suppress } => {
                let closed = lock_lifecycle(&lifecycle);
                if *closed {
                    break;
                }
                source.stop();
                match source.start(suppress) {
                    Ok(next) => {
                        debug!("input capture restarted (suppress: {suppress})");
                        rx = next;
                    }
                    Err(e) => {
                        error!("failed to restart input capture: {e}");
                        drop(closed);
                        bridge.capture_lost();
                        break;
                    }
                }
            }
            CaptureDirective::Stop => {
                let mut closed = lock_lifecycle(&lifecycle);
                if !*closed {
                    *closed = true;
                    source.stop();
                }
                break;
            }
        }
    }
    debug!("capture bridge thread exiting");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
