//! WebSocket server: accept loop and the per-connection dispatch loop.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting one sender at a time.  While a sender is connected, further
//!    TCP connections are closed before the WebSocket handshake.  A peer that
//!    does not finish the handshake within [`HANDSHAKE_TIMEOUT`] is dropped
//!    and frees the slot.
//! 3. Reading frames in arrival order, decoding each into an event, and
//!    applying it through a per-connection [`Dispatcher`].
//! 4. Writing the reply to a `clipboard_pull` before reading the next frame.
//! 5. Stopping when the shared `running` flag is cleared.
//!
//! One bad message never ends a connection: decode failures and injection
//! failures are logged and the loop moves on.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use mows_core::{decode_event, decode_event_bytes, encode_event};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::application::dispatch::Dispatcher;
use crate::domain::config::ReceiverConfig;
use crate::infrastructure::input_injection::Injectors;

/// How often the accept loop re-checks the `running` flag.
const ACCEPT_POLL: Duration = Duration::from_millis(200);

/// How long a claimed connection may take to complete the WebSocket handshake.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(3);

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds `config.host:config.port` and serves until `running` is cleared.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn run_server(
    config: ReceiverConfig,
    injectors: Injectors,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| {
            format!(
                "failed to bind receiver on {}:{}",
                config.host, config.port
            )
        })?;
    serve_listener(listener, injectors, running).await
}

/// Runs the accept loop on an already bound listener.
///
/// # Errors
///
/// Returns an error if the listener's local address cannot be read.
pub async fn serve_listener(
    listener: TcpListener,
    injectors: Injectors,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let local = listener
        .local_addr()
        .context("failed to read listener address")?;
    info!("mows receiver listening on {local}");
    if !local.ip().is_loopback() {
        warn!(
            "listening on a non-loopback address without authentication: \
             any peer that reaches {local} can inject input and read the clipboard"
        );
    }

    let slot = Arc::new(AtomicBool::new(false));

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        match timeout(ACCEPT_POLL, listener.accept()).await {
            Ok(Ok((stream, peer))) => {
                let Some(guard) = SlotGuard::claim(&slot) else {
                    warn!("rejecting {peer}: a sender is already connected");
                    drop(stream);
                    continue;
                };
                let injectors = injectors.clone();
                tokio::spawn(async move {
                    handle_connection(stream, peer, injectors).await;
                    drop(guard);
                });
            }
            Ok(Err(e)) => error!("accept error: {e}"),
            Err(_) => {
                // No connection within the poll interval.
            }
        }
    }

    Ok(())
}

// ── Connection slot ───────────────────────────────────────────────────────────

/// Holds the single connection slot; frees it on drop.
struct SlotGuard(Arc<AtomicBool>);

impl SlotGuard {
    fn claim(slot: &Arc<AtomicBool>) -> Option<Self> {
        slot.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SlotGuard(Arc::clone(slot)))
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ── Per-connection handler ────────────────────────────────────────────────────

async fn handle_connection(stream: TcpStream, peer: SocketAddr, injectors: Injectors) {
    let id = Uuid::new_v4();
    match run_connection(stream, peer, id, injectors).await {
        Ok(()) => info!(connection = %id, "sender disconnected: {peer}"),
        Err(e) => warn!(connection = %id, "sender {peer} disconnected with error: {e:#}"),
    }
}

async fn run_connection(
    stream: TcpStream,
    peer: SocketAddr,
    id: Uuid,
    injectors: Injectors,
) -> anyhow::Result<()> {
    let mut ws = timeout(HANDSHAKE_TIMEOUT, accept_async(stream))
        .await
        .with_context(|| format!("WebSocket handshake with {peer} timed out"))?
        .with_context(|| format!("WebSocket handshake failed with {peer}"))?;
    info!(connection = %id, "sender connected: {peer}");

    let mut dispatcher = Dispatcher::new(injectors.input, injectors.relative);

    while let Some(frame) = ws.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => break,
            Err(e) => return Err(e).context("WebSocket read failed"),
        };

        let decoded = match frame {
            WsMessage::Text(text) => decode_event(&text),
            WsMessage::Binary(bytes) => decode_event_bytes(&bytes),
            WsMessage::Close(_) => {
                debug!(connection = %id, "close frame received");
                break;
            }
            WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => continue,
        };

        let event = match decoded {
            Ok(event) => event,
            Err(e) => {
                warn!(connection = %id, "skipping message: {e}");
                continue;
            }
        };

        debug!(connection = %id, kind = event.type_name(), "applying event");
        match dispatcher.dispatch(event) {
            Ok(Some(reply)) => {
                let text = encode_event(&reply).context("failed to encode reply")?;
                ws.send(WsMessage::Text(text))
                    .await
                    .context("failed to send reply")?;
            }
            Ok(None) => {}
            Err(e) => warn!(connection = %id, "{e}"),
        }
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
