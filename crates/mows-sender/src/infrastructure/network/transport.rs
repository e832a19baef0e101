//! WebSocket client transport.
//!
//! A session runs two halves concurrently over one connection:
//!
//! - **Writer**: pops the [`EventQueue`](crate::EventQueue) in FIFO order and
//!   writes each event as one JSON text frame.  On the stop sentinel it sends
//!   a Close frame and returns; nothing queued after the sentinel is sent.
//! - **Reader**: decodes inbound frames.  `clipboard_data` text is forwarded to
//!   the caller; anything else is logged and skipped.  The session ends when
//!   the receiver closes the connection.
//!
//! Whichever half finishes first ends the session.  There is no reconnect.

use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, Stream, StreamExt,
};
use mows_core::{decode_event, decode_event_bytes, encode_event, EncodeError, Event};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedSender;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message as WsMessage},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, info, warn};

use crate::application::event_queue::{EventQueueReceiver, Outbound, StopReason};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Error type for the sender transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: WsError,
    },
    #[error("connection closed by receiver")]
    ConnectionClosed,
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// An open connection to a receiver.
pub struct SenderTransport {
    ws: WsStream,
    url: String,
}

impl SenderTransport {
    /// Connects to `url` (`ws://host:port`).
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connect`] if the TCP connection or the
    /// WebSocket handshake fails.
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        let (ws, _response) = connect_async(url)
            .await
            .map_err(|source| TransportError::Connect {
                url: url.to_string(),
                source,
            })?;
        debug!("WebSocket connected to {url}");
        Ok(Self {
            ws,
            url: url.to_string(),
        })
    }

    /// The URL this transport is connected to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends one event.
    pub async fn send_event(&mut self, event: &Event) -> Result<(), TransportError> {
        let text = encode_event(event)?;
        self.ws.send(WsMessage::Text(text)).await?;
        Ok(())
    }

    /// Waits for the next event the receiver sends, skipping undecodable frames.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ConnectionClosed`] once the receiver closes.
    pub async fn next_event(&mut self) -> Result<Event, TransportError> {
        next_inbound(&mut self.ws).await
    }

    /// Closes the connection with a Close frame.
    pub async fn close(mut self) {
        if let Err(e) = self.ws.close(None).await {
            debug!("close handshake with {} failed: {e}", self.url);
        }
    }

    /// Streams the queue until the stop sentinel or connection loss.
    ///
    /// Every inbound `clipboard_data` text is sent to `clipboard`, if given.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ConnectionClosed`] if the receiver goes away,
    /// or the underlying WebSocket/encode error.
    pub async fn run(
        self,
        mut queue: EventQueueReceiver,
        clipboard: Option<UnboundedSender<String>>,
    ) -> Result<StopReason, TransportError> {
        let (mut sink, mut stream) = self.ws.split();

        tokio::select! {
            result = drain_queue(&mut sink, &mut queue) => {
                if let Err(e) = sink.close().await {
                    debug!("close handshake with {} failed: {e}", self.url);
                }
                result
            }
            result = read_inbound(&mut stream, clipboard.as_ref()) => result,
        }
    }
}

// ── Connection halves ─────────────────────────────────────────────────────────

async fn drain_queue(
    sink: &mut SplitSink<WsStream, WsMessage>,
    queue: &mut EventQueueReceiver,
) -> Result<StopReason, TransportError> {
    while let Some(item) = queue.recv().await {
        match item {
            Outbound::Event(event) => {
                let text = encode_event(&event)?;
                debug!(kind = event.type_name(), "sending event");
                sink.send(WsMessage::Text(text)).await?;
            }
            Outbound::Stop(reason) => {
                debug!("stop sentinel reached ({reason:?})");
                return Ok(reason);
            }
        }
    }
    // Every producer is gone without a sentinel: capture ended underneath us.
    Ok(StopReason::CaptureLost)
}

async fn read_inbound(
    stream: &mut SplitStream<WsStream>,
    clipboard: Option<&UnboundedSender<String>>,
) -> Result<StopReason, TransportError> {
    loop {
        match next_inbound(stream).await? {
            Event::ClipboardData { text } => {
                info!("clipboard data received ({} chars)", text.chars().count());
                if let Some(sink) = clipboard {
                    if sink.send(text).is_err() {
                        debug!("clipboard consumer gone; dropping data");
                    }
                }
            }
            other => warn!(
                "unexpected {} message from receiver (ignored)",
                other.type_name()
            ),
        }
    }
}

/// Reads frames until one decodes into an event.
async fn next_inbound<S>(stream: &mut S) -> Result<Event, TransportError>
where
    S: Stream<Item = Result<WsMessage, WsError>> + Unpin,
{
    loop {
        let frame = match stream.next().await {
            Some(Ok(frame)) => frame,
            Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                return Err(TransportError::ConnectionClosed)
            }
            Some(Err(e)) => return Err(e.into()),
        };

        let decoded = match frame {
            WsMessage::Text(text) => decode_event(&text),
            WsMessage::Binary(bytes) => decode_event_bytes(&bytes),
            WsMessage::Close(_) => return Err(TransportError::ConnectionClosed),
            WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => continue,
        };

        match decoded {
            Ok(event) => return Ok(event),
            Err(e) => warn!("skipping undecodable message: {e}"),
        }
    }
}

// ── One-shot clipboard helpers ────────────────────────────────────────────────

/// Connects, sends one `clipboard_push`, and closes.
///
/// # Errors
///
/// Returns a [`TransportError`] if the connection or the send fails.
pub async fn push_clipboard(url: &str, text: &str) -> Result<(), TransportError> {
    let mut transport = SenderTransport::connect(url).await?;
    transport
        .send_event(&Event::ClipboardPush {
            text: text.to_string(),
        })
        .await?;
    info!("clipboard sent to {url} ({} chars)", text.chars().count());
    transport.close().await;
    Ok(())
}

/// Connects, sends one `clipboard_pull`, waits for the `clipboard_data` reply,
/// and closes.
///
/// # Errors
///
/// Returns [`TransportError::ConnectionClosed`] if the receiver closes before
/// replying.
pub async fn pull_clipboard(url: &str) -> Result<String, TransportError> {
    let mut transport = SenderTransport::connect(url).await?;
    transport.send_event(&Event::ClipboardPull).await?;
    loop {
        match transport.next_event().await? {
            Event::ClipboardData { text } => {
                transport.close().await;
                return Ok(text);
            }
            other => warn!(
                "unexpected {} message while waiting for clipboard data",
                other.type_name()
            ),
        }
    }
}
