//! Channel subscriptions over a server-sent event stream.
//!
//! [`Subscriber::subscribe`] opens one persistent connection per call to
//! the stream endpoint, with the channel name URL-encoded into the query
//! string, and forwards each decoded message payload to the caller's
//! handler in arrival order. The returned [`Subscription`] is the only
//! cancellation primitive: dispose it (or drop it) and no further handler
//! invocations begin.
//!
//! There is no reconnection, buffering, backoff, or sharing between
//! subscriptions; two subscriptions to the same channel are two
//! connections.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, warn};
use tokio::sync::mpsc::{self, Sender};
use tokio::task::JoinHandle;

use crate::runtime::RuntimeOptions;

/// Errors from the stream transport.
#[derive(Debug)]
pub enum SseError {
    /// Network-level failure (DNS, connection refused, mid-stream drop).
    Network(String),
    /// The endpoint answered with a non-success status.
    Api { status: u16, message: String },
    /// The delivery side went away (subscription disposed).
    ChannelClosed,
}

impl fmt::Display for SseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SseError::Network(msg) => write!(f, "network error: {msg}"),
            SseError::Api { status, message } => {
                write!(f, "stream endpoint error (HTTP {status}): {message}")
            }
            SseError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for SseError {}

/// Incremental decoder for the `text/event-stream` framing.
///
/// `data:` lines accumulate until a blank line terminates the event;
/// multi-line data joins with `\n`. Comment lines and the `event:`,
/// `id:` and `retry:` fields are ignored — the runtime forwards payloads
/// only. CR-LF line endings are tolerated.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk of stream text, returning every message payload
    /// completed by it, in order.
    pub fn feed(&mut self, chunk: &str) -> Vec<String> {
        let mut messages = Vec::new();
        self.buffer.push_str(chunk);

        while let Some(pos) = self.buffer.find('\n') {
            let line = self.buffer[..pos].trim_end_matches('\r').to_string();
            self.buffer.drain(..pos + 1);

            if line.is_empty() {
                if !self.data.is_empty() {
                    messages.push(self.data.join("\n"));
                    self.data.clear();
                }
                continue;
            }
            if line.starts_with(':') {
                continue;
            }
            if let Some(value) = line.strip_prefix("data:") {
                self.data.push(value.strip_prefix(' ').unwrap_or(value).to_string());
                continue;
            }
            debug!("ignoring event-stream field: {line}");
        }

        messages
    }
}

/// The connection seam. The built-in [`EventStreamTransport`] rides on
/// `reqwest`; tests substitute scripted transports.
///
/// `open` runs for the lifetime of the connection, pushing each message
/// payload into `sender` in arrival order. It returns `Ok(())` when the
/// stream ends on the server's terms and `Err(SseError::ChannelClosed)`
/// when the receiving side is gone.
#[async_trait]
pub trait StreamTransport: Send + Sync {
    async fn open(&self, channel: &str, sender: Sender<String>) -> Result<(), SseError>;
}

/// `reqwest`-backed transport for the stream endpoint.
pub struct EventStreamTransport {
    base_url: String,
    path: String,
    channel_param: String,
    client: reqwest::Client,
}

impl EventStreamTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, &RuntimeOptions::default())
    }

    pub fn with_options(base_url: impl Into<String>, options: &RuntimeOptions) -> Self {
        Self {
            base_url: base_url.into(),
            path: options.stream_path.clone(),
            channel_param: options.channel_param.clone(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl StreamTransport for EventStreamTransport {
    async fn open(&self, channel: &str, sender: Sender<String>) -> Result<(), SseError> {
        let url = format!("{}{}", self.base_url, self.path);
        let response = self
            .client
            .get(&url)
            .query(&[(self.channel_param.as_str(), channel)])
            .header("Accept", "text/event-stream")
            .send()
            .await
            .map_err(|e| SseError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SseError::Api { status, message });
        }
        debug!("event stream open for channel {channel:?}");

        let mut decoder = SseDecoder::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| SseError::Network(e.to_string()))?;
            for message in decoder.feed(&String::from_utf8_lossy(&bytes)) {
                if sender.send(message).await.is_err() {
                    return Err(SseError::ChannelClosed);
                }
            }
        }
        Ok(())
    }
}

/// Opens subscriptions against one stream endpoint.
pub struct Subscriber {
    transport: Arc<dyn StreamTransport>,
}

impl Subscriber {
    /// Subscriber for a server at `base_url` using the default wire names.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(Arc::new(EventStreamTransport::new(base_url)))
    }

    pub fn with_options(base_url: impl Into<String>, options: &RuntimeOptions) -> Self {
        Self::with_transport(Arc::new(EventStreamTransport::with_options(base_url, options)))
    }

    pub fn with_transport(transport: Arc<dyn StreamTransport>) -> Self {
        Self { transport }
    }

    /// Opens one connection to `channel` and invokes `handler` with each
    /// message payload, in arrival order, until the subscription is
    /// disposed or the transport reaches its own terminal close.
    pub fn subscribe<F>(&self, channel: &str, handler: F) -> Subscription
    where
        F: Fn(String) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<String>(64);
        let closed = Arc::new(AtomicBool::new(false));

        let transport = Arc::clone(&self.transport);
        let channel = channel.to_string();
        let reader = tokio::spawn(async move {
            match transport.open(&channel, tx).await {
                Ok(()) => debug!("event stream for channel {channel:?} ended"),
                Err(SseError::ChannelClosed) => {
                    debug!("subscription for channel {channel:?} disposed mid-stream")
                }
                Err(e) => warn!("event stream for channel {channel:?} failed: {e}"),
            }
        });

        let delivery_closed = Arc::clone(&closed);
        let delivery = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                if delivery_closed.load(Ordering::SeqCst) {
                    break;
                }
                handler(message);
            }
        });

        Subscription {
            closed,
            reader,
            delivery,
        }
    }
}

/// One open event-stream connection. Owned exclusively by the caller
/// that created it; disposal (explicit or by drop) closes the connection
/// and guarantees no further handler invocations begin.
pub struct Subscription {
    closed: Arc<AtomicBool>,
    reader: JoinHandle<()>,
    delivery: JoinHandle<()>,
}

impl Subscription {
    /// Closes the connection. Synchronous from the caller's perspective;
    /// the transport's own teardown may lag behind.
    pub fn dispose(self) {
        self.close();
    }

    /// Whether the subscription has been disposed or the transport has
    /// reached its terminal close.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst) || self.delivery.is_finished()
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.reader.abort();
        self.delivery.abort();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}
