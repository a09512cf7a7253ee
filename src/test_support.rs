//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc::Sender;

use crate::envelope::{EffectSink, Response};
use crate::sse::{SseError, StreamTransport};

/// One effect as seen by a [`RecordingSink`], in invocation order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEffect {
    Toast(Value),
    Redirect(String),
    Navigate(String),
    Replace(String),
    Reload,
}

/// An effect sink that records every invocation.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RecordedEffect>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains and returns everything recorded so far.
    pub fn take(&self) -> Vec<RecordedEffect> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl EffectSink for RecordingSink {
    fn toast(&self, payload: &Value) {
        self.events.lock().unwrap().push(RecordedEffect::Toast(payload.clone()));
    }

    fn redirect(&self, url: &str) {
        self.events.lock().unwrap().push(RecordedEffect::Redirect(url.to_string()));
    }

    fn push_history(&self, url: &str) {
        self.events.lock().unwrap().push(RecordedEffect::Navigate(url.to_string()));
    }

    fn replace_history(&self, url: &str) {
        self.events.lock().unwrap().push(RecordedEffect::Replace(url.to_string()));
    }

    fn reload(&self) {
        self.events.lock().unwrap().push(RecordedEffect::Reload);
    }
}

/// A transport that plays back canned messages, optionally holding the
/// connection open afterwards until the subscription is disposed.
pub struct ScriptedTransport {
    messages: Vec<String>,
    hold_open: bool,
}

impl ScriptedTransport {
    pub fn new(messages: Vec<&str>, hold_open: bool) -> Self {
        Self {
            messages: messages.into_iter().map(str::to_string).collect(),
            hold_open,
        }
    }
}

#[async_trait]
impl StreamTransport for ScriptedTransport {
    async fn open(&self, _channel: &str, sender: Sender<String>) -> Result<(), SseError> {
        for message in &self.messages {
            if sender.send(message.clone()).await.is_err() {
                return Err(SseError::ChannelClosed);
            }
        }
        if self.hold_open {
            futures::future::pending::<()>().await;
        }
        Ok(())
    }
}

/// A 200 response with a JSON content type.
pub fn json_response(body: &str) -> Response {
    Response::new(200, "application/json", body)
}
