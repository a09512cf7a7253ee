//! Wire shapes for the envelope protocol.
//!
//! A response body is only treated as an envelope when its declared
//! content type is JSON; everything else stays with the host library's
//! default fragment handling. The envelope itself is a flat record with
//! every field optional, validated in one step at the parse boundary.

use serde::Deserialize;
use serde_json::Value;

/// A completed HTTP exchange as handed over by the host library:
/// status, the raw Content-Type header value, and the body text.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, content_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    /// Whether the declared content type indicates JSON. The check is a
    /// case-insensitive substring test, so parameters like
    /// `; charset=utf-8` do not interfere.
    pub fn is_json(&self) -> bool {
        self.content_type
            .to_ascii_lowercase()
            .contains("application/json")
    }
}

/// Per-exchange context the host library threads through dispatch.
/// Carries the one signal the runtime sends back: whether the host should
/// skip its own default content swap for this exchange.
#[derive(Debug, Default)]
pub struct ExchangeContext {
    suppressed: bool,
}

impl ExchangeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suppress_default_swap(&mut self) {
        self.suppressed = true;
    }

    pub fn default_swap_suppressed(&self) -> bool {
        self.suppressed
    }
}

/// The parsed response envelope. Both fields are independently optional;
/// unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct Envelope {
    /// Server-declared UI effects.
    pub brx: Option<EffectBundle>,
    /// Markup to scan for out-of-band fragments.
    pub html: Option<String>,
}

impl Envelope {
    /// Parses a response body. A malformed body or a field of the wrong
    /// type rejects the whole envelope; there is no partial acceptance.
    pub fn parse(body: &str) -> Result<Envelope, serde_json::Error> {
        serde_json::from_str(body)
    }
}

/// The `brx` effect bundle: a flat set of independent, fire-and-forget
/// commands. Not a state machine; every present field is applied.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct EffectBundle {
    /// Opaque payload forwarded verbatim to the notification channel.
    pub toast: Option<Value>,
    /// Full-document navigation target.
    pub redirect: Option<String>,
    /// History push target.
    pub navigate: Option<String>,
    /// History replace target.
    pub replace: Option<String>,
    /// Boolean-ish presence flag for a full reload.
    pub reload: Option<Value>,
}

impl EffectBundle {
    /// Whether the `reload` flag is set to something truthy. The server
    /// sends `true`, but any non-null, non-false, non-zero, non-empty
    /// value counts.
    pub fn reload_requested(&self) -> bool {
        self.reload.as_ref().is_some_and(truthy)
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
