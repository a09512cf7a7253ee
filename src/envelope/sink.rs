//! The UI-effect seam.
//!
//! Effects declared by the server are applied through [`EffectSink`], so
//! the dispatch logic stays host-agnostic: a browser host routes these to
//! a document event, `location`, and `history`; tests record them.

use log::info;
use serde_json::Value;

/// Document event name under which browser-facing sinks publish toast
/// payloads for interested listeners.
pub const TOAST_EVENT: &str = "brx:toast";

/// Receives the envelope's fire-and-forget UI commands. Implementations
/// must not fail; an effect either lands or is dropped by the host.
pub trait EffectSink: Send + Sync {
    /// Publish a notification payload, verbatim.
    fn toast(&self, payload: &Value);

    /// Full-document navigation to `url`.
    fn redirect(&self, url: &str);

    /// Push a new history entry without reloading.
    fn push_history(&self, url: &str);

    /// Replace the current history entry without reloading.
    fn replace_history(&self, url: &str);

    /// Full-document reload.
    fn reload(&self);
}

/// A sink that logs each effect. Used by the probe binary and as a
/// stand-in wherever no host surface is wired up.
pub struct LogSink;

impl EffectSink for LogSink {
    fn toast(&self, payload: &Value) {
        info!("effect toast: {payload}");
    }

    fn redirect(&self, url: &str) {
        info!("effect redirect: {url}");
    }

    fn push_history(&self, url: &str) {
        info!("effect navigate: {url}");
    }

    fn replace_history(&self, url: &str) {
        info!("effect replace: {url}");
    }

    fn reload(&self) {
        info!("effect reload");
    }
}
