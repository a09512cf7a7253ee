//! Client runtime for the brackets hypermedia protocol.
//!
//! Three independent components, sharing only the envelope data shape
//! and the wire-name table:
//!
//! - [`envelope`] — parses the JSON response envelope riding alongside
//!   HTML-fragment exchanges, applies its declared UI effects, and merges
//!   out-of-band fragments into the document.
//! - [`prefetch`] — warms hover targets with one best-effort hint
//!   request per anchor.
//! - [`sse`] — channel subscriptions over a server-sent event stream.
//!
//! The browser surfaces (document, history, notifications) sit behind
//! the [`dom::DocumentModel`] and [`envelope::EffectSink`] traits, so the
//! protocol core runs headless.

pub mod dom;
pub mod envelope;
pub mod prefetch;
pub mod runtime;
pub mod sse;

#[cfg(test)]
pub mod test_support;

pub use dom::{DocumentModel, Element, MemoryDocument};
pub use envelope::{
    Dispatch, Dispatcher, EffectBundle, EffectReport, EffectSink, Envelope, ExchangeContext,
    LogSink, Response, TerminalEffect,
};
pub use prefetch::PrefetchHinter;
pub use runtime::{ExchangeEvents, Registration, RuntimeOptions};
pub use sse::{Subscriber, Subscription};
