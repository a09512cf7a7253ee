//! Envelope dispatch: one completed exchange in, zero or more effects out.
//!
//! The dispatcher is the sole consumer of the envelope shape. Per
//! exchange it gates on the declared content type, parses the body in one
//! step, applies declared effects in a fixed order, merges out-of-band
//! fragments, and tells the host whether to skip its default swap.
//! Nothing here throws back into the host's exchange lifecycle; failures
//! are contained and logged.

use std::sync::Arc;

use log::{debug, warn};

use crate::dom::{markup, DocumentModel};
use crate::runtime::RuntimeOptions;

use super::sink::EffectSink;
use super::types::{EffectBundle, Envelope, ExchangeContext, Response};

/// A terminal effect unloads or fully replaces the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEffect {
    Redirect,
    Reload,
}

/// What one handled envelope did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EffectReport {
    /// Number of bundle effects invoked.
    pub effects: usize,
    /// The first terminal effect that fired, if any.
    pub terminal: Option<TerminalEffect>,
    /// Number of out-of-band fragments merged into the document.
    pub swaps: usize,
}

/// Outcome of dispatching one exchange.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Not a JSON response; the host's default handling proceeds untouched.
    Ignored,
    /// JSON content type but a malformed envelope; logged, no effects
    /// applied, default handling proceeds.
    Rejected,
    /// Envelope processed; the host's default swap is suppressed.
    Handled(EffectReport),
}

pub struct Dispatcher {
    sink: Arc<dyn EffectSink>,
    options: RuntimeOptions,
}

impl Dispatcher {
    pub fn new(sink: Arc<dyn EffectSink>) -> Self {
        Self::with_options(sink, RuntimeOptions::default())
    }

    pub fn with_options(sink: Arc<dyn EffectSink>, options: RuntimeOptions) -> Self {
        Self { sink, options }
    }

    /// Handles one completed exchange.
    ///
    /// Effects apply strictly before the fragment merge, and within the
    /// bundle in the order toast, redirect, navigate, replace, reload —
    /// the notification is observable before any terminal effect unloads
    /// the page. The default swap is suppressed only after a confirmed
    /// envelope parse.
    pub fn handle(
        &self,
        response: &Response,
        doc: &mut dyn DocumentModel,
        cx: &mut ExchangeContext,
    ) -> Dispatch {
        if !response.is_json() {
            return Dispatch::Ignored;
        }

        let envelope = match Envelope::parse(&response.body) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("discarding malformed envelope (status {}): {e}", response.status);
                return Dispatch::Rejected;
            }
        };

        let mut report = EffectReport::default();
        if let Some(bundle) = &envelope.brx {
            let (effects, terminal) = self.apply_effects(bundle);
            report.effects = effects;
            report.terminal = terminal;
        }
        if let Some(html) = &envelope.html {
            report.swaps = self.merge_fragments(html, doc);
        }

        cx.suppress_default_swap();
        Dispatch::Handled(report)
    }

    /// Applies every present bundle field, in order. Terminal effects do
    /// not short-circuit the remainder; the report only records which
    /// terminal effect fired first.
    fn apply_effects(&self, bundle: &EffectBundle) -> (usize, Option<TerminalEffect>) {
        let mut applied = 0usize;
        let mut terminal = None;

        if let Some(payload) = &bundle.toast {
            self.sink.toast(payload);
            applied += 1;
        }
        if let Some(url) = &bundle.redirect {
            self.sink.redirect(url);
            applied += 1;
            terminal.get_or_insert(TerminalEffect::Redirect);
        }
        if let Some(url) = &bundle.navigate {
            self.sink.push_history(url);
            applied += 1;
        }
        if let Some(url) = &bundle.replace {
            self.sink.replace_history(url);
            applied += 1;
        }
        if bundle.reload_requested() {
            self.sink.reload();
            applied += 1;
            terminal.get_or_insert(TerminalEffect::Reload);
        }

        (applied, terminal)
    }

    /// Scans envelope markup for marked fragments and replaces matching
    /// live elements, in scan order. Fragments without a usable
    /// identifier and identifiers without a live match are inert.
    fn merge_fragments(&self, html: &str, doc: &mut dyn DocumentModel) -> usize {
        let mut merged = 0usize;
        for fragment in markup::scan_marked(html, &self.options.swap_marker) {
            let id = match fragment.id() {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => {
                    debug!("skipping out-of-band fragment without id");
                    continue;
                }
            };
            if doc.replace_by_id(&id, fragment) {
                merged += 1;
            } else {
                debug!("no live element for out-of-band id {id:?}, skipping");
            }
        }
        merged
    }
}
