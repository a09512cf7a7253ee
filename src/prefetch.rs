//! Hover prefetching.
//!
//! Anchors opting in via the prefetch data attribute get their target
//! warmed with a single best-effort GET on first hover. The request is
//! marked with the hint header so the server can recognize it as
//! hint-class traffic, and the anchor is stamped with a write-back
//! attribute so later hovers are no-ops. Failures are swallowed; a
//! prefetch can never surface an error or retry.

use log::debug;

use crate::dom::Element;
use crate::runtime::RuntimeOptions;

pub struct PrefetchHinter {
    client: reqwest::Client,
    options: RuntimeOptions,
}

impl PrefetchHinter {
    pub fn new() -> Self {
        Self::with_options(RuntimeOptions::default())
    }

    pub fn with_options(options: RuntimeOptions) -> Self {
        Self {
            client: reqwest::Client::new(),
            options,
        }
    }

    /// Handles one pointer-hover over an anchor. Returns whether a hint
    /// request was issued; the bool is an idempotence probe for tests,
    /// not an error signal.
    ///
    /// The write-back guard is stamped before the request goes out, so a
    /// second hover during the in-flight request cannot re-issue.
    pub async fn hover(&self, anchor: &mut Element) -> bool {
        let opted_in = anchor
            .attr(&self.options.prefetch_attr)
            .is_some_and(|v| v == "1" || v == "true");
        if !opted_in || anchor.has_attr(&self.options.prefetched_attr) {
            return false;
        }
        let href = match anchor.attr("href") {
            Some(href) if !href.is_empty() => href.to_string(),
            _ => return false,
        };

        anchor.set_attr(self.options.prefetched_attr.clone(), "1");

        match self
            .client
            .get(&href)
            .header(self.options.hint_header.as_str(), "true")
            .send()
            .await
        {
            Ok(response) => {
                debug!("prefetched {href} ({})", response.status());
                // Response body is ignored; drain errors are irrelevant.
                let _ = response.bytes().await;
            }
            Err(e) => {
                debug!("prefetch for {href} failed, ignoring: {e}");
            }
        }
        true
    }
}

impl Default for PrefetchHinter {
    fn default() -> Self {
        Self::new()
    }
}
