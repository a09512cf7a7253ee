//! Wire-name table.
//!
//! The runtime's entire configuration surface: the attribute, header, and
//! endpoint names it shares with the server. Defaults match the brackets
//! wire contract; hosts embedding the runtime under different markup
//! conventions can override them.

/// Attribute marking an element as an out-of-band fragment.
pub const DEFAULT_SWAP_MARKER: &str = "hx-swap-oob";
/// Attribute by which anchors opt in to hover prefetching.
pub const DEFAULT_PREFETCH_ATTR: &str = "data-bx-prefetch";
/// Write-back attribute marking an anchor as already prefetched.
pub const DEFAULT_PREFETCHED_ATTR: &str = "data-bx-prefetched";
/// Request header marking hint-class requests, same convention the host
/// exchange library uses for its own requests.
pub const DEFAULT_HINT_HEADER: &str = "HX-Request";
/// Event-stream endpoint path.
pub const DEFAULT_STREAM_PATH: &str = "/bx/sse";
/// Query parameter naming the subscribed channel.
pub const DEFAULT_CHANNEL_PARAM: &str = "to";

#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    pub swap_marker: String,
    pub prefetch_attr: String,
    pub prefetched_attr: String,
    pub hint_header: String,
    pub stream_path: String,
    pub channel_param: String,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            swap_marker: DEFAULT_SWAP_MARKER.to_string(),
            prefetch_attr: DEFAULT_PREFETCH_ATTR.to_string(),
            prefetched_attr: DEFAULT_PREFETCHED_ATTR.to_string(),
            hint_header: DEFAULT_HINT_HEADER.to_string(),
            stream_path: DEFAULT_STREAM_PATH.to_string(),
            channel_param: DEFAULT_CHANNEL_PARAM.to_string(),
        }
    }
}
