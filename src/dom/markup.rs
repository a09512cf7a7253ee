//! Minimal markup scanner for server-supplied fragments.
//!
//! Envelope `html` payloads are small, server-rendered fragments; the
//! runtime only needs to pick out elements and their attributes, not build
//! a full document tree. The scanner walks the raw text byte-wise,
//! parsing open tags and balancing same-name close tags. Malformed input
//! never panics: anything unparseable is skipped.

use log::debug;

use super::types::Element;

/// Tags that never carry a body and never take a close tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

struct OpenTag {
    element: Element,
    /// Byte offset of the first byte after the open tag's `>`.
    end: usize,
    self_closing: bool,
}

/// Parses one open tag starting at `start`, which must point at `<`.
/// Returns `None` when the text there is not a well-formed open tag.
fn parse_open_tag(html: &str, start: usize) -> Option<OpenTag> {
    let bytes = html.as_bytes();
    let mut i = start + 1;

    let name_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    if i == name_start || !bytes[name_start].is_ascii_alphabetic() {
        return None;
    }
    let tag = html[name_start..i].to_ascii_lowercase();

    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;
    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        match bytes[i] {
            b'>' => {
                i += 1;
                break;
            }
            b'/' => {
                if bytes.get(i + 1) == Some(&b'>') {
                    self_closing = true;
                    i += 2;
                    break;
                }
                i += 1;
            }
            _ => {
                let attr_start = i;
                while i < bytes.len()
                    && !bytes[i].is_ascii_whitespace()
                    && !matches!(bytes[i], b'=' | b'>' | b'/')
                {
                    i += 1;
                }
                if i == attr_start {
                    return None;
                }
                let name = html[attr_start..i].to_ascii_lowercase();

                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                let mut value = String::new();
                if i < bytes.len() && bytes[i] == b'=' {
                    i += 1;
                    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                        let quote = bytes[i];
                        i += 1;
                        let value_start = i;
                        while i < bytes.len() && bytes[i] != quote {
                            i += 1;
                        }
                        if i >= bytes.len() {
                            return None;
                        }
                        value = html[value_start..i].to_string();
                        i += 1;
                    } else {
                        let value_start = i;
                        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>'
                        {
                            i += 1;
                        }
                        value = html[value_start..i].to_string();
                    }
                }
                attrs.push((name, value));
            }
        }
    }

    Some(OpenTag {
        element: Element::from_parts(tag, attrs),
        end: i,
        self_closing,
    })
}

/// Finds the close tag matching an open `tag` whose `>` ends at `from`.
/// Returns the byte offsets of the close tag's `<` and of the first byte
/// after its `>`. Same-name nested elements are balanced; other tags are
/// stepped over with their attribute quoting respected.
fn find_matching_close(html: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = html.as_bytes();
    let mut depth = 1usize;
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        if html[i..].starts_with("<!--") {
            match html[i..].find("-->") {
                Some(off) => {
                    i += off + 3;
                    continue;
                }
                None => return None,
            }
        }
        if bytes.get(i + 1) == Some(&b'/') {
            let name_start = i + 2;
            let mut j = name_start;
            while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'-') {
                j += 1;
            }
            let name = html[name_start..j].to_ascii_lowercase();
            while j < bytes.len() && bytes[j] != b'>' {
                j += 1;
            }
            if j >= bytes.len() {
                return None;
            }
            if name == tag {
                depth -= 1;
                if depth == 0 {
                    return Some((i, j + 1));
                }
            }
            i = j + 1;
            continue;
        }
        match parse_open_tag(html, i) {
            Some(open) => {
                if open.element.tag() == tag && !open.self_closing && !is_void(tag) {
                    depth += 1;
                }
                i = open.end;
            }
            None => i += 1,
        }
    }
    None
}

/// Walks `html` collecting elements for which `capture` returns true,
/// including their bodies. Non-captured elements are descended into, so a
/// captured element may sit at any depth inside non-captured containers.
/// Captured elements are not descended into.
fn collect(html: &str, capture: &dyn Fn(&Element) -> bool) -> Vec<Element> {
    let bytes = html.as_bytes();
    let mut out = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        if html[i..].starts_with("<!--") {
            i = match html[i..].find("-->") {
                Some(off) => i + off + 3,
                None => bytes.len(),
            };
            continue;
        }
        if bytes.get(i + 1) == Some(&b'/') {
            // Stray close tag; step over it.
            i = match html[i..].find('>') {
                Some(off) => i + off + 1,
                None => bytes.len(),
            };
            continue;
        }
        match parse_open_tag(html, i) {
            Some(open) => {
                if capture(&open.element) {
                    let mut element = open.element;
                    if open.self_closing || is_void(element.tag()) {
                        i = open.end;
                    } else if let Some((close_start, resume)) =
                        find_matching_close(html, element.tag(), open.end)
                    {
                        element.set_inner_html(&html[open.end..close_start]);
                        i = resume;
                    } else {
                        debug!("unterminated <{}> in fragment markup", element.tag());
                        element.set_inner_html(&html[open.end..]);
                        i = bytes.len();
                    }
                    out.push(element);
                } else {
                    i = open.end;
                }
            }
            None => i += 1,
        }
    }
    out
}

/// Parses the top-level elements of a markup string, in source order.
/// Text between elements is ignored.
pub fn parse_elements(html: &str) -> Vec<Element> {
    collect(html, &|_| true)
}

/// Scans a markup string for elements carrying the given marker
/// attribute, in source order, at any depth. A marked element's own body
/// is not scanned further.
pub fn scan_marked(html: &str, marker: &str) -> Vec<Element> {
    collect(html, &|el| el.has_attr(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_element() {
        let els = parse_elements(r#"<div id="t">old</div>"#);
        assert_eq!(els.len(), 1);
        assert_eq!(els[0].tag(), "div");
        assert_eq!(els[0].id(), Some("t"));
        assert_eq!(els[0].inner_html(), "old");
    }

    #[test]
    fn test_parse_top_level_order_and_text_skipped() {
        let els = parse_elements("hello <span id=\"a\">1</span> mid <p id=\"b\">2</p> tail");
        assert_eq!(els.len(), 2);
        assert_eq!(els[0].id(), Some("a"));
        assert_eq!(els[1].id(), Some("b"));
    }

    #[test]
    fn test_nested_same_tag_balances() {
        let els = parse_elements(r#"<div id="outer"><div>inner</div></div>"#);
        assert_eq!(els.len(), 1);
        assert_eq!(els[0].inner_html(), "<div>inner</div>");
    }

    #[test]
    fn test_boolean_attribute() {
        let els = parse_elements(r#"<div id="t" hx-swap-oob>new</div>"#);
        assert!(els[0].has_attr("hx-swap-oob"));
        assert_eq!(els[0].attr("hx-swap-oob"), Some(""));
    }

    #[test]
    fn test_single_quoted_and_unquoted_values() {
        let els = parse_elements("<a href='/x' rel=nofollow>go</a>");
        assert_eq!(els[0].attr("href"), Some("/x"));
        assert_eq!(els[0].attr("rel"), Some("nofollow"));
    }

    #[test]
    fn test_quoted_value_may_contain_angle_bracket() {
        let els = parse_elements(r#"<div id="t" title="a > b">x</div>"#);
        assert_eq!(els[0].attr("title"), Some("a > b"));
        assert_eq!(els[0].inner_html(), "x");
    }

    #[test]
    fn test_void_and_self_closing_elements() {
        let els = parse_elements(r#"<img src="/a.png"><br><input value="x"/>"#);
        assert_eq!(els.len(), 3);
        assert_eq!(els[0].tag(), "img");
        assert_eq!(els[2].inner_html(), "");
    }

    #[test]
    fn test_comments_are_skipped() {
        let els = parse_elements("<!-- <div id=\"ghost\">x</div> --><p id=\"real\">y</p>");
        assert_eq!(els.len(), 1);
        assert_eq!(els[0].id(), Some("real"));
    }

    #[test]
    fn test_scan_marked_finds_nested() {
        let html = r#"<section><div id="t" hx-swap-oob>new</div></section><p id="u">plain</p>"#;
        let marked = scan_marked(html, "hx-swap-oob");
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].id(), Some("t"));
        assert_eq!(marked[0].inner_html(), "new");
    }

    #[test]
    fn test_scan_marked_source_order() {
        let html = concat!(
            r#"<div id="b" hx-swap-oob>2</div>"#,
            r#"<div id="a" hx-swap-oob>1</div>"#,
        );
        let marked = scan_marked(html, "hx-swap-oob");
        let ids: Vec<_> = marked.iter().filter_map(|e| e.id()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_scan_marked_does_not_descend_into_marked() {
        let html = r#"<div id="outer" hx-swap-oob><div id="inner" hx-swap-oob>x</div></div>"#;
        let marked = scan_marked(html, "hx-swap-oob");
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].id(), Some("outer"));
    }

    #[test]
    fn test_malformed_input_does_not_panic() {
        for bad in ["<", "<div", "<div id=\"t\">never closed", "</orphan>", "<1tag>x</1tag>"] {
            let _ = parse_elements(bad);
            let _ = scan_marked(bad, "hx-swap-oob");
        }
    }

    #[test]
    fn test_unterminated_element_takes_rest_as_body() {
        let els = parse_elements(r#"<div id="t">tail"#);
        assert_eq!(els.len(), 1);
        assert_eq!(els[0].inner_html(), "tail");
    }

    #[test]
    fn test_multibyte_text_between_elements() {
        let els = parse_elements("héllo → <div id=\"t\">déjà</div>");
        assert_eq!(els.len(), 1);
        assert_eq!(els[0].inner_html(), "déjà");
    }
}
