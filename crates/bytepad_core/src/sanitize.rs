//! Body content sanitization boundary.
//!
//! # Responsibility
//! - Define the seam through which raw text enters note bodies.
//! - Ship the conservative default: plain-text escaping.
//!
//! # Invariants
//! - Everything stored in `Note::content` passed through a sanitizer
//!   exactly once, at entry.
//! - The default sanitizer never emits markup beyond `<br>`.
//!
//! Markup-preserving sanitizers (allow-listed rich text) need a DOM and
//! live with the renderer; they plug in through the same trait.

use once_cell::sync::Lazy;
use regex::Regex;

/// Heuristic used by callers to decide whether input should be routed to
/// a markup-aware sanitizer before it gets here.
static MARKUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)</?[a-z].*>").expect("valid markup regex"));

/// Whether the text contains anything tag-shaped.
pub fn looks_like_markup(text: &str) -> bool {
    MARKUP_RE.is_match(text)
}

/// Seam for turning raw input into storable body content.
pub trait ContentSanitizer {
    fn sanitize(&self, raw: &str) -> String;
}

/// Default sanitizer: HTML-escapes everything and renders line breaks as
/// `<br>`. Accepts any input; rich formatting does not survive it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextSanitizer;

impl ContentSanitizer for PlainTextSanitizer {
    fn sanitize(&self, raw: &str) -> String {
        escape_html(raw).replace('\n', "<br>")
    }
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
