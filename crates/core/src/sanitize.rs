//! Free-text sanitization for user-submitted strings.
//!
//! Executable blocks (`<script>`, `<style>`) and HTML comments are removed
//! together with their content; any remaining angle brackets are escaped so
//! stored text can never be interpreted as markup. Ampersands and quotes are
//! left alone, so ordinary prose (e.g. "Surveying & Geoinformatics") survives
//! unchanged.

use std::sync::LazyLock;

use regex::Regex;

static EXECUTABLE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").expect("valid regex")
});

static UNCLOSED_EXECUTABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)\b.*$").expect("valid regex"));

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

/// Trim and sanitize a single free-text value.
pub fn sanitize_text(input: &str) -> String {
    let without_blocks = EXECUTABLE_BLOCK_RE.replace_all(input.trim(), "");
    let without_unclosed = UNCLOSED_EXECUTABLE_RE.replace_all(&without_blocks, "");
    let without_comments = COMMENT_RE.replace_all(&without_unclosed, "");

    let mut out = String::with_capacity(without_comments.len());
    for c in without_comments.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out.trim().to_string()
}

/// Sanitize an optional value, mapping blank results to `None`.
pub fn sanitize_optional(input: Option<&str>) -> Option<String> {
    input.map(sanitize_text).filter(|s| !s.is_empty())
}
