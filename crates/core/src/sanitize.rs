//! Input sanitization for submitted form fields.
//!
//! Runs at the HTTP boundary, before a record is built. The store is a dumb,
//! trusted sink and performs no validation of its own, so everything that
//! reaches it must already be trimmed, escaped, and length-capped here.

/// Trim, HTML-escape, and truncate a submitted string field.
///
/// Truncation happens after escaping so the cap bounds what is persisted,
/// and lands on a char boundary so the result is always valid UTF-8.
pub fn sanitize_field(raw: &str, max_len: usize) -> String {
    let escaped = escape_html(raw.trim());
    truncate_chars(&escaped, max_len)
}

/// Escape the HTML-significant characters.
///
/// Stored values may be rendered into an admin page by a downstream
/// consumer, so entities are encoded at intake rather than at display time.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn truncate_chars(input: &str, max_len: usize) -> String {
    match input.char_indices().nth(max_len) {
        Some((byte_idx, _)) => input[..byte_idx].to_string(),
        None => input.to_string(),
    }
}
