//! Low-level HTML string helpers for pulling the status heading out of the
//! case-status page. Deliberately naive but tailored to what the page
//! actually serves: the current status lives in the first `<h1>` element.
//! Tag matching is ASCII case-insensitive.

/// Text content of the first `<h1>` element in `doc`: nested tags stripped,
/// basic entities decoded, whitespace collapsed and trimmed. `None` when no
/// `<h1>` is present or its text is empty.
pub fn first_heading_text(doc: &str) -> Option<String> {
    let inner = slice_between_ci(doc, "<h1", "</h1>")?;
    let text = normalize_ws(&normalize_entities(&strip_tags(inner)));
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Find the section between an opening tag (possibly carrying attributes)
/// and its closing tag, case-insensitive on the tag name. Returns the HTML
/// *inside* the tags.
fn slice_between_ci<'a>(s: &'a str, open_pat: &str, close_pat: &str) -> Option<&'a str> {
    let lc = to_lowercase_fast(s);
    let open_lc = to_lowercase_fast(open_pat);
    let close_lc = to_lowercase_fast(close_pat);

    let open_idx = lc.find(&open_lc)?;
    // Jump past the '>' of the opening tag
    let after_open = s[open_idx..].find('>')? + open_idx + 1;
    let close_idx_rel = lc[after_open..].find(&close_lc)?;
    Some(&s[after_open..after_open + close_idx_rel])
}

/// Remove all HTML tags `<...>` from the string.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Minimal entity decoding: the handful the status page actually emits.
fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// Collapse whitespace runs into single spaces and trim.
fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// ASCII-only lowercasing for tag matching.
fn to_lowercase_fast(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}
