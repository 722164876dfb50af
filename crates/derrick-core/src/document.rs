//! The scraped detail page.
//!
//! [`WellDocument`] wraps the raw HTML of one portal detail page and answers
//! span-by-id text lookups. The portal renders every field of interest as a
//! leaf `<span id="…">` element, so extraction is a plain string scan; no
//! HTML tree is built.

use crate::error::{DerrickError, DerrickResult};

/// A raw portal detail page.
#[derive(Debug, Clone)]
pub struct WellDocument {
    html: String,
}

impl WellDocument {
    /// Wraps a fetched page.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the input is empty or whitespace-only.
    /// An unreadable document is the one fatal extraction condition; a
    /// missing element never is.
    pub fn new(html: impl Into<String>) -> DerrickResult<Self> {
        let html = html.into();
        if html.trim().is_empty() {
            return Err(DerrickError::validation("document is empty or unreadable"));
        }
        Ok(Self { html })
    }

    /// Returns the text content of the first `<span>` with the given id.
    ///
    /// Inner markup is stripped and whitespace collapsed, so the result is
    /// the rendered text of the element. Returns `None` when no such element
    /// exists or when `id` is empty.
    #[must_use]
    pub fn span_text(&self, id: &str) -> Option<String> {
        if id.is_empty() {
            return None;
        }
        let needle = format!("id=\"{id}\"");
        let mut from = 0;
        while let Some(rel) = self.html[from..].find(&needle) {
            let at = from + rel;
            // The id attribute must sit inside a span's opening tag.
            let open = self.html[..at].rfind('<')?;
            if !tag_name_is(&self.html[open..], "span") {
                from = at + needle.len();
                continue;
            }
            let tag_end = self.html[at..].find('>')? + at + 1;
            let close = find_ci(&self.html[tag_end..], "</span")? + tag_end;
            let inner = &self.html[tag_end..close];
            return Some(normalize_ws(&strip_tags(inner)));
        }
        None
    }
}

fn tag_name_is(tag: &str, name: &str) -> bool {
    let rest = match tag.strip_prefix('<') {
        Some(r) => r,
        None => return false,
    };
    rest.len() > name.len()
        && rest[..name.len()].eq_ignore_ascii_case(name)
        && rest[name.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_whitespace() || c == '>')
}

fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let haystack = haystack.to_ascii_lowercase();
    haystack.find(&needle.to_ascii_lowercase())
}

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

fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_space = true;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}
