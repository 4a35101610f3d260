//! Escaping primitives shared by every renderer.

use url::{ParseError, Url};

/// Escape text placed between tags.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// Escape a value placed inside a double-quoted attribute.
///
/// Both quote kinds and the backtick are encoded so the value can never close
/// its attribute; control characters become spaces.
#[must_use]
pub fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            '`' => out.push_str("&#096;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c if c.is_control() => out.push(' '),
            other => out.push(other),
        }
    }
    out
}

/// Schemes an absolute URL may use; relative URLs are always allowed.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Attribute-escaped URL, or `#` when the URL is missing or its scheme is not allowed.
#[must_use]
pub fn escape_url(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return "#".to_owned();
    };
    // Browsers ignore embedded whitespace in a scheme, so judge the compacted form.
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    match Url::parse(&compact) {
        Ok(url) if ALLOWED_SCHEMES.contains(&url.scheme()) => escape_attr(raw),
        Err(ParseError::RelativeUrlWithoutBase) => escape_attr(raw),
        _ => "#".to_owned(),
    }
}
