//! Reversible text escaping for the `Text` wire field.
//!
//! Escaping applies standard markup escaping, collapses literal
//! newlines to a single space (accepted as lossy) and replaces the
//! symbols below with named placeholder tokens. Unescaping is a single
//! entity-decoding pass, so a literal `&copy;` typed by a letterer
//! survives the round trip distinctly from an actual `©`.

use std::borrow::Cow;

/// Symbol → placeholder-token substitution table. Part of the wire
/// contract; do not reorder or extend without versioning the format.
const SUBSTITUTIONS: &[(char, &str)] = &[
    ('©', "&copy;"),
    ('®', "&reg;"),
    ('™', "&trade;"),
    ('€', "&euro;"),
    ('£', "&pound;"),
    ('’', "&rsquo;"),
    ('‘', "&lsquo;"),
    ('“', "&ldquo;"),
    ('”', "&rdquo;"),
    ('|', "&#124;"),
    ('—', "&mdash;"),
    ('–', "&ndash;"),
    ('»', "&raquo;"),
    ('¥', "&yen;"),
    ('«', "&laquo;"),
    ('¢', "&cent;"),
];

fn substitution(ch: char) -> Option<&'static str> {
    SUBSTITUTIONS
        .iter()
        .find(|(symbol, _)| *symbol == ch)
        .map(|(_, token)| *token)
}

/// Escapes raw bubble text for the wire.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push(' '),
            _ => match substitution(ch) {
                Some(token) => out.push_str(token),
                None => out.push(ch),
            },
        }
    }
    out
}

/// Inverse of [`escape_text`] up to the documented newline collapse:
/// decodes the placeholder tokens and the markup entities in one pass.
pub fn unescape_text(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}
