//! Literal escaping for search text.

use regex::Regex;
use std::sync::OnceLock;

/// Letters and decimal digits of the Basic Multilingual Plane, plus `_`.
/// Anything else, supplementary-plane characters included, forces quoting.
const WORD: &str = r"\A[[\p{L}\p{Nd}_]&&[\x{0}-\x{FFFF}]]*\z";

fn word_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(WORD).ok()).as_ref()
}

/// Render a string literal the way the search language expects it.
///
/// `"` and `\` are backslash-escaped. The result is wrapped in double quotes
/// when any character is not a BMP letter, decimal digit or `_`, or when escaping
/// changed the length. The empty string renders as `""`.
pub fn search_escape(input: &str) -> String {
    if input.is_empty() {
        return "\"\"".to_string();
    }

    let mut escaped = String::with_capacity(input.len() + 2);
    for c in input.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    let quote = word_pattern().map_or(true, |word| !word.is_match(input));

    // Escaping only ever adds ASCII backslashes, so byte lengths compare the
    // same way character counts would.
    if quote || escaped.len() != input.len() {
        format!("\"{}\"", escaped)
    } else {
        escaped
    }
}
