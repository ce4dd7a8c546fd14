//! Character-class tables for the escaping filters.

use regex::Regex;
use std::sync::LazyLock;

/// Control characters replaced by a space before HTML escaping.
pub(super) static HTML_CONTROL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F-\x{9F}]").expect("Invalid HTML control regex")
});

/// Any character outside the HTML allow-list.
///
/// Everything at or above U+00A0 is allowed, astral planes included.
pub(super) static HTML_NOT_WHITELISTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\t\n\x0B\x0C\r ,.0-9A-Z_a-z\-\x{A0}-\x{10FFFF}]")
        .expect("Invalid HTML whitelist regex")
});

/// Named entities; every other escaped character becomes a numeric reference.
pub(super) const HTML_NAMED_ENTITIES: [(char, &str); 4] = [
    ('"', "&quot;"),
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
];

/// Code points below this are written as decimal references, the rest as hex.
pub(super) const HTML_DECIMAL_LIMIT: u32 = 100;

/// Punctuation a standard URI component encoder leaves unescaped.
pub(super) const URI_MARKS: &str = "-_.!~*'()";

/// Characters re-escaped after component encoding.
pub(super) static URI_UNSAFE_MARKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[!"'()*~]"#).expect("Invalid URI marks regex"));

/// Replacement for each of [`URI_UNSAFE_MARKS`]. Both quote styles map to `%27`.
pub(super) const URI_MARK_ESCAPES: [(char, &str); 7] = [
    ('!', "%21"),
    ('"', "%27"),
    ('\'', "%27"),
    ('(', "%28"),
    (')', "%29"),
    ('*', "%2A"),
    ('~', "%7E"),
];

pub(super) const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";
