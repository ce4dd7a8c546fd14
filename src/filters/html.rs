//! HTML allow-list escaping.

use super::tables::{
    HTML_CONTROL, HTML_DECIMAL_LIMIT, HTML_NAMED_ENTITIES, HTML_NOT_WHITELISTED,
};
use regex::Captures;

/// Escape a string for interpolation into HTML.
///
/// 1. Control characters (U+0000–U+0008, U+000B, U+000C, U+000E–U+001F,
///    U+007F–U+009F) become a single space.
/// 2. Every character outside the allow-list is replaced by an entity:
///    `&quot;`, `&amp;`, `&lt;`, `&gt;` for the four HTML metacharacters,
///    `&#NN;` for other code points below 100 and `&#xHH;` (uppercase hex)
///    above.
///
/// The allow-list is tab, newline, vertical tab, form feed, carriage return,
/// space, comma, period, ASCII digits and letters, underscore, hyphen, and
/// everything from U+00A0 up. Characters are escaped unless known to be
/// safe, so some harmless ones (`{`, `=`) are escaped too.
///
/// # Examples
///
/// ```
/// use micro_html_template::filters::escape_html;
///
/// assert_eq!(escape_html("<b>Tom & Jerry</b>"), "&lt;b&gt;Tom &amp; Jerry&lt;&#47;b&gt;");
/// assert_eq!(escape_html("x={y}"), "x&#61;&#x7B;y&#x7D;");
/// ```
pub fn escape_html(input: &str) -> String {
    let spaced = HTML_CONTROL.replace_all(input, " ");
    HTML_NOT_WHITELISTED
        .replace_all(&spaced, |caps: &Captures<'_>| {
            caps[0].chars().map(entity).collect::<String>()
        })
        .into_owned()
}

fn entity(c: char) -> String {
    if let Some((_, named)) = HTML_NAMED_ENTITIES.iter().find(|(ch, _)| *ch == c) {
        return (*named).to_string();
    }
    let code = u32::from(c);
    if code < HTML_DECIMAL_LIMIT {
        format!("&#{};", code)
    } else {
        format!("&#x{:X};", code)
    }
}
