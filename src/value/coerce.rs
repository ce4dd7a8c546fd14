//! Number formatting and parsing shared by string and numeric coercion.

/// Format a number the way rendered templates expect it.
///
/// Integral values print without a fraction, very large and very small
/// magnitudes switch to exponent notation (`1e+21`, `1.5e-7`), and the
/// shortest digit string that round-trips is always used.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let sign = if n < 0.0 { "-" } else { "" };
    // `{:e}` yields the shortest round-trip digits, e.g. "1.2345e2".
    let scientific = format!("{:e}", n.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let point = exponent.parse::<i32>().unwrap_or(0) + 1;

    let body = if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}.{}", int, frac)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let e = point - 1;
        let e = if e >= 0 { format!("+{}", e) } else { e.to_string() };
        if k == 1 {
            format!("{}e{}", digits, e)
        } else {
            let (first, rest) = digits.split_at(1);
            format!("{}.{}e{}", first, rest, e)
        }
    };

    format!("{}{}", sign, body)
}

/// Parse a string as a number, returning NaN when it is not numeric.
///
/// Surrounding whitespace is ignored and an empty string is zero. Accepts
/// decimal literals with optional sign, fraction and exponent, the `0x`,
/// `0o` and `0b` prefixes, and signed `Infinity`.
pub fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
    if trimmed.is_empty() {
        return 0.0;
    }

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        let lower = trimmed.get(..2).map(str::to_ascii_lowercase);
        if lower.as_deref() == Some(prefix) {
            return parse_radix(&trimmed[2..], radix);
        }
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    // Rust's float parser also accepts "inf" and "nan", which are not numbers here.
    if trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        trimmed.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Parse unsigned digits in the given radix; NaN on empty or invalid input.
pub(crate) fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut value = 0.0;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value * f64::from(radix) + f64::from(d),
            None => return f64::NAN,
        }
    }
    value
}
