//! Minimal `application/x-www-form-urlencoded` query-string helpers.
//!
//! serde-based extractors collapse repeated keys, so multi-valued filters such
//! as `?tags=lunch&tags=dinner` are read from the raw query string instead.

use percent_encoding::percent_decode_str;

/// Decode a raw query string into `(key, value)` pairs, preserving order and
/// repeated keys. `+` is treated as a space.
pub fn query_pairs(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Interpret a flag-style query value: any non-zero integer or `true` (any
/// case) is set.
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    match value.parse::<i64>() {
        Ok(number) => number != 0,
        Err(_) => value.eq_ignore_ascii_case("true"),
    }
}

/// Build the SQL `LIKE`/`ILIKE` pattern for a case-insensitive prefix search,
/// escaping the wildcard characters in user input.
pub fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
