//! Text normalization for association table fields.

/// Strip one layer of enclosing double quotes, if present on both
/// sides. Interior quotes are left alone.
pub fn strip_enclosing_quotes(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

/// Leading integer of a raw `<int>#...` offset field. Everything from
/// the first `#` onward is ignored; a field without `#` is parsed whole.
pub fn leading_offset(raw: &str) -> Option<usize> {
    let head = raw.split('#').next().unwrap_or(raw);
    head.trim().parse().ok()
}

/// Decode the HTML entities that occur in the association tables:
/// the common named entities plus decimal/hex numeric references.
/// Unknown or malformed entities are passed through unchanged.
pub fn html_unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match tail.find(';') {
            Some(end) => {
                let entity = &tail[1..end];
                match decode_entity(entity) {
                    Some(decoded) => out.push(decoded),
                    None => out.push_str(&tail[..=end]),
                }
                rest = &tail[end + 1..];
            }
            None => {
                out.push_str(tail);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = entity.strip_prefix('#')?;
            let code = match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_quote_layer() {
        assert_eq!(strip_enclosing_quotes("\"abc\""), "abc");
        assert_eq!(strip_enclosing_quotes("\"\"abc\"\""), "\"abc\"");
        assert_eq!(strip_enclosing_quotes("abc"), "abc");
        assert_eq!(strip_enclosing_quotes("\"abc"), "\"abc");
    }

    #[test]
    fn leading_offset_takes_prefix_before_hash() {
        assert_eq!(leading_offset("123#45"), Some(123));
        assert_eq!(leading_offset("7#"), Some(7));
        assert_eq!(leading_offset("42"), Some(42));
        assert_eq!(leading_offset("#45"), None);
        assert_eq!(leading_offset("abc#1"), None);
    }

    #[test]
    fn unescapes_named_entities() {
        assert_eq!(
            html_unescape("p &lt; 0.05 &amp; n &gt; 100"),
            "p < 0.05 & n > 100"
        );
        assert_eq!(html_unescape("&quot;quoted&quot;"), "\"quoted\"");
    }

    #[test]
    fn unescapes_numeric_references() {
        assert_eq!(html_unescape("&#945;-synuclein"), "\u{3b1}-synuclein");
        assert_eq!(html_unescape("&#x3B2;-cell"), "\u{3b2}-cell");
    }

    #[test]
    fn passes_through_unknown_and_bare_ampersands() {
        assert_eq!(html_unescape("A&B"), "A&B");
        assert_eq!(html_unescape("&bogus; stays"), "&bogus; stays");
        assert_eq!(html_unescape("no entities"), "no entities");
    }
}
