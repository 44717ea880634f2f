//! Small HTML text helpers.
//!
//! The rewriter hands text chunks over exactly as they appear in the
//! source, so character references are still encoded. [`unescape`] turns
//! them back into characters to get DOM-style text content.

use quick_xml::escape::resolve_html5_entity;
use std::borrow::Cow;

/// Longest reference name we try to decode
/// (`CounterClockwiseContourIntegral` is 31 bytes).
const MAX_REFERENCE_LEN: usize = 32;

/// Decode character references in `s`.
///
/// Handles every HTML5 named reference plus decimal and hexadecimal
/// numeric references. Anything else is left verbatim.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        let decoded = after
            .find(';')
            .filter(|&end| end > 0 && end <= MAX_REFERENCE_LEN)
            .and_then(|end| decode_reference(&after[..end]).map(|text| (text, end)));

        match decoded {
            Some((text, end)) => {
                out.push_str(&text);
                rest = &after[end + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

fn decode_reference(name: &str) -> Option<Cow<'static, str>> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code).map(|c| Cow::Owned(c.to_string()));
    }
    resolve_html5_entity(name).map(Cow::Borrowed)
}
