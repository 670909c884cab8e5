//! Attribute and tag-name helpers for lenient HTML reading with quick-xml.
//!
//! Clipboard HTML is not XML: attribute values may be unquoted or missing and
//! tag names come in any case. These helpers use quick-xml's HTML attribute
//! syntax and normalize names to ASCII lowercase.

use quick_xml::events::BytesStart;

/// Upper bound for colspan/rowspan values read from pasted markup.
pub const MAX_SPAN: usize = 1000;

/// Extract an attribute value by name, compared case-insensitively.
///
/// Returns `None` if the attribute is missing or not valid UTF-8.
pub fn html_attr(e: &BytesStart, key: &str) -> Option<String> {
    for attr in e.html_attributes().flatten() {
        if attr.key.local_name().as_ref().eq_ignore_ascii_case(key.as_bytes()) {
            return std::str::from_utf8(&attr.value).ok().map(|s| s.trim().to_string());
        }
    }
    None
}

/// Extract a span attribute (`colspan`, `rowspan`), clamped to `1..=MAX_SPAN`.
///
/// Missing or unparsable values count as 1.
pub fn html_span(e: &BytesStart, key: &str) -> usize {
    html_attr(e, key)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_SPAN)
}

/// Local tag name in ASCII lowercase.
pub fn tag_name(name: &[u8]) -> String {
    std::str::from_utf8(name).unwrap_or("").to_ascii_lowercase()
}

/// Local tag name of a start tag in ASCII lowercase.
pub fn local_name_string(e: &BytesStart) -> String {
    tag_name(e.local_name().as_ref())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn make_start(html: &str) -> BytesStart<'_> {
        // Strip < and > / /> to get just the tag content
        let content = html
            .trim_start_matches('<')
            .trim_end_matches('>')
            .trim_end_matches('/');
        BytesStart::from_content(content, content.find(' ').unwrap_or(content.len()))
    }

    #[test]
    fn test_unquoted_attribute() {
        let e = make_start("<th colspan=8>");
        assert_eq!(html_attr(&e, "colspan"), Some("8".to_string()));
        assert_eq!(html_span(&e, "colspan"), 8);
        assert_eq!(html_span(&e, "rowspan"), 1);
    }

    #[test]
    fn test_attribute_case_and_quotes() {
        let e = make_start(r#"<TD ROWSPAN="2" class='x'>"#);
        assert_eq!(html_attr(&e, "rowspan"), Some("2".to_string()));
        assert_eq!(html_attr(&e, "class"), Some("x".to_string()));
        assert_eq!(local_name_string(&e), "td");
    }

    #[test]
    fn test_span_is_clamped() {
        assert_eq!(html_span(&make_start("<td colspan=0>"), "colspan"), 1);
        assert_eq!(html_span(&make_start("<td colspan=999999>"), "colspan"), MAX_SPAN);
        assert_eq!(html_span(&make_start("<td colspan=abc>"), "colspan"), 1);
    }
}
