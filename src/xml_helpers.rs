//! Shared XML attribute helpers for reading and patching package parts.
//!
//! All functions handle namespace-prefixed attributes and UTF-8 conversion
//! safely; malformed attributes read as missing.

use quick_xml::events::BytesStart;

/// Extract a string attribute value by key.
///
/// Returns `None` if the attribute is missing or not valid UTF-8.
pub fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return attr.unescape_value().ok().map(|s| s.to_string());
        }
    }
    None
}

/// Extract a string attribute by local name (ignoring namespace prefix).
pub fn attr_string_local(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == key {
            return attr.unescape_value().ok().map(|s| s.to_string());
        }
    }
    None
}

/// Extract a `u32` attribute value by key.
pub fn attr_u32(e: &BytesStart, key: &[u8]) -> Option<u32> {
    attr_string(e, key).and_then(|s| s.trim().parse().ok())
}

/// Extract an `f64` attribute value by key.
pub fn attr_f64(e: &BytesStart, key: &[u8]) -> Option<f64> {
    attr_string(e, key).and_then(|s| s.trim().parse().ok())
}

/// Extract a boolean attribute value by key.
///
/// Returns `None` if missing. Recognizes `"1"`, `"true"` as true; anything else as false.
pub fn attr_bool(e: &BytesStart, key: &[u8]) -> Option<bool> {
    attr_string(e, key).map(|s| matches!(s.as_str(), "1" | "true"))
}

/// Extract a boolean attribute with a default value.
pub fn attr_bool_default(e: &BytesStart, key: &[u8], default: bool) -> bool {
    attr_bool(e, key).unwrap_or(default)
}

/// Copy `e`, replacing (or appending) attribute `key` with `value`.
///
/// Attribute order is preserved; a replaced attribute keeps its slot.
pub fn with_attr(e: &BytesStart, key: &str, value: &str) -> BytesStart<'static> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);
    let mut replaced = false;
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key.as_bytes() {
            out.push_attribute((key, value));
            replaced = true;
        } else {
            out.push_attribute(attr);
        }
    }
    if !replaced {
        out.push_attribute((key, value));
    }
    out
}

/// Copy `e` without attribute `key`.
pub fn without_attr(e: &BytesStart, key: &[u8]) -> BytesStart<'static> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() != key {
            out.push_attribute(attr);
        }
    }
    out
}

/// Minimal XML escaping for attribute/text content.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn make_start(xml: &str) -> BytesStart<'_> {
        // Strip < and > / /> to get just the tag content
        let content = xml
            .trim_start_matches('<')
            .trim_end_matches('>')
            .trim_end_matches('/')
            .trim_end();
        BytesStart::from_content(content, content.find(' ').unwrap_or(content.len()))
    }

    #[test]
    fn test_attr_string() {
        let e = make_start(r#"<sheet name="US &amp; Co" />"#);
        assert_eq!(attr_string(&e, b"name"), Some("US & Co".to_string()));
        assert_eq!(attr_string(&e, b"missing"), None);
    }

    #[test]
    fn test_attr_string_local() {
        let e = make_start(r#"<sheet name="US" r:id="rId4" />"#);
        assert_eq!(attr_string_local(&e, b"id"), Some("rId4".to_string()));
        assert_eq!(attr_string(&e, b"id"), None);
    }

    #[test]
    fn test_attr_numbers() {
        let e = make_start(r#"<row r="42" ht="5.5" />"#);
        assert_eq!(attr_u32(&e, b"r"), Some(42));
        assert_eq!(attr_f64(&e, b"ht"), Some(5.5));
        assert_eq!(attr_u32(&e, b"ht"), None);
    }

    #[test]
    fn test_attr_bool() {
        let e = make_start(r#"<row a="1" b="0" c="true" />"#);
        assert_eq!(attr_bool(&e, b"a"), Some(true));
        assert_eq!(attr_bool(&e, b"b"), Some(false));
        assert_eq!(attr_bool(&e, b"c"), Some(true));
        assert!(!attr_bool_default(&e, b"missing", false));
    }

    #[test]
    fn test_with_attr_replaces_in_place() {
        let e = make_start(r#"<workbookView xWindow="0" activeTab="1" yWindow="0" />"#);
        let patched = with_attr(&e, "activeTab", "3");
        let keys: Vec<String> = patched
            .attributes()
            .flatten()
            .map(|a| String::from_utf8_lossy(a.key.as_ref()).into_owned())
            .collect();
        assert_eq!(keys, vec!["xWindow", "activeTab", "yWindow"]);
        assert_eq!(attr_u32(&patched, b"activeTab"), Some(3));
    }

    #[test]
    fn test_with_attr_appends_missing() {
        let e = make_start(r#"<workbookView xWindow="0" />"#);
        let patched = with_attr(&e, "activeTab", "2");
        assert_eq!(attr_u32(&patched, b"activeTab"), Some(2));
    }

    #[test]
    fn test_without_attr() {
        let e = make_start(r#"<sheetView tabSelected="1" workbookViewId="0"/>"#);
        let out = without_attr(&e, b"tabSelected");
        assert_eq!(attr_string(&out, b"tabSelected"), None);
        assert_eq!(attr_u32(&out, b"workbookViewId"), Some(0));
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
    }
}
