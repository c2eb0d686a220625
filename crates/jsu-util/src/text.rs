//! Trimming, slugs and HTML escaping.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters [`strip`] removes by default: space, newline, carriage return,
/// tab and no-break space.
pub const DEFAULT_STRIP_CHARS: &str = " \n\r\t\u{a0}";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^-a-zA-Z0-9_]+").unwrap());
static DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Trim any of `chars` from both ends; `None` or `""` uses [`DEFAULT_STRIP_CHARS`].
pub fn strip<'a>(s: &'a str, chars: Option<&str>) -> &'a str {
    let set = chars.filter(|c| !c.is_empty()).unwrap_or(DEFAULT_STRIP_CHARS);
    s.trim_matches(|c: char| set.contains(c))
}

/// Lowercase ASCII slug with single dashes between words.
///
/// # Examples
///
/// ```
/// use jsu_util::text::slugify;
///
/// assert_eq!(slugify("  Hello,  World! "), "hello-world");
/// ```
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let dashed = WHITESPACE.replace_all(&lower, "-");
    let words = NON_WORD.replace_all(&dashed, "");
    let single = DASHES.replace_all(&words, "-");
    single.trim_matches('-').to_string()
}

/// Escape text for HTML content. Newlines become `<br/>`.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\n', "<br/>")
}

/// Escape text for a quoted HTML attribute value.
pub fn escape_attribute(text: &str) -> String {
    text.replace('"', "&quot;")
        .replace('\'', "&#39;")
        .replace('\n', "&#13;&#10;")
}

/// Text content of an HTML fragment: tags dropped, entities decoded.
pub fn strip_html(html: &str) -> String {
    let text = TAG.replace_all(html, "");
    decode_entities(&text).into_owned()
}

/// Decoded text preceding the first tag of an HTML fragment.
///
/// A fragment starting with a tag has no leading text and yields `""`.
pub fn decode_html(html: &str) -> String {
    let leading = html.split('<').next().unwrap_or_default();
    decode_entities(leading).into_owned()
}

/// Replace named and numeric character references. Unknown names are kept
/// as written.
pub fn decode_entities(text: &str) -> Cow<'_, str> { html_escape::decode_html_entities(text) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_default_set() {
        let text = "     test     \n  test      \n test  \n  test     ";
        assert_eq!(strip(text, None), "test     \n  test      \n test  \n  test");
        assert_eq!(strip("\u{a0}x\t", Some("")), "x");
    }

    #[test]
    fn test_strip_custom_set() {
        assert_eq!(strip("--a-b--", Some("-")), "a-b");
        assert_eq!(strip("----", Some("-")), "");
    }

    #[test]
    fn test_slugify_drops_symbols() {
        assert_eq!(slugify(">@)(#<!test?/\"'][{}=+&^`%$"), "test");
        assert_eq!(slugify("Über  cool -- stuff_2"), "ber-cool-stuff_2");
    }

    #[test]
    fn test_escape_html_then_decode() {
        let html = "<div class=\"test\">test</div>";
        let encoded = escape_html(html);
        assert_eq!(encoded, "&lt;div class=\"test\"&gt;test&lt;/div&gt;");
        assert_eq!(decode_html(&encoded), html);
    }

    #[test]
    fn test_escape_html_newline_and_ampersand() {
        assert_eq!(escape_html("a & b\nc"), "a &amp; b<br/>c");
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(
            escape_attribute("<div class=\"test\">it's\n</div>"),
            "<div class=&quot;test&quot;>it&#39;s&#13;&#10;</div>"
        );
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<div><div class=\"test\">test</div></div>"), "test");
        assert_eq!(strip_html("<b>1 &lt; 2</b> &amp; more"), "1 < 2 & more");
    }

    #[test]
    fn test_decode_html_stops_at_first_tag() {
        assert_eq!(decode_html("a&#39;b<span>c</span>"), "a'b");
        assert_eq!(decode_html("<p>x</p>"), "");
        assert_eq!(decode_html(""), "");
    }

    #[test]
    fn test_unknown_entity_is_kept() {
        assert_eq!(decode_entities("&bogus; &#x41;"), "&bogus; A");
    }

    #[test]
    fn test_html5_named_entities() {
        assert_eq!(decode_entities("&uuml;ber &euro;5 it&rsquo;s"), "über €5 it’s");
        assert_eq!(strip_html("<b>caf&eacute;</b> &amp; th&eacute;"), "café & thé");
    }
}
