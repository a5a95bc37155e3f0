use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

/// Escape XML special characters.
///
/// # Examples
///
/// ```
/// use excel_chart_generator::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<b>\"hi\"</b>"), "&lt;b&gt;&quot;hi&quot;&lt;/b&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Unescape XML text.
///
/// Decodes the five named entities and decimal/hex character references
/// (`&#10;`, `&#xA;`). Unknown or malformed entities are left unchanged.
///
/// # Examples
///
/// ```
/// use excel_chart_generator::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_xml("line&#10;break"), "line\nbreak");
/// assert_eq!(unescape_xml("&#x41;"), "A");
/// assert_eq!(unescape_xml("&invalid;"), "&invalid;");
/// ```
pub fn unescape_xml(s: &str) -> String {
    let bytes = s.as_bytes();
    let Some(first) = memchr::memchr(b'&', bytes) else {
        return s.to_string();
    };

    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..first]);
    let mut pos = first;

    // Each reference is decoded exactly once, left to right
    while pos < s.len() {
        let Some(amp) = memchr::memchr(b'&', &bytes[pos..]).map(|i| pos + i) else {
            out.push_str(&s[pos..]);
            break;
        };
        out.push_str(&s[pos..amp]);

        let body_start = amp + 1;
        let decoded = memchr::memchr(b';', &bytes[body_start..])
            .and_then(|len| decode_reference(&s[body_start..body_start + len]).map(|c| (c, len)));
        match decoded {
            Some((c, len)) => {
                out.push(c);
                pos = body_start + len + 1;
            },
            None => {
                out.push('&');
                pos = body_start;
            },
        }
    }
    out
}

/// Decode the body of `&...;`, named entity or character reference.
fn decode_reference(body: &str) -> Option<char> {
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let num = body.strip_prefix('#')?;
            let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        },
    }
}
