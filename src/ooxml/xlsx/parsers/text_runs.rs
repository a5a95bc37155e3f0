//! Text extraction from `<t>` runs shared by string tables and inline cells.

use crate::common::unescape_xml;

/// Concatenate the text of every `<t>` run in a fragment.
///
/// Phonetic guides (`<rPh>`) are skipped and `_xHHHH_` escapes decoded.
pub fn collect_text_runs(fragment: &str) -> String {
    let bytes = fragment.as_bytes();
    let mut text = String::new();
    let mut pos = 0;

    while let Some(lt) = memchr::memchr(b'<', &bytes[pos..]) {
        let start = pos + lt;
        let rest = &bytes[start..];

        if rest.starts_with(b"<rPh") {
            match memchr::memmem::find(rest, b"</rPh>") {
                Some(end) => {
                    pos = start + end + 6;
                    continue;
                },
                None => break,
            }
        }

        let is_t = rest.len() > 2 && rest[1] == b't' && matches!(rest[2], b'>' | b' ');
        if !is_t {
            pos = start + 1;
            continue;
        }

        let Some(open_end) = memchr::memchr(b'>', rest) else {
            break;
        };
        if rest[open_end - 1] == b'/' {
            // <t/> carries no text
            pos = start + open_end + 1;
            continue;
        }

        let body_start = start + open_end + 1;
        let Some(close) = memchr::memmem::find(&bytes[body_start..], b"</t>") else {
            break;
        };
        text.push_str(&unescape_xml(&fragment[body_start..body_start + close]));
        pos = body_start + close + 4;
    }

    decode_ooxml_escapes(&text)
}

/// Decode the `_xHHHH_` escapes Excel uses for control characters.
pub fn decode_ooxml_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(idx) = rest.find("_x") {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        let decoded = tail
            .get(2..6)
            .filter(|_| tail.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &tail[7..];
            },
            None => {
                out.push_str("_x");
                rest = &tail[2..];
            },
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rich_text_runs() {
        let si = r#"<si><r><rPr><b/></rPr><t>Bold</t></r><r><t xml:space="preserve"> &amp; plain</t></r></si>"#;
        assert_eq!(collect_text_runs(si), "Bold & plain");
    }

    #[test]
    fn test_phonetic_runs_skipped() {
        let si = "<si><t>東京</t><rPh sb=\"0\" eb=\"2\"><t>トウキョウ</t></rPh></si>";
        assert_eq!(collect_text_runs(si), "東京");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(decode_ooxml_escapes("a_x000D_b"), "a\rb");
        assert_eq!(decode_ooxml_escapes("max_xp"), "max_xp");
        assert_eq!(collect_text_runs("<si><t/></si>"), "");
    }
}
