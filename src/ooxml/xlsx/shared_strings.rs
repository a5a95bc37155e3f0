//! Shared strings table for Excel files.
//!
//! Excel stores cell text once in `xl/sharedStrings.xml`; cells of type `s`
//! refer to entries by index.

use super::parsers::text_runs::collect_text_runs;

// Pre-allocate typical capacities to reduce reallocations
const INITIAL_STRINGS_CAPACITY: usize = 1024;

/// Shared strings table.
#[derive(Debug, Default, Clone)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    /// Create a new empty shared strings table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse shared strings from `xl/sharedStrings.xml` content.
    ///
    /// Each `<si>` becomes one entry, rich-text runs concatenated. Empty
    /// `<si/>` items keep their slot so indices stay aligned.
    pub fn parse(content: &str) -> Self {
        let mut strings = Vec::with_capacity(INITIAL_STRINGS_CAPACITY);
        let bytes = content.as_bytes();
        let mut pos = 0;

        while let Some(si_start) = memchr::memmem::find(&bytes[pos..], b"<si") {
            let si_start_pos = pos + si_start;
            let after = bytes.get(si_start_pos + 3).copied();
            if !matches!(after, Some(b'>') | Some(b' ') | Some(b'/')) {
                pos = si_start_pos + 3;
                continue;
            }

            let Some(tag_end) = memchr::memchr(b'>', &bytes[si_start_pos..]) else {
                break;
            };
            if bytes[si_start_pos + tag_end - 1] == b'/' {
                strings.push(String::new());
                pos = si_start_pos + tag_end + 1;
                continue;
            }

            match memchr::memmem::find(&bytes[si_start_pos..], b"</si>") {
                Some(si_end) => {
                    let si_content = &content[si_start_pos..si_start_pos + si_end + 5];
                    strings.push(collect_text_runs(si_content));
                    pos = si_start_pos + si_end + 5;
                },
                None => break,
            }
        }

        SharedStrings { strings }
    }

    /// Get a string by its index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|s| s.as_str())
    }

    /// Get the number of strings in the table.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_indices() {
        let xml = r#"<?xml version="1.0"?><sst xmlns="x" count="3" uniqueCount="3"><si><t>Yes</t></si><si/><si><r><t>Not</t></r><r><t xml:space="preserve"> yet</t></r></si></sst>"#;
        let sst = SharedStrings::parse(xml);
        assert_eq!(sst.len(), 3);
        assert_eq!(sst.get(0), Some("Yes"));
        assert_eq!(sst.get(1), Some(""));
        assert_eq!(sst.get(2), Some("Not yet"));
        assert_eq!(sst.get(3), None);
    }

    #[test]
    fn test_escaped_reference_text_is_literal() {
        let sst = SharedStrings::parse("<sst><si><t>Tom &amp;#38; Jerry</t></si></sst>");
        assert_eq!(sst.get(0), Some("Tom &#38; Jerry"));
    }
}
