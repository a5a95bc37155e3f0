//! Parser for `xl/workbook.xml` and its relationship part.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::common::{Error, Result, unescape_xml};

/// A `<sheet>` entry of the workbook part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRef {
    /// Display name of the worksheet
    pub name: String,
    /// Relationship id pointing at the worksheet part
    pub rel_id: String,
}

fn attribute(element: &BytesStart<'_>, local_name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
        if attr.key.local_name().as_ref() == local_name {
            let raw = std::str::from_utf8(&attr.value)?;
            return Ok(Some(unescape_xml(raw)));
        }
    }
    Ok(None)
}

/// Parse workbook.xml content into its ordered sheet list.
pub fn parse_workbook_xml(content: &str) -> Result<Vec<SheetRef>> {
    let mut reader = Reader::from_str(content);
    let mut sheets = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                let name = attribute(&e, b"name")?.unwrap_or_default();
                let Some(rel_id) = attribute(&e, b"id")? else {
                    continue;
                };
                sheets.push(SheetRef { name, rel_id });
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(sheets)
}

/// Parse a relationships part into `Id -> Target` pairs.
///
/// Targets are resolved against `base_dir` (e.g. `xl`); absolute targets
/// (leading `/`) are taken from the package root.
pub fn parse_relationships(content: &str, base_dir: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(content);
    let mut rels = HashMap::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let (Some(id), Some(target)) = (attribute(&e, b"Id")?, attribute(&e, b"Target")?)
                else {
                    continue;
                };
                rels.insert(id, resolve_target(base_dir, &target));
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(rels)
}

fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut parts: Vec<&str> = base_dir.split('/').filter(|p| !p.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                parts.pop();
            },
            other => parts.push(other),
        }
    }
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workbook_sheets() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <bookViews><workbookView activeTab="1"/></bookViews>
  <sheets>
    <sheet name="Q&amp;A" sheetId="1" r:id="rId3"/>
    <sheet name="Raw" sheetId="2" r:id="rId1"/>
  </sheets>
</workbook>"#;
        let sheets = parse_workbook_xml(xml).unwrap();
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].name, "Q&A");
        assert_eq!(sheets[0].rel_id, "rId3");
        assert_eq!(sheets[1].name, "Raw");
    }

    #[test]
    fn test_parse_relationships() {
        let xml = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="t/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="t/worksheet" Target="/xl/worksheets/sheet2.xml"/>
  <Relationship Id="rId3" Type="t/theme" Target="./theme/../theme/theme1.xml"/>
</Relationships>"#;
        let rels = parse_relationships(xml, "xl").unwrap();
        assert_eq!(rels["rId1"], "xl/worksheets/sheet1.xml");
        assert_eq!(rels["rId2"], "xl/worksheets/sheet2.xml");
        assert_eq!(rels["rId3"], "xl/theme/theme1.xml");
    }
}
