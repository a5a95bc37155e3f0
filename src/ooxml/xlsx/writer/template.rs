//! Fixed package parts for new workbooks.
//!
//! Content types, relationships, a minimal stylesheet and document
//! properties: the bare minimum structure Excel requires around the
//! worksheets.

use std::fmt::Write as FmtWrite;

use crate::common::{Result, escape_xml};

/// Cell format index of the bold header style in [`styles_xml`].
pub const HEADER_STYLE: u32 = 1;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// `[Content_Types].xml` for a workbook with `sheet_count` worksheets.
pub fn content_types_xml(sheet_count: usize) -> Result<String> {
    let mut xml = String::with_capacity(1024 + sheet_count * 160);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    for i in 1..=sheet_count {
        write!(
            xml,
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            i
        )?;
    }
    xml.push_str(r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#);
    xml.push_str("</Types>");
    Ok(xml)
}

/// Package-level `_rels/.rels`.
pub fn root_rels_xml() -> String {
    let mut xml = String::with_capacity(640);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    xml.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#);
    xml.push_str(r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#);
    xml.push_str(r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>"#);
    xml.push_str("</Relationships>");
    xml
}

/// `xl/_rels/workbook.xml.rels`: worksheets take `rId1..=rIdN`, followed by
/// styles and shared strings.
pub fn workbook_rels_xml(sheet_count: usize) -> Result<String> {
    let mut xml = String::with_capacity(512 + sheet_count * 160);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    for i in 1..=sheet_count {
        write!(
            xml,
            r#"<Relationship Id="rId{0}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{0}.xml"/>"#,
            i
        )?;
    }
    write!(
        xml,
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        sheet_count + 1
    )?;
    write!(
        xml,
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
        sheet_count + 2
    )?;
    xml.push_str("</Relationships>");
    Ok(xml)
}

/// Minimal stylesheet: default format 0 and a bold header format 1.
pub fn styles_xml() -> &'static str {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        r#"<fonts count="2">"#,
        r#"<font><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font>"#,
        r#"<font><b/><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font>"#,
        r#"</fonts>"#,
        r#"<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>"#,
        r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#,
        r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
        r#"<cellXfs count="2">"#,
        r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#,
        r#"<xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/>"#,
        r#"</cellXfs>"#,
        r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#,
        r#"</styleSheet>"#
    )
}

/// `docProps/core.xml`.
pub fn core_props_xml(creator: &str, title: &str, created_w3cdtf: &str) -> String {
    let mut xml = String::with_capacity(768);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);
    xml.push_str("<dc:title>");
    xml.push_str(&escape_xml(title));
    xml.push_str("</dc:title><dc:creator>");
    xml.push_str(&escape_xml(creator));
    xml.push_str("</dc:creator><cp:lastModifiedBy>");
    xml.push_str(&escape_xml(creator));
    xml.push_str(r#"</cp:lastModifiedBy><dcterms:created xsi:type="dcterms:W3CDTF">"#);
    xml.push_str(&escape_xml(created_w3cdtf));
    xml.push_str(r#"</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">"#);
    xml.push_str(&escape_xml(created_w3cdtf));
    xml.push_str("</dcterms:modified></cp:coreProperties>");
    xml
}

/// `docProps/app.xml` listing the worksheet titles.
pub fn app_props_xml(application: &str, app_version: &str, sheet_names: &[&str]) -> Result<String> {
    let mut xml = String::with_capacity(768 + sheet_names.len() * 48);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#);
    write!(xml, "<Application>{}</Application>", escape_xml(application))?;
    xml.push_str("<DocSecurity>0</DocSecurity><ScaleCrop>false</ScaleCrop>");
    write!(
        xml,
        r#"<HeadingPairs><vt:vector size="2" baseType="variant"><vt:variant><vt:lpstr>Worksheets</vt:lpstr></vt:variant><vt:variant><vt:i4>{}</vt:i4></vt:variant></vt:vector></HeadingPairs>"#,
        sheet_names.len()
    )?;
    write!(xml, r#"<TitlesOfParts><vt:vector size="{}" baseType="lpstr">"#, sheet_names.len())?;
    for name in sheet_names {
        write!(xml, "<vt:lpstr>{}</vt:lpstr>", escape_xml(name))?;
    }
    xml.push_str("</vt:vector></TitlesOfParts>");
    write!(xml, "<AppVersion>{}</AppVersion>", escape_xml(&excel_app_version(app_version)))?;
    xml.push_str("</Properties>");
    Ok(xml)
}

/// Excel expects `AppVersion` as `XX.YYYY`.
fn excel_app_version(version: &str) -> String {
    let mut parts = version.split('.').map(|p| p.parse::<u32>().unwrap_or(0));
    let major = parts.next().unwrap_or(0);
    let minor = parts.next().unwrap_or(0);
    format!("{:02}.{:04}", major, minor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rels_numbering() {
        let xml = workbook_rels_xml(3).unwrap();
        assert!(xml.contains(r#"Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet3.xml""#));
        assert!(xml.contains(r#"Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles""#));
        assert!(xml.contains(r#"Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings""#));
    }

    #[test]
    fn test_app_version_format() {
        assert_eq!(excel_app_version("1.0.0"), "01.0000");
        assert_eq!(excel_app_version("12.3"), "12.0003");
    }

    #[test]
    fn test_app_props_lists_sheets() {
        let xml = app_props_xml("Excel Chart Generator", "1.0.0", &["Integers", "Yes&No"]).unwrap();
        assert!(xml.contains("<Application>Excel Chart Generator</Application>"));
        assert!(xml.contains("<vt:lpstr>Yes&amp;No</vt:lpstr>"));
        assert!(xml.contains(r#"<vt:i4>2</vt:i4>"#));
    }
}
