//! WordprocessingML (DOCX) serialization.
//!
//! A DOCX file is a zip container of XML parts. Only the parts a word processor
//! needs to open the file are written: content types, package relationships, the
//! main document, styles, settings and extended properties.
//!
//! Zip entries carry a fixed timestamp so that equal documents produce equal bytes.

use std::borrow::Cow;
use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::render::document::{
    in_to_twips, pt_to_half_points, pt_to_twips, Document, Paragraph, Run,
};
use crate::render::styles::{StyleRegistry, StyleSpec, SANS_FONT};
use crate::render::RenderError;

pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// US Letter, in twips.
const PAGE_WIDTH_TWIPS: u32 = 12_240;
const PAGE_HEIGHT_TWIPS: u32 = 15_840;
const HEADER_FOOTER_TWIPS: u32 = 720;
const DEFAULT_FONT_SIZE_PT: f32 = 11.0;

// ────────────────────────────────────────────────────────────────────────────
// Static package parts
// ────────────────────────────────────────────────────────────────────────────

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/settings.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings" Target="settings.xml"/></Relationships>"#;

const SETTINGS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:defaultTabStop w:val="720"/><w:characterSpacingControl w:val="doNotCompress"/><w:compat><w:compatSetting w:name="compatibilityMode" w:uri="http://schemas.microsoft.com/office/word" w:val="15"/></w:compat></w:settings>"#;

const APP_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>"#,
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    r#"</Application></Properties>"#,
);

// ────────────────────────────────────────────────────────────────────────────
// Container
// ────────────────────────────────────────────────────────────────────────────

/// Serializes `doc` with the given style definitions into DOCX bytes.
pub fn write_docx(doc: &Document, styles: &StyleRegistry) -> Result<Vec<u8>, RenderError> {
    let document_xml = document_xml(doc)?;
    let styles_xml = styles_xml(styles)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    let parts: [(&str, &[u8]); 7] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS_XML.as_bytes()),
        ("docProps/app.xml", APP_XML.as_bytes()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.as_bytes()),
        ("word/document.xml", &document_xml),
        ("word/styles.xml", &styles_xml),
        ("word/settings.xml", SETTINGS_XML.as_bytes()),
    ];

    for (name, bytes) in parts {
        zip.start_file(name, options)?;
        zip.write_all(bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}

// ────────────────────────────────────────────────────────────────────────────
// XML part writer
// ────────────────────────────────────────────────────────────────────────────

/// Thin event-based writer for one XML part.
struct XmlPart {
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    fn new() -> Result<Self, RenderError> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(Self { writer })
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), RenderError> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<(), RenderError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), RenderError> {
        let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), RenderError> {
        let text = xml_chars(text);
        self.writer.write_event(Event::Text(BytesText::new(&text)))?;
        Ok(())
    }

    /// `<name w:val="value"/>`
    fn val(&mut self, name: &str, value: &str) -> Result<(), RenderError> {
        self.empty(name, &[("w:val", value)])
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

/// Drops characters XML 1.0 cannot carry, escaped or not (C0 controls other
/// than tab, LF and CR, and U+FFFE/U+FFFF). Word refuses to open a part
/// containing them.
fn xml_chars(text: &str) -> Cow<'_, str> {
    fn allowed(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
    }

    if text.chars().all(allowed) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| allowed(c)).collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared run properties
// ────────────────────────────────────────────────────────────────────────────

fn write_fonts(xml: &mut XmlPart, font: &str) -> Result<(), RenderError> {
    xml.empty(
        "w:rFonts",
        &[
            ("w:ascii", font),
            ("w:hAnsi", font),
            ("w:eastAsia", font),
            ("w:cs", font),
        ],
    )
}

fn write_size(xml: &mut XmlPart, size_pt: f32) -> Result<(), RenderError> {
    let half_points = pt_to_half_points(size_pt).to_string();
    xml.val("w:sz", &half_points)?;
    xml.val("w:szCs", &half_points)
}

// ────────────────────────────────────────────────────────────────────────────
// styles.xml
// ────────────────────────────────────────────────────────────────────────────

fn styles_xml(styles: &StyleRegistry) -> Result<Vec<u8>, RenderError> {
    let mut xml = XmlPart::new()?;
    xml.open("w:styles", &[("xmlns:w", W_NS)])?;

    xml.open("w:docDefaults", &[])?;
    xml.open("w:rPrDefault", &[])?;
    xml.open("w:rPr", &[])?;
    write_fonts(&mut xml, SANS_FONT)?;
    write_size(&mut xml, DEFAULT_FONT_SIZE_PT)?;
    xml.val("w:lang", "en-US")?;
    xml.close("w:rPr")?;
    xml.close("w:rPrDefault")?;
    xml.open("w:pPrDefault", &[])?;
    xml.open("w:pPr", &[])?;
    xml.empty(
        "w:spacing",
        &[("w:after", "0"), ("w:line", "240"), ("w:lineRule", "auto")],
    )?;
    xml.close("w:pPr")?;
    xml.close("w:pPrDefault")?;
    xml.close("w:docDefaults")?;

    xml.open(
        "w:style",
        &[
            ("w:type", "paragraph"),
            ("w:default", "1"),
            ("w:styleId", "Normal"),
        ],
    )?;
    xml.val("w:name", "Normal")?;
    xml.empty("w:qFormat", &[])?;
    xml.close("w:style")?;

    for spec in styles.iter() {
        write_style(&mut xml, spec)?;
    }

    xml.close("w:styles")?;
    Ok(xml.finish())
}

fn write_style(xml: &mut XmlPart, spec: &StyleSpec) -> Result<(), RenderError> {
    xml.open(
        "w:style",
        &[
            ("w:type", "paragraph"),
            ("w:customStyle", "1"),
            ("w:styleId", spec.id.ooxml_id()),
        ],
    )?;
    xml.val("w:name", spec.name)?;
    xml.val("w:basedOn", "Normal")?;
    xml.val("w:next", "Normal")?;
    xml.empty("w:qFormat", &[])?;

    let before = pt_to_twips(spec.space_before_pt).to_string();
    let after = pt_to_twips(spec.space_after_pt).to_string();
    xml.open("w:pPr", &[])?;
    xml.empty("w:spacing", &[("w:before", &before), ("w:after", &after)])?;
    xml.val("w:jc", spec.alignment.ooxml_value())?;
    xml.close("w:pPr")?;

    xml.open("w:rPr", &[])?;
    write_fonts(xml, spec.font)?;
    if spec.bold {
        xml.empty("w:b", &[])?;
        xml.empty("w:bCs", &[])?;
    }
    if spec.italic {
        xml.empty("w:i", &[])?;
        xml.empty("w:iCs", &[])?;
    }
    if spec.all_caps {
        xml.empty("w:caps", &[])?;
    }
    if let Some(color) = spec.color {
        xml.val("w:color", &color.hex())?;
    }
    write_size(xml, spec.size_pt)?;
    xml.close("w:rPr")?;

    xml.close("w:style")
}

// ────────────────────────────────────────────────────────────────────────────
// document.xml
// ────────────────────────────────────────────────────────────────────────────

fn document_xml(doc: &Document) -> Result<Vec<u8>, RenderError> {
    let mut xml = XmlPart::new()?;
    xml.open("w:document", &[("xmlns:w", W_NS)])?;
    xml.open("w:body", &[])?;

    for paragraph in &doc.paragraphs {
        write_paragraph(&mut xml, paragraph)?;
    }

    let width = PAGE_WIDTH_TWIPS.to_string();
    let height = PAGE_HEIGHT_TWIPS.to_string();
    let top = in_to_twips(doc.margins.top).to_string();
    let right = in_to_twips(doc.margins.right).to_string();
    let bottom = in_to_twips(doc.margins.bottom).to_string();
    let left = in_to_twips(doc.margins.left).to_string();
    let header_footer = HEADER_FOOTER_TWIPS.to_string();

    xml.open("w:sectPr", &[])?;
    xml.empty("w:pgSz", &[("w:w", &width), ("w:h", &height)])?;
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", &top),
            ("w:right", &right),
            ("w:bottom", &bottom),
            ("w:left", &left),
            ("w:header", &header_footer),
            ("w:footer", &header_footer),
            ("w:gutter", "0"),
        ],
    )?;
    xml.close("w:sectPr")?;

    xml.close("w:body")?;
    xml.close("w:document")?;
    Ok(xml.finish())
}

fn write_paragraph(xml: &mut XmlPart, paragraph: &Paragraph) -> Result<(), RenderError> {
    xml.open("w:p", &[])?;

    let has_properties = paragraph.style.is_some()
        || paragraph.bottom_border.is_some()
        || paragraph.space_after_pt.is_some()
        || paragraph.left_indent_in.is_some();

    if has_properties {
        xml.open("w:pPr", &[])?;
        if let Some(style) = paragraph.style {
            xml.val("w:pStyle", style.ooxml_id())?;
        }
        if let Some(border) = paragraph.bottom_border {
            let size = border.width_eighths.to_string();
            let space = border.space_pt.to_string();
            let color = border.color.hex();
            xml.open("w:pBdr", &[])?;
            xml.empty(
                "w:bottom",
                &[
                    ("w:val", "single"),
                    ("w:sz", &size),
                    ("w:space", &space),
                    ("w:color", &color),
                ],
            )?;
            xml.close("w:pBdr")?;
        }
        if let Some(after) = paragraph.space_after_pt {
            let after = pt_to_twips(after).to_string();
            xml.empty("w:spacing", &[("w:after", &after)])?;
        }
        if let Some(indent) = paragraph.left_indent_in {
            let indent = in_to_twips(indent).to_string();
            xml.empty("w:ind", &[("w:left", &indent)])?;
        }
        xml.close("w:pPr")?;
    }

    for run in &paragraph.runs {
        write_run(xml, run)?;
    }

    xml.close("w:p")
}

fn write_run(xml: &mut XmlPart, run: &Run) -> Result<(), RenderError> {
    xml.open("w:r", &[])?;

    if run.bold || run.italic || run.size_pt.is_some() {
        xml.open("w:rPr", &[])?;
        if run.bold {
            xml.empty("w:b", &[])?;
        }
        if run.italic {
            xml.empty("w:i", &[])?;
        }
        if let Some(size) = run.size_pt {
            write_size(xml, size)?;
        }
        xml.close("w:rPr")?;
    }

    xml.open("w:t", &[("xml:space", "preserve")])?;
    xml.text(&run.text)?;
    xml.close("w:t")?;

    xml.close("w:r")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::styles::StyleId;
    use std::io::Read;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut xml = String::new();
        part.read_to_string(&mut xml).unwrap();
        xml
    }

    fn sample_document() -> Document {
        let mut doc = Document::new();
        doc.add_text(StyleId::Name, "Ada Lovelace");
        doc.push(
            Paragraph::styled(StyleId::Body)
                .with_run(Run::bold("R&D: "))
                .with_text("<engines>"),
        );
        doc.add_divider();
        doc
    }

    #[test]
    fn test_container_holds_all_parts() {
        let bytes = write_docx(&sample_document(), &StyleRegistry::standard()).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/app.xml",
            "word/_rels/document.xml.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/settings.xml",
        ] {
            assert!(names.contains(&expected), "missing part {expected}");
        }
    }

    #[test]
    fn test_document_xml_escapes_text_and_references_styles() {
        let bytes = write_docx(&sample_document(), &StyleRegistry::standard()).unwrap();
        let xml = read_part(&bytes, "word/document.xml");

        assert!(xml.contains(r#"<w:pStyle w:val="CVName"/>"#));
        assert!(xml.contains("Ada Lovelace"));
        assert!(xml.contains("R&amp;D: "));
        assert!(xml.contains("&lt;engines&gt;"));
        assert!(xml.contains("<w:b/>"));
    }

    #[test]
    fn test_document_xml_writes_divider_and_margins() {
        let bytes = write_docx(&sample_document(), &StyleRegistry::standard()).unwrap();
        let xml = read_part(&bytes, "word/document.xml");

        assert!(xml.contains(
            r#"<w:bottom w:val="single" w:sz="4" w:space="1" w:color="CCCCCC"/>"#
        ));
        assert!(xml.contains(r#"<w:spacing w:after="240"/>"#));
        assert!(xml.contains(r#"w:top="1008" w:right="1008" w:bottom="1008" w:left="1008""#));
    }

    #[test]
    fn test_styles_xml_carries_style_table() {
        let bytes = write_docx(&Document::new(), &StyleRegistry::standard()).unwrap();
        let xml = read_part(&bytes, "word/styles.xml");

        assert!(xml.contains(r#"w:styleId="CVName""#));
        assert!(xml.contains(r#"<w:name w:val="CV Section"/>"#));
        assert!(xml.contains(r#"w:ascii="Georgia""#));
        assert!(xml.contains(r#"<w:color w:val="002060"/>"#));
        assert!(xml.contains("<w:caps/>"));
        assert!(xml.contains(r#"<w:sz w:val="48"/>"#));
        assert!(xml.contains(r#"<w:spacing w:before="240" w:after="120"/>"#));
        assert!(xml.contains(r#"<w:jc w:val="center"/>"#));
    }

    #[test]
    fn test_bullet_indent_and_run_overrides() {
        let mut doc = Document::new();
        doc.push(
            Paragraph::styled(StyleId::Body)
                .with_text("\u{2022} Built X")
                .with_left_indent(0.25),
        );
        doc.push(Paragraph::styled(StyleId::Contact).with_run(Run {
            size_pt: Some(14.0),
            italic: true,
            ..Run::plain("Engineer")
        }));
        let bytes = write_docx(&doc, &StyleRegistry::standard()).unwrap();
        let xml = read_part(&bytes, "word/document.xml");

        assert!(xml.contains(r#"<w:ind w:left="360"/>"#));
        assert!(xml.contains("\u{2022} Built X"));
        assert!(xml.contains(r#"<w:rPr><w:i/><w:sz w:val="28"/><w:szCs w:val="28"/></w:rPr>"#));
    }

    #[test]
    fn test_same_document_serializes_to_same_bytes() {
        let styles = StyleRegistry::standard();
        let first = write_docx(&sample_document(), &styles).unwrap();
        let second = write_docx(&sample_document(), &styles).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_control_characters_are_dropped_from_text() {
        let mut doc = Document::new();
        doc.add_text(StyleId::Body, "bad\u{0001}char\u{000B}s\u{FFFE}");
        let bytes = write_docx(&doc, &StyleRegistry::standard()).unwrap();
        let xml = read_part(&bytes, "word/document.xml");

        assert!(xml.contains("badchars"));
        assert!(!xml.contains('\u{0001}'));
        assert!(!xml.contains('\u{000B}'));
        assert!(!xml.contains('\u{FFFE}'));
    }

    #[test]
    fn test_xml_chars_keeps_legal_text_borrowed() {
        assert!(matches!(xml_chars("tab\there\nline \u{1F600}"), Cow::Borrowed(_)));
        assert_eq!(xml_chars("a\u{0000}b\u{001F}c\rd"), "abc\rd");
    }
}
