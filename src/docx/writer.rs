use std::io::{Seek, Write};
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::document::{
    Block, Break, Cell, Document, Paragraph, ParagraphChild, Row, Run, RunChild, Table,
};
use crate::error::Result;

/// Write a [`Document`] to a `.docx` file on disk.
///
/// `word/document.xml` is regenerated from the document body; for documents
/// opened from a template, every other package part is written back
/// byte-for-byte. From-scratch documents get a minimal valid package.
///
/// # Example
///
/// ```no_run
/// use lanyard::{Document, write_docx};
///
/// let mut doc = Document::new();
/// doc.append_paragraph().add_run().add_text("Hello");
/// write_docx(&doc, "out.docx")?;
/// # Ok::<(), lanyard::Error>(())
/// ```
pub fn write_docx<P: AsRef<Path>>(doc: &Document, path: P) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_docx_to_writer(doc, file)
}

/// Write a [`Document`] to any [`Write`] + [`Seek`] destination.
///
/// Useful for writing to memory buffers. Output is deterministic: the same
/// document always serializes to the same bytes.
pub fn write_docx_to_writer<W: Write + Seek>(doc: &Document, writer: W) -> Result<()> {
    let mut zip = ZipWriter::new(writer);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("word/document.xml", options)?;
    zip.write_all(generate_document_xml(doc).as_bytes())?;

    if doc.resources.is_empty() {
        // From-scratch package: minimal part set.
        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(ROOT_RELS_XML.as_bytes())?;

        zip.start_file("word/_rels/document.xml.rels", options)?;
        zip.write_all(DOCUMENT_RELS_XML.as_bytes())?;

        zip.start_file("word/styles.xml", options)?;
        zip.write_all(generate_styles_xml(doc).as_bytes())?;
    } else {
        // Template package: every part other than the body, verbatim.
        let mut names: Vec<&String> = doc.resources.keys().collect();
        names.sort();
        for name in names {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(&doc.resources[name])?;
        }
    }

    zip.finish()?;
    Ok(())
}

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const DEFAULT_DOCUMENT_START: &str = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES_START: &str = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#;

const BASE_STYLES: &str = concat!(
    r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>"#,
    r#"<w:style w:type="table" w:default="1" w:styleId="TableNormal"><w:name w:val="Normal Table"/></w:style>"#,
);

const PLAIN_TABLE_BORDERS: &str = concat!(
    r#"<w:tblBorders>"#,
    r#"<w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
    r#"<w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
    r#"<w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
    r#"<w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
    r#"<w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
    r#"<w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
    r#"</w:tblBorders>"#,
);

fn generate_document_xml(doc: &Document) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);

    match &doc.root_start {
        Some(tag) => xml.push_str(tag),
        None => xml.push_str(DEFAULT_DOCUMENT_START),
    }
    xml.push_str("<w:body>");

    for block in &doc.body {
        write_block(&mut xml, block);
    }

    if let Some(sect) = &doc.sect_props {
        xml.push_str(sect);
    }

    xml.push_str("</w:body>");
    match &doc.root_end {
        Some(tag) => xml.push_str(tag),
        None => xml.push_str("</w:document>"),
    }
    xml
}

fn write_block(xml: &mut String, block: &Block) {
    match block {
        Block::Paragraph(paragraph) => write_paragraph(xml, paragraph),
        Block::Table(table) => write_table(xml, table),
        Block::Raw(raw) => xml.push_str(raw),
    }
}

fn write_paragraph(xml: &mut String, paragraph: &Paragraph) {
    xml.push_str("<w:p>");
    if let Some(props) = &paragraph.props {
        xml.push_str(props);
    }
    for child in &paragraph.content {
        match child {
            ParagraphChild::Run(run) => write_run(xml, run),
            ParagraphChild::Raw(raw) => xml.push_str(raw),
        }
    }
    xml.push_str("</w:p>");
}

fn write_run(xml: &mut String, run: &Run) {
    xml.push_str("<w:r>");
    if let Some(props) = &run.props {
        xml.push_str(props);
    }
    for child in &run.content {
        match child {
            RunChild::Text(text) => {
                // Significant leading/trailing whitespace must be flagged,
                // or consumers collapse it.
                if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
                    xml.push_str(r#"<w:t xml:space="preserve">"#);
                } else {
                    xml.push_str("<w:t>");
                }
                xml.push_str(&escape_xml(text));
                xml.push_str("</w:t>");
            }
            RunChild::Break(Break::Line) => xml.push_str("<w:br/>"),
            RunChild::Break(Break::Column) => xml.push_str(r#"<w:br w:type="column"/>"#),
            RunChild::Break(Break::Page) => xml.push_str(r#"<w:br w:type="page"/>"#),
            RunChild::Raw(raw) => xml.push_str(raw),
        }
    }
    xml.push_str("</w:r>");
}

fn write_table(xml: &mut String, table: &Table) {
    xml.push_str("<w:tbl>");

    xml.push_str("<w:tblPr>");
    if let Some(style) = &table.style {
        xml.push_str(&format!(r#"<w:tblStyle w:val="{}"/>"#, escape_xml(style)));
    }
    if let Some(props) = &table.props {
        xml.push_str(props);
    }
    xml.push_str("</w:tblPr>");

    match &table.grid {
        Some(grid) => xml.push_str(grid),
        None => {
            let cols = table
                .rows
                .iter()
                .map(|row| row.cells.len())
                .max()
                .unwrap_or(0);
            xml.push_str("<w:tblGrid>");
            for _ in 0..cols {
                xml.push_str("<w:gridCol/>");
            }
            xml.push_str("</w:tblGrid>");
        }
    }

    for row in &table.rows {
        write_row(xml, row);
    }

    xml.push_str("</w:tbl>");
}

fn write_row(xml: &mut String, row: &Row) {
    xml.push_str("<w:tr>");
    if row.height.is_some() || row.props.is_some() {
        xml.push_str("<w:trPr>");
        if let Some(height) = row.height {
            xml.push_str(&format!(r#"<w:trHeight w:val="{}"/>"#, height.as_twips()));
        }
        if let Some(props) = &row.props {
            xml.push_str(props);
        }
        xml.push_str("</w:trPr>");
    }
    for cell in &row.cells {
        write_cell(xml, cell);
    }
    xml.push_str("</w:tr>");
}

fn write_cell(xml: &mut String, cell: &Cell) {
    xml.push_str("<w:tc>");
    if let Some(props) = &cell.props {
        xml.push_str(props);
    }
    if cell.content.is_empty() {
        // A cell must hold at least one block.
        xml.push_str("<w:p/>");
    } else {
        for block in &cell.content {
            write_block(xml, block);
        }
    }
    xml.push_str("</w:tc>");
}

fn generate_styles_xml(doc: &Document) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(STYLES_START);
    xml.push_str(BASE_STYLES);

    for style in &doc.styles {
        if style.id == "TableNormal" {
            continue;
        }
        xml.push_str(&format!(
            concat!(
                r#"<w:style w:type="table" w:styleId="{}">"#,
                r#"<w:name w:val="{}"/><w:basedOn w:val="TableNormal"/>"#,
                r#"<w:tblPr>{}</w:tblPr></w:style>"#,
            ),
            escape_xml(&style.id),
            escape_xml(&style.name),
            PLAIN_TABLE_BORDERS,
        ));
    }

    xml.push_str("</w:styles>");
    xml
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
