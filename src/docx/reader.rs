use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

use crate::document::{
    Block, Break, Cell, Document, Length, Paragraph, ParagraphChild, Row, Run, RunChild, Table,
    TableStyle,
};
use crate::error::{Error, Result};

/// Read a `.docx` template from disk into a [`Document`].
///
/// Parses the body (`word/document.xml`) into typed blocks, scans
/// `word/styles.xml` for the table-style catalog, and carries every other
/// package part through untouched so the writer can reproduce it.
///
/// # Example
///
/// ```no_run
/// use lanyard::read_docx;
///
/// let doc = read_docx("template.docx")?;
/// println!("Styles: {:?}", doc.table_styles().collect::<Vec<_>>());
/// # Ok::<(), lanyard::Error>(())
/// ```
pub fn read_docx<P: AsRef<Path>>(path: P) -> Result<Document> {
    let file = std::fs::File::open(path)?;
    read_docx_from_reader(file)
}

/// Read a `.docx` package from any [`Read`] + [`Seek`] source.
///
/// Useful for reading from memory buffers.
pub fn read_docx_from_reader<R: Read + Seek>(reader: R) -> Result<Document> {
    let mut archive = ZipArchive::new(reader)?;
    let mut doc = Document::default();

    let mut document_xml: Option<Vec<u8>> = None;
    let mut styles_xml: Option<Vec<u8>> = None;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().to_string();
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        match name.as_str() {
            "word/document.xml" => document_xml = Some(data),
            "word/styles.xml" => {
                styles_xml = Some(data.clone());
                doc.resources.insert(name, data);
            }
            _ => {
                doc.resources.insert(name, data);
            }
        }
    }

    let document_xml = document_xml
        .ok_or_else(|| Error::InvalidDocx("missing word/document.xml".to_string()))?;
    let xml = String::from_utf8(strip_bom(&document_xml).to_vec())?;
    parse_document(&xml, &mut doc)?;

    if let Some(styles_xml) = styles_xml {
        let xml = String::from_utf8(strip_bom(&styles_xml).to_vec())?;
        doc.styles = parse_styles(&xml)?;
    }

    Ok(doc)
}

/// Parse `word/document.xml` into the document's body, section properties,
/// and root-element tags.
fn parse_document(xml: &str, doc: &mut Document) -> Result<()> {
    let mut reader = Reader::from_str(xml);

    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) => match local_name(e.name().as_ref()) {
                b"document" => {
                    // Keep the template's start tag so its namespace
                    // declarations survive regeneration.
                    doc.root_start = Some(xml[pos..reader.buffer_position() as usize].to_string());
                    doc.root_end =
                        Some(format!("</{}>", String::from_utf8_lossy(e.name().as_ref())));
                }
                b"body" => {}
                b"p" => {
                    let paragraph = parse_paragraph(&mut reader, xml)?;
                    doc.body.push(Block::Paragraph(paragraph));
                }
                b"tbl" => {
                    let table = parse_table(&mut reader, xml)?;
                    doc.body.push(Block::Table(table));
                }
                b"sectPr" => {
                    doc.sect_props = Some(capture(&mut reader, xml, pos, &e)?.to_string());
                }
                _ => {
                    let raw = capture(&mut reader, xml, pos, &e)?;
                    doc.body.push(Block::Raw(raw.to_string()));
                }
            },
            Event::Empty(e) => match local_name(e.name().as_ref()) {
                b"p" => doc.body.push(Block::Paragraph(Paragraph::default())),
                b"body" | b"document" => {}
                _ => {
                    let raw = &xml[pos..reader.buffer_position() as usize];
                    doc.body.push(Block::Raw(raw.to_string()));
                }
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(())
}

fn parse_paragraph<'a>(reader: &mut Reader<&'a [u8]>, xml: &'a str) -> Result<Paragraph> {
    let mut paragraph = Paragraph::default();

    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) => match local_name(e.name().as_ref()) {
                b"pPr" => paragraph.props = Some(capture(reader, xml, pos, &e)?.to_string()),
                b"r" => paragraph
                    .content
                    .push(ParagraphChild::Run(parse_run(reader, xml)?)),
                _ => {
                    let raw = capture(reader, xml, pos, &e)?;
                    paragraph.content.push(ParagraphChild::Raw(raw.to_string()));
                }
            },
            Event::Empty(e) => match local_name(e.name().as_ref()) {
                b"r" => paragraph.content.push(ParagraphChild::Run(Run::default())),
                b"pPr" => {
                    paragraph.props = Some(xml[pos..reader.buffer_position() as usize].to_string())
                }
                _ => {
                    let raw = &xml[pos..reader.buffer_position() as usize];
                    paragraph.content.push(ParagraphChild::Raw(raw.to_string()));
                }
            },
            Event::End(e) if local_name(e.name().as_ref()) == b"p" => break,
            Event::Eof => return Err(Error::InvalidDocx("unterminated paragraph".to_string())),
            _ => {}
        }
    }

    Ok(paragraph)
}

fn parse_run<'a>(reader: &mut Reader<&'a [u8]>, xml: &'a str) -> Result<Run> {
    let mut run = Run::default();

    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) => match local_name(e.name().as_ref()) {
                b"rPr" => run.props = Some(capture(reader, xml, pos, &e)?.to_string()),
                b"t" => run.content.push(RunChild::Text(read_text(reader)?)),
                b"br" => {
                    let kind = parse_break(&e);
                    capture(reader, xml, pos, &e)?;
                    run.content.push(RunChild::Break(kind));
                }
                _ => {
                    let raw = capture(reader, xml, pos, &e)?;
                    run.content.push(RunChild::Raw(raw.to_string()));
                }
            },
            Event::Empty(e) => match local_name(e.name().as_ref()) {
                b"br" => run.content.push(RunChild::Break(parse_break(&e))),
                b"cr" => run.content.push(RunChild::Break(Break::Line)),
                b"t" => run.content.push(RunChild::Text(String::new())),
                b"rPr" => {
                    run.props = Some(xml[pos..reader.buffer_position() as usize].to_string())
                }
                _ => {
                    let raw = &xml[pos..reader.buffer_position() as usize];
                    run.content.push(RunChild::Raw(raw.to_string()));
                }
            },
            Event::End(e) if local_name(e.name().as_ref()) == b"r" => break,
            Event::Eof => return Err(Error::InvalidDocx("unterminated run".to_string())),
            _ => {}
        }
    }

    Ok(run)
}

fn parse_table<'a>(reader: &mut Reader<&'a [u8]>, xml: &'a str) -> Result<Table> {
    let mut table = Table::default();

    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) => match local_name(e.name().as_ref()) {
                b"tblPr" => {
                    let (style, props) = parse_table_props(reader, xml)?;
                    table.style = style;
                    table.props = props;
                }
                b"tblGrid" => table.grid = Some(capture(reader, xml, pos, &e)?.to_string()),
                b"tr" => table.rows.push(parse_row(reader, xml)?),
                _ => {
                    capture(reader, xml, pos, &e)?;
                }
            },
            Event::Empty(_) => {}
            Event::End(e) if local_name(e.name().as_ref()) == b"tbl" => break,
            Event::Eof => return Err(Error::InvalidDocx("unterminated table".to_string())),
            _ => {}
        }
    }

    Ok(table)
}

/// Parse `w:tblPr`, splitting out the style reference from the remaining
/// properties (kept raw).
fn parse_table_props<'a>(
    reader: &mut Reader<&'a [u8]>,
    xml: &'a str,
) -> Result<(Option<String>, Option<String>)> {
    let mut style = None;
    let mut rest = String::new();

    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) => {
                if local_name(e.name().as_ref()) == b"tblStyle" {
                    style = attr_value(&e, b"val")?;
                    capture(reader, xml, pos, &e)?;
                } else {
                    rest.push_str(capture(reader, xml, pos, &e)?);
                }
            }
            Event::Empty(e) => {
                if local_name(e.name().as_ref()) == b"tblStyle" {
                    style = attr_value(&e, b"val")?;
                } else {
                    rest.push_str(&xml[pos..reader.buffer_position() as usize]);
                }
            }
            Event::End(e) if local_name(e.name().as_ref()) == b"tblPr" => break,
            Event::Eof => {
                return Err(Error::InvalidDocx(
                    "unterminated table properties".to_string(),
                ));
            }
            _ => {}
        }
    }

    Ok((style, (!rest.is_empty()).then_some(rest)))
}

fn parse_row<'a>(reader: &mut Reader<&'a [u8]>, xml: &'a str) -> Result<Row> {
    let mut row = Row::default();

    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) => match local_name(e.name().as_ref()) {
                b"trPr" => {
                    let (height, props) = parse_row_props(reader, xml)?;
                    row.height = height;
                    row.props = props;
                }
                b"tc" => row.cells.push(parse_cell(reader, xml)?),
                _ => {
                    capture(reader, xml, pos, &e)?;
                }
            },
            Event::Empty(_) => {}
            Event::End(e) if local_name(e.name().as_ref()) == b"tr" => break,
            Event::Eof => return Err(Error::InvalidDocx("unterminated table row".to_string())),
            _ => {}
        }
    }

    Ok(row)
}

/// Parse `w:trPr`, splitting out the row height from the remaining
/// properties (kept raw).
fn parse_row_props<'a>(
    reader: &mut Reader<&'a [u8]>,
    xml: &'a str,
) -> Result<(Option<Length>, Option<String>)> {
    let mut height = None;
    let mut rest = String::new();

    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) => {
                if local_name(e.name().as_ref()) == b"trHeight" {
                    height = parse_height(&e)?;
                    capture(reader, xml, pos, &e)?;
                } else {
                    rest.push_str(capture(reader, xml, pos, &e)?);
                }
            }
            Event::Empty(e) => {
                if local_name(e.name().as_ref()) == b"trHeight" {
                    height = parse_height(&e)?;
                } else {
                    rest.push_str(&xml[pos..reader.buffer_position() as usize]);
                }
            }
            Event::End(e) if local_name(e.name().as_ref()) == b"trPr" => break,
            Event::Eof => {
                return Err(Error::InvalidDocx("unterminated row properties".to_string()));
            }
            _ => {}
        }
    }

    Ok((height, (!rest.is_empty()).then_some(rest)))
}

fn parse_cell<'a>(reader: &mut Reader<&'a [u8]>, xml: &'a str) -> Result<Cell> {
    let mut cell = Cell::default();

    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) => match local_name(e.name().as_ref()) {
                b"tcPr" => cell.props = Some(capture(reader, xml, pos, &e)?.to_string()),
                b"p" => cell
                    .content
                    .push(Block::Paragraph(parse_paragraph(reader, xml)?)),
                b"tbl" => cell.content.push(Block::Table(parse_table(reader, xml)?)),
                _ => {
                    let raw = capture(reader, xml, pos, &e)?;
                    cell.content.push(Block::Raw(raw.to_string()));
                }
            },
            Event::Empty(e) => match local_name(e.name().as_ref()) {
                b"p" => cell.content.push(Block::Paragraph(Paragraph::default())),
                b"tcPr" => {
                    cell.props = Some(xml[pos..reader.buffer_position() as usize].to_string())
                }
                _ => {
                    let raw = &xml[pos..reader.buffer_position() as usize];
                    cell.content.push(Block::Raw(raw.to_string()));
                }
            },
            Event::End(e) if local_name(e.name().as_ref()) == b"tc" => break,
            Event::Eof => return Err(Error::InvalidDocx("unterminated table cell".to_string())),
            _ => {}
        }
    }

    Ok(cell)
}

/// Scan `word/styles.xml` for table styles.
fn parse_styles(xml: &str) -> Result<Vec<TableStyle>> {
    let mut reader = Reader::from_str(xml);
    let mut styles = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) if local_name(e.name().as_ref()) == b"style" => {
                let is_table = attr_value(&e, b"type")?.as_deref() == Some("table");
                let id = attr_value(&e, b"styleId")?;
                let mut name = None;

                loop {
                    match reader.read_event()? {
                        Event::Start(child) => {
                            let end = child.to_end().into_owned();
                            reader.read_to_end(end.name())?;
                        }
                        Event::Empty(child) => {
                            if local_name(child.name().as_ref()) == b"name" {
                                name = attr_value(&child, b"val")?;
                            }
                        }
                        Event::End(end) if local_name(end.name().as_ref()) == b"style" => break,
                        Event::Eof => {
                            return Err(Error::InvalidDocx(
                                "unterminated style definition".to_string(),
                            ));
                        }
                        _ => {}
                    }
                }

                if is_table && let Some(id) = id {
                    styles.push(TableStyle {
                        name: name.unwrap_or_else(|| id.clone()),
                        id,
                    });
                }
            }
            Event::Empty(e) if local_name(e.name().as_ref()) == b"style" => {
                if attr_value(&e, b"type")?.as_deref() == Some("table")
                    && let Some(id) = attr_value(&e, b"styleId")?
                {
                    styles.push(TableStyle {
                        name: id.clone(),
                        id,
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(styles)
}

/// Break kind from a `w:br` element's `w:type` attribute; absent means a
/// plain line break.
fn parse_break(e: &BytesStart) -> Break {
    for attr in e.attributes().flatten() {
        if local_name(attr.key.as_ref()) == b"type" {
            return match attr.value.as_ref() {
                b"page" => Break::Page,
                b"column" => Break::Column,
                _ => Break::Line,
            };
        }
    }
    Break::Line
}

fn parse_height(e: &BytesStart) -> Result<Option<Length>> {
    Ok(attr_value(e, b"val")?
        .and_then(|val| val.parse().ok())
        .map(Length::from_twips))
}

/// Text content of a `w:t` element, resolving entity references.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Text(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::GeneralRef(e) => {
                text.push_str(&resolve_entity(&String::from_utf8_lossy(e.as_ref())));
            }
            Event::End(_) => break,
            Event::Eof => return Err(Error::InvalidDocx("unterminated text element".to_string())),
            _ => {}
        }
    }

    Ok(text)
}

/// Resolve the predefined XML entities and numeric character references;
/// unknown entities resolve to nothing.
fn resolve_entity(entity: &str) -> String {
    match entity {
        "apos" => "'".to_string(),
        "quot" => "\"".to_string(),
        "lt" => "<".to_string(),
        "gt" => ">".to_string(),
        "amp" => "&".to_string(),
        _ => entity
            .strip_prefix('#')
            .and_then(|num| {
                let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                    Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                    None => num.parse().ok()?,
                };
                char::from_u32(code)
            })
            .map(String::from)
            .unwrap_or_default(),
    }
}

/// Raw text of a whole element, start tag through matching end tag.
fn capture<'a>(
    reader: &mut Reader<&'a [u8]>,
    xml: &'a str,
    start: usize,
    e: &BytesStart,
) -> Result<&'a str> {
    let end = e.to_end().into_owned();
    reader.read_to_end(end.name())?;
    Ok(&xml[start..reader.buffer_position() as usize])
}

fn attr_value(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes().flatten() {
        if local_name(attr.key.as_ref()) == name {
            return Ok(Some(String::from_utf8(attr.value.to_vec())?));
        }
    }
    Ok(None)
}

/// Strip UTF-8 BOM (byte order mark) if present
fn strip_bom(data: &[u8]) -> &[u8] {
    // UTF-8 BOM: EF BB BF
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &data[3..]
    } else {
        data
    }
}

/// Extract local name from potentially namespaced XML name
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}
