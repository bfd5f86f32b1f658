//! In-memory document model.
//!
//! A [`Document`] is the format-agnostic middle ground between the DOCX
//! container layer and the card layout engine: an ordered sequence of
//! block-level content (paragraphs and tables) plus the table-style catalog
//! and any template package parts carried through untouched.
//!
//! The model types only what the layout engine manipulates — text runs,
//! breaks, table cells, row heights. Template markup outside that subset is
//! preserved as raw WordprocessingML (the `props` fields and the `Raw`
//! variants) and re-emitted verbatim on write.

use std::collections::HashMap;

/// A length in twentieths of a point (twips), the WordprocessingML
/// row-height unit. One inch is 1440 twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Length(u32);

impl Length {
    pub const fn from_twips(twips: u32) -> Self {
        Length(twips)
    }

    pub fn inches(inches: f64) -> Self {
        Length((inches * 1440.0).round() as u32)
    }

    pub const fn as_twips(self) -> u32 {
        self.0
    }
}

/// A structural break controlling print flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Break {
    Line,
    Column,
    Page,
}

/// Block-level content: the direct children of the document body (and of
/// table cells).
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    /// Body-level markup outside the modeled subset, passed through verbatim.
    Raw(String),
}

/// A paragraph: optional raw `w:pPr` plus ordered children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    /// Raw `<w:pPr>…</w:pPr>` element, if the paragraph has one.
    pub props: Option<String>,
    pub content: Vec<ParagraphChild>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParagraphChild {
    Run(Run),
    Raw(String),
}

/// A text run: optional raw `w:rPr` plus ordered text, breaks, and
/// passthrough markup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    /// Raw `<w:rPr>…</w:rPr>` element, if the run has one.
    pub props: Option<String>,
    pub content: Vec<RunChild>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunChild {
    Text(String),
    Break(Break),
    Raw(String),
}

/// A table: style reference, raw leftover properties, and rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Style identifier from `w:tblStyle`, resolved against the document's
    /// style catalog.
    pub style: Option<String>,
    /// Raw `w:tblPr` children other than the style reference.
    pub props: Option<String>,
    /// Raw `<w:tblGrid>…</w:tblGrid>` element; generated when absent.
    pub grid: Option<String>,
    pub rows: Vec<Row>,
}

/// A table row with an optional fixed height.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub height: Option<Length>,
    /// Raw `w:trPr` children other than the height.
    pub props: Option<String>,
    pub cells: Vec<Cell>,
}

/// A table cell holding block content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    /// Raw `<w:tcPr>…</w:tcPr>` element, if the cell has one.
    pub props: Option<String>,
    pub content: Vec<Block>,
}

/// A named table style available to badge tables.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub id: String,
    pub name: String,
}

/// Default section setup for from-scratch documents: US Letter, 0.5"
/// margins, two columns (badge layout relies on column breaks).
pub(crate) const DEFAULT_SECT_PROPS: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="720" w:right="720" w:bottom="720" w:left="720" w:header="720" w:footer="720" w:gutter="0"/><w:cols w:num="2" w:space="144"/></w:sectPr>"#;

/// A mutable word-processing document.
///
/// Holds ordered body content, the table-style catalog, and — when opened
/// from a template — every package part other than the body, preserved
/// byte-for-byte for the writer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub body: Vec<Block>,
    /// Raw trailing `w:sectPr` (page size, margins, column layout).
    pub(crate) sect_props: Option<String>,
    pub(crate) styles: Vec<TableStyle>,
    /// Template package parts carried through unchanged, keyed by part name.
    pub(crate) resources: HashMap<String, Vec<u8>>,
    /// Raw `<w:document …>` start tag from the template, preserving its
    /// namespace declarations; a default is used when absent.
    pub(crate) root_start: Option<String>,
    pub(crate) root_end: Option<String>,
}

impl Document {
    /// Create a blank single-section document with a two-column page setup
    /// and the default table-style catalog.
    pub fn new() -> Self {
        Document {
            sect_props: Some(DEFAULT_SECT_PROPS.to_string()),
            styles: vec![TableStyle {
                id: "TableNormal".to_string(),
                name: "Normal Table".to_string(),
            }],
            ..Default::default()
        }
    }

    /// Append an empty paragraph and return a handle to it.
    pub fn append_paragraph(&mut self) -> &mut Paragraph {
        self.body.push(Block::Paragraph(Paragraph::default()));
        let Some(Block::Paragraph(paragraph)) = self.body.last_mut() else {
            unreachable!()
        };
        paragraph
    }

    /// Append a `rows` × `cols` table styled with `style` and return a
    /// handle to it. Cells start empty.
    pub fn append_table(&mut self, rows: usize, cols: usize, style: impl Into<String>) -> &mut Table {
        let table = Table {
            style: Some(style.into()),
            rows: (0..rows)
                .map(|_| Row {
                    cells: (0..cols).map(|_| Cell::default()).collect(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };
        self.body.push(Block::Table(table));
        let Some(Block::Table(table)) = self.body.last_mut() else {
            unreachable!()
        };
        table
    }

    /// Append a paragraph whose single run carries the given break.
    pub fn append_break(&mut self, kind: Break) {
        let paragraph = self.append_paragraph();
        paragraph.add_run().add_break(kind);
    }

    /// Iterate the body-level tables in document order. Tables nested
    /// inside cells are not enumerated.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }

    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.body.iter_mut().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }

    /// Whether `id` names a table style known to this document.
    pub fn has_table_style(&self, id: &str) -> bool {
        self.styles.iter().any(|style| style.id == id)
    }

    /// Identifiers of the table styles known to this document.
    pub fn table_styles(&self) -> impl Iterator<Item = &str> {
        self.styles.iter().map(|style| style.id.as_str())
    }

    /// Register a plain table style so from-scratch documents can satisfy
    /// the layout engine's style probe. No-op if the id is already known.
    pub fn define_table_style(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.has_table_style(&id) {
            self.styles.push(TableStyle {
                name: id.clone(),
                id,
            });
        }
    }

    /// Names of the template package parts carried by this document.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// Raw bytes of a carried template part.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.resources.get(name).map(Vec::as_slice)
    }
}

impl Paragraph {
    /// Append an empty run and return a handle to it.
    pub fn add_run(&mut self) -> &mut Run {
        self.content.push(ParagraphChild::Run(Run::default()));
        let Some(ParagraphChild::Run(run)) = self.content.last_mut() else {
            unreachable!()
        };
        run
    }

    /// Concatenated text of the paragraph's runs.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for child in &self.content {
            if let ParagraphChild::Run(run) = child {
                for item in &run.content {
                    if let RunChild::Text(t) = item {
                        text.push_str(t);
                    }
                }
            }
        }
        text
    }
}

impl Run {
    pub fn add_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.content.push(RunChild::Text(text.into()));
        self
    }

    pub fn add_break(&mut self, kind: Break) -> &mut Self {
        self.content.push(RunChild::Break(kind));
        self
    }
}

impl Table {
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row)?.cells.get(col)
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row)?.cells.get_mut(col)
    }
}

impl Cell {
    /// Replace the cell's content with a single paragraph of plain text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let mut paragraph = Paragraph::default();
        paragraph.add_run().add_text(text);
        self.content = vec![Block::Paragraph(paragraph)];
    }

    /// Text of the cell's paragraphs, joined with newlines.
    pub fn text(&self) -> String {
        let paragraphs: Vec<String> = self
            .content
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(p) => Some(p.text()),
                _ => None,
            })
            .collect();
        paragraphs.join("\n")
    }
}
