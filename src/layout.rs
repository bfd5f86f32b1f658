//! Card layout: one badge table per roster record, with breaks and sizing.
//!
//! The engine appends a 3-row table per record (event title / name /
//! affiliation), a line break after every card, a column break after every
//! third card, and a page break (plus a trailing line break) after every
//! sixth — the page break supersedes that card's column break. A final pass
//! fixes row heights on every table in the document, template tables
//! included.

use crate::document::{Break, Document, Length};
use crate::error::{Error, Result};
use crate::roster::{Record, Roster};

/// Fixed badge row heights: 0.5" title row, 1" name row, 1" affiliation row.
pub const ROW_HEIGHTS: [Length; 3] = [
    Length::from_twips(720),
    Length::from_twips(1440),
    Length::from_twips(1440),
];

/// Grid policy for the card layout.
///
/// The defaults reproduce the classic badge sheet: two columns of three,
/// six badges per page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutOptions {
    /// A page break is inserted after every this-many cards.
    pub cards_per_page: usize,
    /// A column break is inserted after every this-many cards, unless a
    /// page break lands on the same card.
    pub cards_per_column: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            cards_per_page: 6,
            cards_per_column: 3,
        }
    }
}

/// Lay out one badge card per roster record with the default 6-per-page,
/// 3-per-column grid.
///
/// Fails with [`Error::UnknownStyle`] — before any mutation — if `style`
/// does not name a table style known to the document.
///
/// # Example
///
/// ```
/// use lanyard::{Document, Record, Roster, layout_cards};
///
/// let mut doc = Document::new();
/// doc.define_table_style("Badge");
/// let roster = Roster::from_records(vec![
///     Record::new("Alice", "Lab A"),
///     Record::new("Bob", "Lab B"),
/// ]);
/// layout_cards(&mut doc, &roster, "Retreat", "Badge").unwrap();
/// assert_eq!(doc.tables().count(), 2);
/// ```
pub fn layout_cards(doc: &mut Document, roster: &Roster, event: &str, style: &str) -> Result<()> {
    layout_cards_with(doc, roster, event, style, &LayoutOptions::default())
}

/// [`layout_cards`] with an explicit grid policy.
pub fn layout_cards_with(
    doc: &mut Document,
    roster: &Roster,
    event: &str,
    style: &str,
    options: &LayoutOptions,
) -> Result<()> {
    if !doc.has_table_style(style) {
        return Err(Error::UnknownStyle(style.to_string()));
    }

    let mut cards = 0usize;
    for record in roster.iter() {
        append_card(doc, event, record, style);
        doc.append_break(Break::Line);
        cards += 1;

        // The counter is never reset, so the column cycle restarts
        // naturally after each page break.
        if options.cards_per_page > 0 && cards % options.cards_per_page == 0 {
            doc.append_break(Break::Page);
            doc.append_break(Break::Line);
        } else if options.cards_per_column > 0 && cards % options.cards_per_column == 0 {
            doc.append_break(Break::Column);
        }
    }

    normalize_row_heights(doc);
    Ok(())
}

/// One card: a 3-row, 1-column table carrying title, name, affiliation.
fn append_card(doc: &mut Document, event: &str, record: &Record, style: &str) {
    let table = doc.append_table(3, 1, style);
    let texts = [event, record.name.as_str(), record.affiliation.as_str()];
    for (row, text) in table.rows.iter_mut().zip(texts) {
        row.cells[0].set_text(text);
    }
}

/// Set badge row heights on every body-level table in the document.
///
/// Rows 0/1/2 get the fixed [`ROW_HEIGHTS`]; rows beyond index 2 are left
/// alone. Idempotent, and applied to pre-existing template tables as well
/// as freshly laid-out cards.
pub fn normalize_row_heights(doc: &mut Document) {
    for table in doc.tables_mut() {
        for (row, height) in table.rows.iter_mut().zip(ROW_HEIGHTS) {
            row.height = Some(height);
        }
    }
}
