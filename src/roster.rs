//! Roster import: the tab-delimited attendee list.
//!
//! The input format is a UTF-8 text file, one attendee per line, fields
//! separated by tabs with `|` as the quote character:
//!
//! ```text
//! Name<TAB>Affiliation
//! Alice Chen<TAB>Lab A
//! Bob Okafor<TAB>Lab B
//! ```
//!
//! The first row is a header and is always skipped, whatever it contains.
//! Each data row must carry at least two fields; extra fields are ignored.
//! Field text passes through untouched — no trimming, no deduplication.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// One attendee: a (name, affiliation) pair.
///
/// Records have no identity beyond their position in the roster; duplicate
/// pairs are legitimate and preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub affiliation: String,
}

impl Record {
    pub fn new(name: impl Into<String>, affiliation: impl Into<String>) -> Self {
        Record {
            name: name.into(),
            affiliation: affiliation.into(),
        }
    }
}

/// An ordered roster of [`Record`]s, in source-file order.
///
/// Parsed once, never mutated; the layout engine iterates it to place one
/// badge per record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    records: Vec<Record>,
}

impl Roster {
    /// Import a roster from a tab-delimited file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use lanyard::Roster;
    ///
    /// let roster = Roster::from_path("names.txt")?;
    /// println!("{} attendees", roster.len());
    /// # Ok::<(), lanyard::Error>(())
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Roster> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Import a roster from any [`Read`] source.
    ///
    /// Fails with [`Error::Csv`] if the source cannot be decoded as UTF-8,
    /// or [`Error::ShortRow`] on a data row with fewer than two fields.
    pub fn from_reader<R: Read>(reader: R) -> Result<Roster> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .quote(b'|')
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for (index, row) in csv_reader.records().enumerate() {
            let row = row?;
            match (row.get(0), row.get(1)) {
                (Some(name), Some(affiliation)) => {
                    records.push(Record::new(name, affiliation));
                }
                _ => {
                    // +2: 1-based, plus the header row.
                    let line = row
                        .position()
                        .map(|pos| pos.line())
                        .unwrap_or(index as u64 + 2);
                    return Err(Error::ShortRow { line });
                }
            }
        }

        Ok(Roster { records })
    }

    /// Build a roster directly from records, bypassing the file format.
    pub fn from_records(records: Vec<Record>) -> Roster {
        Roster { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
