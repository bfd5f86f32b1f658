//! # lanyard
//!
//! A small library (and CLI) for generating printable name badges from an
//! event roster, laid out into a paginated, multi-column `.docx` document.
//!
//! ## Features
//!
//! - Import a tab-delimited roster of (name, affiliation) pairs
//! - Lay out one 3-row badge table per attendee, 3 per column, 6 per page
//! - Read an existing `.docx` template (styles, page setup, boilerplate)
//! - Write the finished batch back out as a `.docx` package
//!
//! ## Quick Start
//!
//! ```no_run
//! use lanyard::{Roster, layout_cards, read_docx, write_docx};
//!
//! // One badge per roster row, styled with the template's "Badge" table style.
//! let roster = Roster::from_path("names.txt").unwrap();
//! let mut doc = read_docx("template.docx").unwrap();
//! layout_cards(&mut doc, &roster, "2024 Retreat", "Badge").unwrap();
//! write_docx(&doc, "badges.docx").unwrap();
//! ```
//!
//! ## Working without a template
//!
//! A [`Document`] can also be built from scratch; define the badge style so
//! the layout engine's style probe resolves:
//!
//! ```
//! use lanyard::{Document, Record, Roster, layout_cards};
//!
//! let mut doc = Document::new();
//! doc.define_table_style("Badge");
//!
//! let roster = Roster::from_records(vec![Record::new("Alice", "Lab A")]);
//! layout_cards(&mut doc, &roster, "Open House", "Badge").unwrap();
//! assert_eq!(doc.tables().count(), 1);
//! ```

pub mod document;
pub mod docx;
pub mod error;
pub mod layout;
pub mod roster;

pub use document::{
    Block, Break, Cell, Document, Length, Paragraph, ParagraphChild, Row, Run, RunChild, Table,
};
pub use docx::{read_docx, read_docx_from_reader, write_docx, write_docx_to_writer};
pub use error::{Error, Result};
pub use layout::{LayoutOptions, layout_cards, layout_cards_with, normalize_row_heights};
pub use roster::{Record, Roster};
