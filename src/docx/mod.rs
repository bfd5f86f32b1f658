//! Reading and writing DOCX packages.
//!
//! A `.docx` file is a ZIP container of WordprocessingML parts. The reader
//! parses the body and style catalog into the [`crate::document`] model and
//! carries every other part through untouched; the writer regenerates
//! `word/document.xml` and reproduces the rest.

mod reader;
mod writer;

pub use reader::{read_docx, read_docx_from_reader};
pub use writer::{write_docx, write_docx_to_writer};
