//! Error types for lanyard operations.

use thiserror::Error;

/// Errors that can occur while importing a roster or building a document.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("roster error: {0}")]
    Csv(#[from] csv::Error),

    #[error("roster row at line {line} has fewer than two fields")]
    ShortRow { line: u64 },

    #[error("unknown table style: {0}")]
    UnknownStyle(String),

    #[error("Invalid DOCX: {0}")]
    InvalidDocx(String),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
