//! Roster import tests: tab-delimited files, header handling, sharp edges.

use std::io::Cursor;
use std::io::Write;

use lanyard::{Error, Record, Roster};
use tempfile::NamedTempFile;

fn import(input: &str) -> Roster {
    Roster::from_reader(Cursor::new(input.as_bytes())).expect("Failed to import roster")
}

#[test]
fn test_imports_rows_in_file_order() {
    let roster = import("Name\tAffiliation\nAlice\tLab A\nBob\tLab B\nCarol\tLab C\n");
    assert_eq!(
        roster.records(),
        &[
            Record::new("Alice", "Lab A"),
            Record::new("Bob", "Lab B"),
            Record::new("Carol", "Lab C"),
        ]
    );
}

#[test]
fn test_header_is_skipped_whatever_it_contains() {
    // A header that looks exactly like a data row is still dropped.
    let roster = import("Dave\tLab D\nAlice\tLab A\n");
    assert_eq!(roster.records(), &[Record::new("Alice", "Lab A")]);
}

#[test]
fn test_header_only_file_is_empty() {
    let roster = import("Name\tAffiliation\n");
    assert!(roster.is_empty());
    assert_eq!(roster.len(), 0);
}

#[test]
fn test_empty_file_is_empty() {
    let roster = import("");
    assert!(roster.is_empty());
}

#[test]
fn test_duplicate_rows_are_preserved() {
    let roster = import("Name\tAffiliation\nAlice\tLab A\nAlice\tLab A\n");
    assert_eq!(roster.len(), 2);
    assert_eq!(roster.records()[0], roster.records()[1]);
}

#[test]
fn test_extra_fields_are_ignored() {
    let roster = import("Name\tAffiliation\tExtra\nAlice\tLab A\tbadge-7\tvegetarian\n");
    assert_eq!(roster.records(), &[Record::new("Alice", "Lab A")]);
}

#[test]
fn test_fields_pass_through_untrimmed() {
    let roster = import("Name\tAffiliation\n Alice \t Lab A \n");
    assert_eq!(roster.records(), &[Record::new(" Alice ", " Lab A ")]);
}

#[test]
fn test_pipe_quotes_protect_embedded_tabs() {
    let roster = import("Name\tAffiliation\n|Ada\tLovelace|\tMathematics\n");
    assert_eq!(
        roster.records(),
        &[Record::new("Ada\tLovelace", "Mathematics")]
    );
}

#[test]
fn test_short_row_is_a_parse_error() {
    let err = Roster::from_reader(Cursor::new(
        "Name\tAffiliation\nAlice\tLab A\nJustAName\n".as_bytes(),
    ))
    .expect_err("single-field row should not import");
    match err {
        Error::ShortRow { line } => assert_eq!(line, 3),
        other => panic!("expected ShortRow, got {other:?}"),
    }
}

#[test]
fn test_invalid_utf8_is_a_parse_error() {
    let mut input = b"Name\tAffiliation\nAl".to_vec();
    input.push(0xFF);
    input.extend_from_slice(b"ce\tLab A\n");

    let err = Roster::from_reader(Cursor::new(input)).expect_err("garbled bytes should not import");
    assert!(matches!(err, Error::Csv(_)), "expected Csv, got {err:?}");
}

#[test]
fn test_from_path_reads_a_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(b"Name\tAffiliation\nAlice\tLab A\n")
        .expect("Failed to write roster");

    let roster = Roster::from_path(file.path()).expect("Failed to import roster");
    assert_eq!(roster.records(), &[Record::new("Alice", "Lab A")]);
}

#[test]
fn test_missing_file_is_an_error() {
    let err = Roster::from_path("no/such/roster.txt").expect_err("missing file should not import");
    assert!(matches!(err, Error::Io(_)), "expected Io, got {err:?}");
}
