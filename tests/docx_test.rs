//! DOCX container tests: package layout, template passthrough, round-trips.

use std::io::{Cursor, Read, Write};

use lanyard::{
    Block, Document, Error, Length, Record, Roster, layout_cards, read_docx, read_docx_from_reader,
    write_docx, write_docx_to_writer,
};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

const TEMPLATE_DOCUMENT: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    r#"<w:body>"#,
    r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>Event Template</w:t></w:r></w:p>"#,
    r#"<w:bookmarkStart w:id="0" w:name="_top"/>"#,
    r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:cols w:num="2" w:space="144"/></w:sectPr>"#,
    r#"</w:body></w:document>"#,
);

const TEMPLATE_STYLES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    r#"<w:style w:type="table" w:default="1" w:styleId="TableNormal">"#,
    r#"<w:name w:val="Normal Table"/></w:style>"#,
    r#"<w:style w:type="table" w:styleId="Badge"><w:name w:val="Badge"/></w:style>"#,
    r#"</w:styles>"#,
);

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"</Types>"#,
);

const APP_PROPS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#,
    r#"<Application>lanyard-tests</Application></Properties>"#,
);

/// Build a small but realistic template package in memory.
fn template_docx() -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default();

    for (name, content) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("word/document.xml", TEMPLATE_DOCUMENT),
        ("word/styles.xml", TEMPLATE_STYLES),
        ("docProps/app.xml", APP_PROPS),
    ] {
        zip.start_file(name, options).expect("Failed to add part");
        zip.write_all(content.as_bytes())
            .expect("Failed to write part");
    }

    zip.finish().expect("Failed to finish template");
    buffer.into_inner()
}

fn read_part(package: &[u8], name: &str) -> Vec<u8> {
    let mut archive =
        ZipArchive::new(Cursor::new(package.to_vec())).expect("Failed to open package");
    let mut file = archive.by_name(name).expect("Part not found");
    let mut data = Vec::new();
    file.read_to_end(&mut data).expect("Failed to read part");
    data
}

fn write_to_bytes(doc: &Document) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    write_docx_to_writer(doc, &mut buffer).expect("Failed to write DOCX");
    buffer.into_inner()
}

#[test]
fn test_blank_package_has_minimal_parts() {
    let bytes = write_to_bytes(&Document::new());

    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("Failed to open package");
    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();

    assert_eq!(
        names,
        vec![
            "[Content_Types].xml",
            "_rels/.rels",
            "word/_rels/document.xml.rels",
            "word/document.xml",
            "word/styles.xml",
        ]
    );
}

#[test]
fn test_write_and_read_back_a_badge_run() {
    let mut doc = Document::new();
    doc.define_table_style("Badge");
    let roster = Roster::from_records(vec![
        Record::new("Alice", "Lab A"),
        Record::new("Bob", "Lab B"),
    ]);
    layout_cards(&mut doc, &roster, "Retreat", "Badge").expect("Failed to lay out cards");

    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("badges.docx");
    write_docx(&doc, &path).expect("Failed to write DOCX");

    let reread = read_docx(&path).expect("Failed to read written DOCX");
    assert!(reread.has_table_style("Badge"));

    let tables: Vec<_> = reread.tables().collect();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].cell(0, 0).unwrap().text(), "Retreat");
    assert_eq!(tables[0].cell(1, 0).unwrap().text(), "Alice");
    assert_eq!(tables[0].cell(2, 0).unwrap().text(), "Lab A");
    assert_eq!(tables[1].cell(1, 0).unwrap().text(), "Bob");

    for table in &tables {
        let heights: Vec<_> = table.rows.iter().map(|row| row.height).collect();
        assert_eq!(
            heights,
            vec![
                Some(Length::inches(0.5)),
                Some(Length::inches(1.0)),
                Some(Length::inches(1.0)),
            ]
        );
    }
}

#[test]
fn test_written_output_is_deterministic() {
    let mut doc = Document::new();
    doc.define_table_style("Badge");
    let roster = Roster::from_records(vec![Record::new("Alice", "Lab A")]);
    layout_cards(&mut doc, &roster, "Retreat", "Badge").expect("Failed to lay out cards");

    assert_eq!(write_to_bytes(&doc), write_to_bytes(&doc));
}

#[test]
fn test_template_styles_and_content_are_read() {
    let doc =
        read_docx_from_reader(Cursor::new(template_docx())).expect("Failed to read template");

    assert!(doc.has_table_style("Badge"));
    assert!(doc.has_table_style("TableNormal"));
    assert!(!doc.has_table_style("Nope"));

    // Template body: one styled paragraph plus a raw passthrough bookmark.
    assert_eq!(doc.body.len(), 2);
    let Block::Paragraph(paragraph) = &doc.body[0] else {
        panic!("expected the template paragraph first");
    };
    assert_eq!(paragraph.text(), "Event Template");
    assert!(matches!(&doc.body[1], Block::Raw(raw) if raw.contains("bookmarkStart")));

    assert!(doc.parts().any(|name| name == "docProps/app.xml"));
    assert_eq!(doc.part("docProps/app.xml"), Some(APP_PROPS.as_bytes()));
}

#[test]
fn test_template_roundtrip_preserves_parts_and_markup() {
    let mut doc =
        read_docx_from_reader(Cursor::new(template_docx())).expect("Failed to read template");

    let roster = Roster::from_records(vec![Record::new("Carol", "Lab C")]);
    layout_cards(&mut doc, &roster, "Retreat", "Badge").expect("Failed to lay out cards");

    let output = write_to_bytes(&doc);

    // Untouched parts come through byte-for-byte.
    assert_eq!(read_part(&output, "docProps/app.xml"), APP_PROPS.as_bytes());
    assert_eq!(
        read_part(&output, "word/styles.xml"),
        TEMPLATE_STYLES.as_bytes()
    );

    // The regenerated body keeps template markup and carries the new card.
    let body = String::from_utf8(read_part(&output, "word/document.xml")).unwrap();
    assert!(body.contains(r#"<w:jc w:val="center"/>"#));
    assert!(body.contains("Event Template"));
    assert!(body.contains("bookmarkStart"));
    assert!(body.contains(r#"<w:tblStyle w:val="Badge"/>"#));
    assert!(body.contains(r#"<w:trHeight w:val="720"/>"#));
    assert!(body.contains(r#"<w:cols w:num="2" w:space="144"/>"#));

    // And the output is itself a readable document.
    let reread = read_docx_from_reader(Cursor::new(output)).expect("Failed to reread output");
    assert_eq!(reread.tables().count(), 1);
    assert_eq!(reread.tables().next().unwrap().cell(1, 0).unwrap().text(), "Carol");
}

#[test]
fn test_missing_document_part_is_invalid() {
    let mut buffer = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut buffer);
    zip.start_file("[Content_Types].xml", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(CONTENT_TYPES.as_bytes()).unwrap();
    zip.finish().unwrap();

    let err = read_docx_from_reader(Cursor::new(buffer.into_inner()))
        .expect_err("package without a body should not read");
    assert!(matches!(err, Error::InvalidDocx(_)), "got {err:?}");
}

#[test]
fn test_garbage_bytes_are_not_a_package() {
    let err = read_docx_from_reader(Cursor::new(b"not a zip archive".to_vec()))
        .expect_err("garbage should not read");
    assert!(matches!(err, Error::Zip(_)), "got {err:?}");
}
