//! Extraction from PDF and DOCX documents built in memory.

use std::io::{Cursor, Write};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tokio::sync::mpsc;
use zip::write::SimpleFileOptions;

use lexicompare::extract::ExtractionError;
use lexicompare::utils::ContentKind;
use lexicompare::{ContentExtractor, RawSource, Session};

const PDF: &str = "application/pdf";
const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// One page per entry; each entry's lines become separate text objects.
fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new(
                "Td",
                vec![72.into(), (720 - 20 * i as i64).into()],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", p))
        .collect();
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}</w:body></w:document>",
        body
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.start_file("[Content_Types].xml", options).unwrap();
    writer
        .write_all(b"<?xml version=\"1.0\"?><Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\"/>")
        .unwrap();
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

#[test]
fn test_pdf_pages_in_order() {
    let bytes = build_pdf(&[&["Quarterly", "report"], &["Second page"]]);
    let extraction = ContentExtractor::new().extract(&bytes, PDF);

    assert_eq!(extraction.kind, ContentKind::Pdf);
    assert!(extraction.is_complete(), "{:?}", extraction.failure);
    assert_eq!(extraction.page_count, Some(2));
    assert_eq!(extraction.text, "Quarterly report\nSecond page");
}

#[test]
fn test_pdf_page_limit() {
    let bytes = build_pdf(&[&["first"], &["second"], &["third"]]);
    let extraction = ContentExtractor::new()
        .with_max_pdf_pages(2)
        .extract(&bytes, PDF);
    assert_eq!(extraction.page_count, Some(2));
    assert_eq!(extraction.text, "first\nsecond");
}

#[test]
fn test_truncated_pdf_does_not_panic() {
    let bytes = build_pdf(&[&["complete"]]);
    let extraction = ContentExtractor::new().extract(&bytes[..bytes.len() / 3], PDF);
    assert_eq!(extraction.kind, ContentKind::Pdf);
    if let Some(ref failure) = extraction.failure {
        assert!(matches!(failure, ExtractionError::Pdf(_)));
    }
}

#[test]
fn test_docx_paragraphs() {
    let bytes = build_docx(&["Hello &amp; welcome", "Second paragraph"]);
    let extraction = ContentExtractor::new().extract(&bytes, DOCX);

    assert_eq!(extraction.kind, ContentKind::WordProcessing);
    assert!(extraction.is_complete(), "{:?}", extraction.failure);
    assert_eq!(extraction.text, "Hello & welcome\n\nSecond paragraph\n\n");
}

#[test]
fn test_docx_without_document_part() {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("other.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"<x/>").unwrap();
    let bytes = writer.finish().unwrap().into_inner();

    let extraction = ContentExtractor::new().extract(&bytes, DOCX);
    assert!(extraction.text.is_empty());
    assert!(matches!(extraction.failure, Some(ExtractionError::Docx(_))));
}

#[tokio::test]
async fn test_pdf_master_against_docx() {
    let mut session = Session::new();
    let master = session.add_file(
        "terms.pdf",
        PDF,
        RawSource::from(build_pdf(&[&["Invoice (overdue)"], &["Payment reminder"]])),
    );
    let letter = session.add_file(
        "letter.docx",
        DOCX,
        RawSource::from(build_docx(&["Dear customer,", "your INVOICE is overdue."])),
    );

    let terms = session.set_master(&master).await.unwrap().to_vec();
    assert_eq!(terms, vec!["Invoice", "Payment", "overdue", "reminder"]);

    let (tx, mut rx) = mpsc::channel(100);
    let drain = tokio::spawn(async move { while rx.recv().await.is_some() {} });
    let result = session.run_comparison(tx).await.unwrap();
    drain.await.unwrap();

    let invoice = result.cell("Invoice", &letter).unwrap();
    assert!(invoice.found);
    assert_eq!(invoice.matches[0].line_number, 3);
    assert_eq!(invoice.matches[0].context, "your INVOICE is overdue.");
    assert!(!result.cell("Payment", &letter).unwrap().found);
}
