//! Raw text extraction from word-processing documents.
//!
//! OOXML documents are zip containers; the visible text lives in the
//! `w:t` runs of `word/document.xml`. Styling and structure are discarded,
//! paragraphs end with a blank line.

use std::io::Cursor;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{Decoded, ExtractionError};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const CFB_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const DOCUMENT_PART: &str = "word/document.xml";

/// Extract text from a word-processing document of either generation.
///
/// Files declared as `application/msword` are frequently OOXML in disguise,
/// so the container is sniffed rather than trusted.
pub(super) fn extract_word(bytes: &[u8]) -> Decoded {
    if bytes.starts_with(CFB_MAGIC) {
        return failed(ExtractionError::UnsupportedLegacyFormat);
    }
    if !bytes.starts_with(ZIP_MAGIC) {
        return failed(ExtractionError::Docx("not a zip container".to_string()));
    }

    let xml = match read_document_part(bytes) {
        Ok(xml) => xml,
        Err(e) => return failed(e),
    };

    let (text, failure) = document_text(&xml);
    Decoded {
        text,
        page_count: None,
        failure,
    }
}

fn failed(error: ExtractionError) -> Decoded {
    Decoded {
        text: String::new(),
        page_count: None,
        failure: Some(error),
    }
}

fn read_document_part(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Docx(format!("failed to open archive: {}", e)))?;
    let part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::Docx(format!("missing {}: {}", DOCUMENT_PART, e)))?;
    Ok(std::io::read_to_string(part)?)
}

/// Walk the document body and collect visible text.
///
/// Returns the text gathered so far alongside the error when the XML is malformed.
fn document_text(xml: &str) -> (String, Option<ExtractionError>) {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;
    // w:tab inside w:tabs is a tab stop definition, not content
    let mut in_tab_stops = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:tabs" => in_tab_stops = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" if !in_tab_stops => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:tabs" => in_tab_stops = false,
                b"w:p" => out.push_str("\n\n"),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => match t.unescape() {
                Ok(text) => out.push_str(&text),
                Err(e) => {
                    return (out, Some(ExtractionError::Docx(format!("bad text run: {}", e))));
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return (
                    out,
                    Some(ExtractionError::Docx(format!(
                        "XML error at byte {}: {}",
                        reader.buffer_position(),
                        e
                    ))),
                );
            }
            _ => {}
        }
    }

    (out, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_text_paragraphs() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:t xml:space="preserve"> world</w:t></w:r></w:p>
            <w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>
                <w:r><w:t>A</w:t><w:tab/><w:t>B</w:t><w:br/><w:t>C &amp; D</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let (text, failure) = document_text(xml);
        assert!(failure.is_none());
        assert_eq!(text, "Hello world\n\nA\tB\nC & D\n\n");
    }

    #[test]
    fn test_document_text_ignores_text_outside_runs() {
        let xml = "<w:document><w:body><w:p>stray<w:r><w:t>kept</w:t></w:r></w:p></w:body></w:document>";
        let (text, _) = document_text(xml);
        assert_eq!(text, "kept\n\n");
    }

    #[test]
    fn test_malformed_xml_keeps_partial_text() {
        let xml = "<w:p><w:r><w:t>before</w:t></w:r></w:p><w:p><w:t>oops</w:x>";
        let (text, failure) = document_text(xml);
        assert!(text.starts_with("before"));
        assert!(failure.is_some());
    }

    #[test]
    fn test_legacy_word_rejected() {
        let mut bytes = CFB_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 32]);
        let decoded = extract_word(&bytes);
        assert!(decoded.text.is_empty());
        assert!(matches!(
            decoded.failure,
            Some(ExtractionError::UnsupportedLegacyFormat)
        ));
    }

    #[test]
    fn test_non_zip_rejected() {
        let decoded = extract_word(b"plain bytes");
        assert!(matches!(decoded.failure, Some(ExtractionError::Docx(_))));
    }
}
