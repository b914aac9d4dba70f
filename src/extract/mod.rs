//! Content extraction from uploaded documents.
//!
//! Turns raw bytes plus a declared MIME type into plain text:
//! - plain text, CSV and JSON are decoded as UTF-8
//! - PDF text layers are read page by page with lopdf
//! - OOXML word-processing documents are read from `word/document.xml`
//!
//! Extraction never fails outright. Whatever text was recovered before a
//! problem is returned together with the error, and unsupported types yield
//! empty text.

mod docx;
mod pdf;

use thiserror::Error;

use crate::utils::{content_kind, ContentKind};

/// Default upper bound on the number of PDF pages read from one document.
pub const DEFAULT_MAX_PDF_PAGES: usize = 4_096;

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid UTF-8 after byte {valid_up_to}")]
    InvalidUtf8 { valid_up_to: usize },

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("Legacy binary Word documents are not supported")]
    UnsupportedLegacyFormat,
}

/// Result of text extraction.
///
/// `failure` is set when extraction stopped early or had to substitute
/// characters; `text` then holds whatever was recovered.
#[derive(Debug)]
pub struct Extraction {
    /// Extracted text content.
    pub text: String,
    /// How the declared type was classified.
    pub kind: ContentKind,
    /// Number of pages read (for PDFs).
    pub page_count: Option<u32>,
    /// The problem that cut extraction short, if any.
    pub failure: Option<ExtractionError>,
}

impl Extraction {
    fn empty(kind: ContentKind) -> Self {
        Self {
            text: String::new(),
            kind,
            page_count: None,
            failure: None,
        }
    }

    /// Whether extraction ran to completion.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Build an extraction for a source whose bytes could not be read at all.
    pub fn unreadable(kind: ContentKind, error: std::io::Error) -> Self {
        Self {
            failure: Some(ExtractionError::Io(error)),
            ..Self::empty(kind)
        }
    }
}

/// Text recovered by one of the format backends.
struct Decoded {
    text: String,
    page_count: Option<u32>,
    failure: Option<ExtractionError>,
}

/// Text extractor dispatching on the declared MIME type.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    /// Pages beyond this limit are ignored.
    max_pdf_pages: usize,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self {
            max_pdf_pages: DEFAULT_MAX_PDF_PAGES,
        }
    }
}

impl ContentExtractor {
    /// Create a new content extractor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of PDF pages to read.
    pub fn with_max_pdf_pages(mut self, max_pages: usize) -> Self {
        self.max_pdf_pages = max_pages.max(1);
        self
    }

    /// Extract text from raw bytes based on the declared MIME type.
    pub fn extract(&self, bytes: &[u8], mime_type: &str) -> Extraction {
        let kind = content_kind(mime_type);

        let decoded = match kind {
            ContentKind::Text | ContentKind::Csv | ContentKind::Json => decode_utf8(bytes),
            ContentKind::Pdf => pdf::extract_pdf(bytes, self.max_pdf_pages),
            ContentKind::WordProcessing => docx::extract_word(bytes),
            ContentKind::Unsupported => {
                tracing::debug!("No extractor for MIME type {:?}", mime_type);
                return Extraction::empty(kind);
            }
        };

        if let Some(ref err) = decoded.failure {
            tracing::warn!(
                "Extraction of {} content incomplete ({} chars recovered): {}",
                kind.id(),
                decoded.text.len(),
                err
            );
        }

        Extraction {
            text: decoded.text,
            kind,
            page_count: decoded.page_count,
            failure: decoded.failure,
        }
    }
}

/// Byte-order mark some editors write at the start of UTF-8 files.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode bytes as UTF-8, substituting replacement characters for invalid sequences.
fn decode_utf8(bytes: &[u8]) -> Decoded {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Decoded {
            text: text.to_string(),
            page_count: None,
            failure: None,
        },
        Err(e) => Decoded {
            text: String::from_utf8_lossy(bytes).into_owned(),
            page_count: None,
            failure: Some(ExtractionError::InvalidUtf8 {
                valid_up_to: e.valid_up_to(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_verbatim() {
        let extraction = ContentExtractor::new().extract(b"line one\nline two\n", "text/plain");
        assert_eq!(extraction.text, "line one\nline two\n");
        assert_eq!(extraction.kind, ContentKind::Text);
        assert!(extraction.is_complete());
    }

    #[test]
    fn test_csv_and_json_decoded_directly() {
        let extractor = ContentExtractor::new();
        assert_eq!(extractor.extract(b"a,b\n1,2", "text/csv").text, "a,b\n1,2");
        assert_eq!(
            extractor.extract(br#"{"k": "v"}"#, "application/json").text,
            r#"{"k": "v"}"#
        );
    }

    #[test]
    fn test_leading_bom_is_dropped() {
        let extraction = ContentExtractor::new().extract(b"\xEF\xBB\xBFAlpha beta\n", "text/csv");
        assert_eq!(extraction.text, "Alpha beta\n");
        assert!(extraction.is_complete());
    }

    #[test]
    fn test_unsupported_type_yields_empty_text() {
        let extraction = ContentExtractor::new().extract(b"\x89PNG....", "image/png");
        assert!(extraction.text.is_empty());
        assert_eq!(extraction.kind, ContentKind::Unsupported);
        assert!(extraction.is_complete());
    }

    #[test]
    fn test_invalid_utf8_is_lossy_and_flagged() {
        let extraction = ContentExtractor::new().extract(b"good \xff bytes", "text/plain");
        assert_eq!(extraction.text, "good \u{FFFD} bytes");
        assert!(matches!(
            extraction.failure,
            Some(ExtractionError::InvalidUtf8 { valid_up_to: 5 })
        ));
    }

    #[test]
    fn test_corrupt_pdf_does_not_panic() {
        let extraction = ContentExtractor::new().extract(b"%PDF-1.4 garbage", "application/pdf");
        assert!(extraction.text.is_empty());
        assert!(matches!(extraction.failure, Some(ExtractionError::Pdf(_))));
    }

    #[test]
    fn test_unreadable_source() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let extraction = Extraction::unreadable(ContentKind::Text, err);
        assert!(extraction.text.is_empty());
        assert!(!extraction.is_complete());
    }
}
