//! MIME type classification and detection utilities.

use std::path::Path;

/// Content kinds the extractor knows how to decode.
///
/// Classification trusts the declared MIME type: it never checks the type
/// against the file extension or the bytes themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Csv,
    Json,
    Pdf,
    WordProcessing,
    Unsupported,
}

impl ContentKind {
    /// Get the kind ID as a string.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Pdf => "pdf",
            Self::WordProcessing => "word",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Categorize a declared MIME type.
///
/// Matching is by substring so that parameters and vendor prefixes
/// (`text/plain; charset=utf-8`, `application/ld+json`) still classify.
pub fn content_kind(mime: &str) -> ContentKind {
    let mime_lower = mime.to_lowercase();

    if mime_lower.contains("json") {
        ContentKind::Json
    } else if mime_lower.contains("csv") {
        ContentKind::Csv
    } else if mime_lower.contains("plain") {
        ContentKind::Text
    } else if mime_lower.contains("pdf") {
        ContentKind::Pdf
    } else if mime_lower.contains("msword") || mime_lower.contains("wordprocessingml.document") {
        ContentKind::WordProcessing
    } else {
        ContentKind::Unsupported
    }
}

/// Whether the declared type is JSON, which switches the tokenizer to a structured walk.
pub fn is_json(mime: &str) -> bool {
    content_kind(mime) == ContentKind::Json
}

/// Guess a MIME type for a file on disk.
///
/// Uses the extension first and falls back to sniffing magic bytes. Files
/// that look like neither end up as `application/octet-stream`, which the
/// extractor treats as unsupported.
pub fn detect_mime(path: &Path, head: &[u8]) -> String {
    if let Some(guess) = mime_guess::from_path(path).first() {
        return guess.essence_str().to_string();
    }

    if let Some(kind) = infer::get(head) {
        return kind.mime_type().to_string();
    }

    if std::str::from_utf8(head).is_ok() {
        return "text/plain".to_string();
    }

    "application/octet-stream".to_string()
}

/// Map MIME type to a short display tag.
pub fn mime_icon(mime: &str) -> &'static str {
    match content_kind(mime) {
        ContentKind::Pdf => "[pdf]",
        ContentKind::WordProcessing => "[doc]",
        ContentKind::Json => "[jsn]",
        ContentKind::Csv => "[csv]",
        ContentKind::Text => "[txt]",
        ContentKind::Unsupported => "[---]",
    }
}
