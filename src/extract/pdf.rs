//! PDF text-layer extraction using lopdf.

use lopdf::Document;

use super::{Decoded, ExtractionError};

/// Extract the text layer of every page, in page order.
///
/// Within a page the text fragments are joined with single spaces; pages are
/// joined with newlines. If a page cannot be read, the pages before it are
/// kept and extraction stops there.
pub(super) fn extract_pdf(bytes: &[u8], max_pages: usize) -> Decoded {
    let document = match Document::load_mem(bytes) {
        Ok(doc) => doc,
        Err(e) => {
            return Decoded {
                text: String::new(),
                page_count: None,
                failure: Some(ExtractionError::Pdf(format!("failed to load PDF: {}", e))),
            }
        }
    };

    // get_pages is keyed by 1-based page number, already ordered
    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    let total_pages = page_numbers.len();
    if total_pages > max_pages {
        tracing::warn!(
            "PDF has {} pages, only the first {} will be read",
            total_pages,
            max_pages
        );
    }

    let mut page_texts: Vec<String> = Vec::with_capacity(total_pages.min(max_pages));
    let mut failure = None;

    for page_num in page_numbers.into_iter().take(max_pages) {
        match document.extract_text(&[page_num]) {
            Ok(raw) => page_texts.push(join_fragments(&raw)),
            Err(e) => {
                failure = Some(ExtractionError::Pdf(format!(
                    "failed to read page {}: {}",
                    page_num, e
                )));
                break;
            }
        }
    }

    Decoded {
        page_count: Some(page_texts.len() as u32),
        text: page_texts.join("\n"),
        failure,
    }
}

/// Collapse one page's text fragments into a single space-separated line.
fn join_fragments(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
