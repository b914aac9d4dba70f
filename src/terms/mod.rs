//! Term extraction and term-set assembly.
//!
//! The tokenizer turns decoded document text into a sorted, deduplicated
//! list of candidate terms. JSON documents contribute only their string
//! values; everything else is split as flat text. `TermSelection` combines
//! the user's pick from those candidates with manually typed terms.

mod json;
mod selection;
mod tokenizer;

use std::collections::BTreeSet;

pub use selection::{parse_manual_terms, TermSelection};
pub use tokenizer::{split_raw, TermFilter};

use crate::utils::is_json;

/// Tokenizer producing candidate terms from extracted text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    filter: TermFilter,
}

impl Tokenizer {
    /// Create a tokenizer with the given filter.
    pub fn new(filter: TermFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &TermFilter {
        &self.filter
    }

    /// Tokenize decoded text into sorted unique terms.
    ///
    /// JSON that fails to parse is tokenized as plain text instead.
    pub fn tokenize(&self, text: &str, mime_type: &str) -> Vec<String> {
        let mut terms = BTreeSet::new();

        if is_json(mime_type) {
            let body = text.trim_start_matches('\u{FEFF}');
            match serde_json::from_str::<serde_json::Value>(body) {
                Ok(value) => json::collect_json_terms(&value, &self.filter, &mut terms),
                Err(e) => {
                    tracing::warn!("Malformed JSON, tokenizing as plain text: {}", e);
                    tokenizer::collect_terms(text, &self.filter, &mut terms);
                }
            }
        } else {
            tokenizer::collect_terms(text, &self.filter, &mut terms);
        }

        terms.into_iter().collect()
    }
}

/// Tokenize with the default filter (longer than two characters, not purely numeric).
pub fn tokenize(text: &str, mime_type: &str) -> Vec<String> {
    Tokenizer::default().tokenize(text, mime_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_flat_text() {
        let terms = tokenize("The cat sat; the cat napped (twice) in 2024.", "text/plain");
        assert_eq!(terms, vec!["The", "cat", "napped", "sat", "the", "twice"]);
    }

    #[test]
    fn test_tokenize_json_string_leaves_only() {
        let text = r#"{"a": "foo bar", "b": {"c": "baz"}, "d": 5, "e": null}"#;
        assert_eq!(tokenize(text, "application/json"), vec!["bar", "baz", "foo"]);
    }

    #[test]
    fn test_malformed_json_falls_back_to_flat_text() {
        let text = r#"{"title": "broken document""#;
        assert_eq!(
            tokenize(text, "application/json"),
            vec!["broken", "document", "title"]
        );
    }

    #[test]
    fn test_json_with_byte_order_mark() {
        let text = "\u{FEFF}{\"name\": \"Ada Lovelace\"}";
        assert_eq!(tokenize(text, "application/json"), vec!["Ada", "Lovelace"]);
    }

    #[test]
    fn test_top_level_json_string_has_no_terms() {
        assert!(tokenize(r#""hello world""#, "application/json").is_empty());
        assert_eq!(tokenize(r#"["hello world"]"#, "application/json"), vec!["hello", "world"]);
    }

    #[test]
    fn test_json_text_under_plain_type_is_flat() {
        let text = r#"{"key": "value here"}"#;
        assert_eq!(tokenize(text, "text/plain"), vec!["here", "key", "value"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("", "text/plain").is_empty());
        assert!(tokenize("", "application/json").is_empty());
        assert!(tokenize("  ,.;  ", "text/csv").is_empty());
    }

    #[test]
    fn test_sorted_by_code_point() {
        let terms = tokenize("zebra Apple apple Zulu éclair", "text/plain");
        assert_eq!(terms, vec!["Apple", "Zulu", "apple", "zebra", "éclair"]);
    }

    #[test]
    fn test_custom_filter() {
        let tokenizer = Tokenizer::new(TermFilter {
            min_length: 5,
            drop_numeric: false,
        });
        assert_eq!(
            tokenizer.tokenize("short longer 123456", "text/plain"),
            vec!["123456", "longer", "short"]
        );
    }
}
