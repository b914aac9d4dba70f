//! Flat-text tokenization and term normalization.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// A run of delimiters: whitespace (including U+FEFF), commas, periods,
/// semicolons, colons, parentheses and double quotes.
static DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\s\x{FEFF},.;:()"]+"#).unwrap());

/// Filters applied to every raw token before it becomes a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermFilter {
    /// Minimum length in characters; shorter tokens are dropped.
    pub min_length: usize,
    /// Drop tokens made up only of ASCII digits.
    pub drop_numeric: bool,
}

impl Default for TermFilter {
    fn default() -> Self {
        Self {
            min_length: 3,
            drop_numeric: true,
        }
    }
}

impl TermFilter {
    /// Trim a raw token and decide whether it survives as a term.
    pub fn normalize<'a>(&self, raw: &'a str) -> Option<&'a str> {
        let token = raw.trim_matches(is_blank);
        if token.chars().count() < self.min_length {
            return None;
        }
        if self.drop_numeric && is_numeric(token) {
            return None;
        }
        Some(token)
    }
}

/// Split a string into raw tokens on delimiter runs.
///
/// Leading and trailing delimiters produce empty pieces; they are removed
/// later by the length filter.
pub fn split_raw(text: &str) -> impl Iterator<Item = &str> {
    DELIMITERS.split(text)
}

/// Feed every normalized token of `text` into `terms`.
pub(crate) fn collect_terms(text: &str, filter: &TermFilter, terms: &mut BTreeSet<String>) {
    for raw in split_raw(text) {
        if let Some(term) = filter.normalize(raw) {
            if !terms.contains(term) {
                terms.insert(term.to_string());
            }
        }
    }
}

/// Whitespace as the delimiter class sees it: Unicode white space plus the byte-order mark.
fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}
