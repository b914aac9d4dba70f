//! Working term set assembly from extracted and manual terms.

use std::collections::BTreeSet;

/// Split comma-separated manual input into trimmed, non-blank, unique terms.
pub fn parse_manual_terms(input: &str) -> BTreeSet<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

/// The user's curation of the master file's terms.
///
/// Only the sources are stored: the extracted candidates, which of them are
/// selected, and the raw manual input. The working set is derived from those
/// on every call, so it can never drift from them.
#[derive(Debug, Clone, Default)]
pub struct TermSelection {
    extracted: Vec<String>,
    selected: BTreeSet<String>,
    manual: String,
}

impl TermSelection {
    /// Start from a freshly extracted term list with every term selected.
    pub fn from_extracted(extracted: Vec<String>) -> Self {
        let selected = extracted.iter().cloned().collect();
        Self {
            extracted,
            selected,
            manual: String::new(),
        }
    }

    /// Replace the extracted candidates, selecting all of them.
    ///
    /// Manual input survives a master change.
    pub fn reset_extracted(&mut self, extracted: Vec<String>) {
        self.selected = extracted.iter().cloned().collect();
        self.extracted = extracted;
    }

    /// Drop the extracted candidates and the selection.
    pub fn clear_extracted(&mut self) {
        self.extracted.clear();
        self.selected.clear();
    }

    pub fn extracted(&self) -> &[String] {
        &self.extracted
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn manual_input(&self) -> &str {
        &self.manual
    }

    pub fn is_selected(&self, term: &str) -> bool {
        self.selected.contains(term)
    }

    /// Flip one extracted term. Returns the new state, or `None` if the term
    /// is not one of the extracted candidates.
    pub fn toggle(&mut self, term: &str) -> Option<bool> {
        if !self.extracted.iter().any(|t| t == term) {
            return None;
        }
        if self.selected.remove(term) {
            Some(false)
        } else {
            self.selected.insert(term.to_string());
            Some(true)
        }
    }

    /// Select exactly the given terms; unknown terms are ignored.
    pub fn select_only<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: BTreeSet<String> = terms.into_iter().map(|t| t.as_ref().to_string()).collect();
        self.selected = self
            .extracted
            .iter()
            .filter(|t| wanted.contains(*t))
            .cloned()
            .collect();
    }

    pub fn select_all(&mut self) {
        self.selected = self.extracted.iter().cloned().collect();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// Replace the raw manual input (comma-separated).
    pub fn set_manual(&mut self, input: impl Into<String>) {
        self.manual = input.into();
    }

    /// The set of terms a comparison will search for.
    pub fn working_terms(&self) -> BTreeSet<String> {
        let mut terms = self.selected.clone();
        terms.extend(parse_manual_terms(&self.manual));
        terms
    }

    /// Human-readable selection count, e.g. "3 of 10 selected".
    pub fn summary(&self) -> String {
        format!("{} of {} selected", self.selected.len(), self.extracted.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_manual_terms() {
        let parsed = parse_manual_terms(" foo, bar ,, foo,  ,baz qux ");
        assert_eq!(
            parsed.into_iter().collect::<Vec<_>>(),
            vec!["bar", "baz qux", "foo"]
        );
        assert!(parse_manual_terms("").is_empty());
        assert!(parse_manual_terms(" , ,").is_empty());
    }

    #[test]
    fn test_from_extracted_selects_everything() {
        let selection = TermSelection::from_extracted(terms(&["alpha", "beta"]));
        assert_eq!(selection.summary(), "2 of 2 selected");
        assert_eq!(selection.working_terms().len(), 2);
    }

    #[test]
    fn test_toggle() {
        let mut selection = TermSelection::from_extracted(terms(&["alpha", "beta"]));
        assert_eq!(selection.toggle("alpha"), Some(false));
        assert!(!selection.is_selected("alpha"));
        assert_eq!(selection.toggle("alpha"), Some(true));
        assert_eq!(selection.toggle("missing"), None);
        assert!(!selection.is_selected("missing"));
    }

    #[test]
    fn test_working_terms_is_union_without_duplicates() {
        let mut selection = TermSelection::from_extracted(terms(&["alpha", "beta", "gamma"]));
        selection.select_only(["beta", "unknown"]);
        selection.set_manual("beta, delta , ");
        let working: Vec<String> = selection.working_terms().into_iter().collect();
        assert_eq!(working, vec!["beta", "delta"]);
    }

    #[test]
    fn test_working_terms_follow_sources() {
        let mut selection = TermSelection::from_extracted(terms(&["alpha"]));
        selection.set_manual("omega");
        assert_eq!(selection.working_terms().len(), 2);

        selection.deselect_all();
        selection.set_manual("");
        assert!(selection.working_terms().is_empty());

        selection.select_all();
        assert_eq!(
            selection.working_terms().into_iter().collect::<Vec<_>>(),
            vec!["alpha"]
        );
    }

    #[test]
    fn test_reset_keeps_manual_input() {
        let mut selection = TermSelection::from_extracted(terms(&["alpha"]));
        selection.set_manual("omega");
        selection.reset_extracted(terms(&["beta"]));
        assert_eq!(
            selection.working_terms().into_iter().collect::<Vec<_>>(),
            vec!["beta", "omega"]
        );
        selection.clear_extracted();
        assert_eq!(selection.summary(), "0 of 0 selected");
        assert_eq!(selection.manual_input(), "omega");
    }
}
