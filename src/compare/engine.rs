//! Line-by-line substring scan producing the comparison matrix.

use std::collections::BTreeSet;

use super::FileContent;
use crate::models::{ComparisonResult, FileId, Match, ResultCell};

/// Progress after one file has been scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareProgress {
    pub file_id: FileId,
    pub files_done: usize,
    pub files_total: usize,
}

impl CompareProgress {
    /// Completion as a percentage.
    pub fn percent(&self) -> f64 {
        if self.files_total == 0 {
            100.0
        } else {
            self.files_done as f64 * 100.0 / self.files_total as f64
        }
    }
}

/// Drop blank terms and fix the scan order.
///
/// A blank term would match every line, so it never reaches the scan.
pub fn prepare_terms(terms: &BTreeSet<String>) -> Vec<String> {
    terms
        .iter()
        .filter(|term| {
            let blank = term.trim().is_empty();
            if blank {
                tracing::warn!("Ignoring blank search term");
            }
            !blank
        })
        .cloned()
        .collect()
}

/// Scan one file for every term.
///
/// Returns one cell per term, in the order of `terms`. Lines are split on
/// `\n`; a trailing `\r` is not part of the line. Matching compares the
/// Unicode lowercase forms of line and term.
pub fn scan_file(terms: &[String], content: &str) -> Vec<ResultCell> {
    let lines: Vec<(&str, String)> = content
        .split('\n')
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            (line, line.to_lowercase())
        })
        .collect();

    terms
        .iter()
        .map(|term| {
            let needle = term.to_lowercase();
            let matches = lines
                .iter()
                .enumerate()
                .filter(|(_, (_, folded))| folded.contains(&needle))
                .map(|(index, (original, _))| Match {
                    line_number: index + 1,
                    context: original.to_string(),
                })
                .collect();
            ResultCell::from_matches(matches)
        })
        .collect()
}

/// Compare every term against every file.
///
/// File ids must be unique. A file whose id was already seen is skipped
/// with a warning, so the result keeps one column per distinct id.
pub fn compare(terms: &BTreeSet<String>, files: &[FileContent]) -> ComparisonResult {
    compare_with_progress(terms, files, |_| {})
}

/// Compare every term against every file, reporting after each file.
///
/// Duplicate file ids are handled as in [`compare`].
pub fn compare_with_progress<F>(
    terms: &BTreeSet<String>,
    files: &[FileContent],
    mut on_progress: F,
) -> ComparisonResult
where
    F: FnMut(CompareProgress),
{
    let terms = prepare_terms(terms);
    let mut seen = BTreeSet::new();
    let files: Vec<&FileContent> = files
        .iter()
        .filter(|file| {
            let fresh = seen.insert(&file.id);
            if !fresh {
                tracing::warn!("Skipping {}: duplicate file id {}", file.name, file.id);
            }
            fresh
        })
        .collect();
    let files_total = files.len();
    let mut columns = Vec::with_capacity(files_total);

    for (index, file) in files.iter().enumerate() {
        columns.push(scan_file(&terms, &file.content));
        on_progress(CompareProgress {
            file_id: file.id.clone(),
            files_done: index + 1,
            files_total,
        });
    }

    let compared = files.iter().map(|file| file.compared()).collect();
    ComparisonResult::from_columns(terms, compared, columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term_set(terms: &[&str]) -> BTreeSet<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_case_insensitive_substring() {
        let cells = scan_file(&["quick".to_string()], "first\nThe QUICK fox\nlast");
        assert!(cells[0].found);
        assert_eq!(
            cells[0].matches,
            vec![Match {
                line_number: 2,
                context: "The QUICK fox".to_string()
            }]
        );
    }

    #[test]
    fn test_one_match_per_line_in_order() {
        let cells = scan_file(
            &["alpha".to_string()],
            "alpha\nnothing\nhas alpha twice: alpha\nALPHAbet",
        );
        let lines: Vec<usize> = cells[0].matches.iter().map(|m| m.line_number).collect();
        assert_eq!(lines, vec![1, 3, 4]);
    }

    #[test]
    fn test_crlf_lines() {
        let cells = scan_file(&["beta".to_string()], "alpha\r\nbeta\r\n");
        assert_eq!(cells[0].matches[0].line_number, 2);
        assert_eq!(cells[0].matches[0].context, "beta");
    }

    #[test]
    fn test_empty_content_matches_nothing() {
        let cells = scan_file(&["alpha".to_string(), "beta".to_string()], "");
        assert_eq!(cells.len(), 2);
        assert!(cells.iter().all(|c| !c.found && c.matches.is_empty()));
    }

    #[test]
    fn test_blank_terms_dropped() {
        let prepared = prepare_terms(&term_set(&["", "  ", "gamma"]));
        assert_eq!(prepared, vec!["gamma"]);
    }

    #[test]
    fn test_compare_reports_progress() {
        let files = vec![
            FileContent::new(FileId::from("a"), "a.txt", "alpha"),
            FileContent::new(FileId::from("b"), "b.txt", "beta"),
        ];
        let mut seen = Vec::new();
        let result = compare_with_progress(&term_set(&["alpha"]), &files, |p| {
            seen.push((p.files_done, p.files_total))
        });
        assert_eq!(seen, vec![(1, 2), (2, 2)]);
        assert_eq!(result.cell_count(), 2);
    }

    #[test]
    fn test_duplicate_file_id_keeps_first() {
        let files = vec![
            FileContent::new(FileId::from("x"), "first.txt", "alpha"),
            FileContent::new(FileId::from("x"), "second.txt", "nothing"),
            FileContent::new(FileId::from("y"), "third.txt", "alpha"),
        ];
        let result = compare(&term_set(&["alpha"]), &files);

        assert_eq!(result.files().len(), 2);
        assert_eq!(result.files()[0].name, "first.txt");
        assert_eq!(result.cell_count(), result.terms().len() * result.files().len());
        assert!(result.cell("alpha", &FileId::from("x")).unwrap().found);
    }

    #[test]
    fn test_progress_percent() {
        let progress = CompareProgress {
            file_id: FileId::from("a"),
            files_done: 1,
            files_total: 4,
        };
        assert_eq!(progress.percent(), 25.0);
    }
}
