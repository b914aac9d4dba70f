//! Comparison result models.
//!
//! A `ComparisonResult` is an immutable snapshot of one comparison run. Its
//! matrix always holds exactly one cell per (term, file) pair, including
//! cells where the term was not found.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::FileId;

/// One occurrence of a term: the 1-based line number and the line text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub line_number: usize,
    /// The line in its original case, without the `\n` terminator or a
    /// trailing `\r` (CRLF files report the same context as LF files).
    pub context: String,
}

/// Outcome for a single (term, file) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCell {
    pub found: bool,
    /// Matches in ascending line order; empty when not found.
    pub matches: Vec<Match>,
}

impl ResultCell {
    pub fn from_matches(matches: Vec<Match>) -> Self {
        Self {
            found: !matches.is_empty(),
            matches,
        }
    }

    pub fn not_found() -> Self {
        Self::default()
    }
}

/// Matrix key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    pub term: String,
    pub file_id: FileId,
}

impl CellKey {
    pub fn new(term: impl Into<String>, file_id: FileId) -> Self {
        Self {
            term: term.into(),
            file_id,
        }
    }
}

/// A file as it took part in a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparedFile {
    pub id: FileId,
    pub name: String,
}

/// Snapshot of one comparison run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonResult {
    terms: Vec<String>,
    files: Vec<ComparedFile>,
    matrix: BTreeMap<CellKey, ResultCell>,
}

impl ComparisonResult {
    /// Assemble a result from per-file columns.
    ///
    /// `columns[f][t]` is the cell for `terms[t]` in `files[f]`. Missing
    /// cells are filled with not-found cells so the matrix is always complete.
    pub(crate) fn from_columns(
        terms: Vec<String>,
        files: Vec<ComparedFile>,
        columns: Vec<Vec<ResultCell>>,
    ) -> Self {
        let mut matrix = BTreeMap::new();
        let mut columns = columns.into_iter();

        for file in &files {
            let mut cells = columns.next().unwrap_or_default().into_iter();
            for term in &terms {
                let cell = cells.next().unwrap_or_default();
                matrix.insert(CellKey::new(term.clone(), file.id.clone()), cell);
            }
        }

        Self {
            terms,
            files,
            matrix,
        }
    }

    /// Terms searched for, in the order they were scanned.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Files scanned, in input order.
    pub fn files(&self) -> &[ComparedFile] {
        &self.files
    }

    /// Look up one cell.
    pub fn cell(&self, term: &str, file_id: &FileId) -> Option<&ResultCell> {
        self.matrix.get(&CellKey::new(term, file_id.clone()))
    }

    /// Total number of cells (always terms × files).
    pub fn cell_count(&self) -> usize {
        self.matrix.len()
    }

    /// Iterate over every cell in key order.
    pub fn cells(&self) -> impl Iterator<Item = (&CellKey, &ResultCell)> {
        self.matrix.iter()
    }

    /// Number of cells where the term was found.
    pub fn found_count(&self) -> usize {
        self.matrix.values().filter(|cell| cell.found).count()
    }

    /// Whether a file takes part in this result.
    pub fn involves(&self, file_id: &FileId) -> bool {
        self.files.iter().any(|f| &f.id == file_id)
    }

    /// Render as a serializable report: one row per term, cells in file order.
    pub fn to_report(&self) -> ComparisonReport {
        let rows = self
            .terms
            .iter()
            .map(|term| TermRow {
                term: term.clone(),
                cells: self
                    .files
                    .iter()
                    .map(|file| {
                        let cell = self.cell(term, &file.id).cloned().unwrap_or_default();
                        ReportCell {
                            file_id: file.id.clone(),
                            found: cell.found,
                            matches: cell.matches,
                        }
                    })
                    .collect(),
            })
            .collect();

        ComparisonReport {
            terms: self.terms.clone(),
            files: self.files.clone(),
            rows,
        }
    }
}

/// Serializable view of a comparison result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub terms: Vec<String>,
    pub files: Vec<ComparedFile>,
    pub rows: Vec<TermRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRow {
    pub term: String,
    pub cells: Vec<ReportCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCell {
    pub file_id: FileId,
    pub found: bool,
    pub matches: Vec<Match>,
}
