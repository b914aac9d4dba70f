//! Comparison service.
//!
//! Runs the comparison engine over many files at once. Each file is one unit
//! of work on a blocking worker; a unit's cells are committed to the result
//! only after the whole file has been scanned. Separated from UI concerns -
//! emits events for progress tracking.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::compare::{duplicate_id, prepare_terms, scan_file, FileContent};
use crate::models::{ComparisonResult, FileId, ResultCell};

/// Default number of files scanned concurrently.
pub const DEFAULT_WORKERS: usize = 4;

/// Errors that stop a comparison from producing a result.
#[derive(Debug, Error)]
pub enum ComparisonError {
    #[error("No search terms to compare")]
    EmptyTermSet,

    #[error("No files to compare")]
    NoFiles,

    #[error("File id {0} appears more than once")]
    DuplicateFile(FileId),

    #[error("Comparison cancelled")]
    Cancelled,

    #[error("Worker for {file_id} failed: {message}")]
    Worker { file_id: FileId, message: String },
}

/// Events emitted during a comparison run.
#[derive(Debug, Clone)]
pub enum ComparisonEvent {
    /// Run started
    Started { files: usize, terms: usize },
    /// File scan started
    FileStarted { file_id: FileId, name: String },
    /// File scan completed
    FileCompleted {
        file_id: FileId,
        matched_terms: usize,
        total_matches: usize,
    },
    /// File scan failed
    FileFailed { file_id: FileId, error: String },
    /// Run complete
    Finished { files: usize, cells: usize, found: usize },
}

/// Cooperative cancellation flag, checked between file units.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Service for running comparisons.
#[derive(Debug, Clone)]
pub struct ComparisonService {
    workers: usize,
    cancel: CancelFlag,
}

impl Default for ComparisonService {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

impl ComparisonService {
    /// Create a new comparison service.
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            cancel: CancelFlag::new(),
        }
    }

    /// Attach a cancellation flag shared with the caller.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Compare terms against files.
    ///
    /// Refuses to run without terms or files, or when two files share an
    /// id. The returned matrix covers
    /// every (term, file) pair; files appear in input order regardless of
    /// the order their scans finish in.
    pub async fn run(
        &self,
        terms: &BTreeSet<String>,
        files: Vec<FileContent>,
        event_tx: mpsc::Sender<ComparisonEvent>,
    ) -> Result<ComparisonResult, ComparisonError> {
        let terms = prepare_terms(terms);
        if terms.is_empty() {
            return Err(ComparisonError::EmptyTermSet);
        }
        if files.is_empty() {
            return Err(ComparisonError::NoFiles);
        }
        if let Some(id) = duplicate_id(&files) {
            return Err(ComparisonError::DuplicateFile(id.clone()));
        }

        let _ = event_tx
            .send(ComparisonEvent::Started {
                files: files.len(),
                terms: terms.len(),
            })
            .await;

        let shared_terms: Arc<[String]> = terms.clone().into();
        let units = files.iter().cloned().enumerate().map(|(index, file)| {
            let terms = shared_terms.clone();
            let event_tx = event_tx.clone();
            let cancel = self.cancel.clone();
            async move {
                if cancel.is_cancelled() {
                    return (index, None);
                }
                let _ = event_tx
                    .send(ComparisonEvent::FileStarted {
                        file_id: file.id.clone(),
                        name: file.name.clone(),
                    })
                    .await;

                let file_id = file.id.clone();
                let scanned =
                    tokio::task::spawn_blocking(move || scan_file(&terms, &file.content)).await;

                let outcome = match scanned {
                    Ok(cells) => {
                        let _ = event_tx
                            .send(ComparisonEvent::FileCompleted {
                                file_id,
                                matched_terms: cells.iter().filter(|c| c.found).count(),
                                total_matches: cells.iter().map(|c| c.matches.len()).sum(),
                            })
                            .await;
                        Ok(cells)
                    }
                    Err(e) => {
                        tracing::warn!("Scan of {} did not finish: {}", file_id, e);
                        let _ = event_tx
                            .send(ComparisonEvent::FileFailed {
                                file_id: file_id.clone(),
                                error: e.to_string(),
                            })
                            .await;
                        Err(ComparisonError::Worker {
                            file_id,
                            message: e.to_string(),
                        })
                    }
                };
                (index, Some(outcome))
            }
        });

        let finished: Vec<(usize, Option<Result<Vec<ResultCell>, ComparisonError>>)> =
            stream::iter(units).buffer_unordered(self.workers).collect().await;

        if self.cancel.is_cancelled() {
            tracing::info!("Comparison cancelled after {} files", finished.len());
            return Err(ComparisonError::Cancelled);
        }

        let mut columns: Vec<Option<Vec<ResultCell>>> = vec![None; files.len()];
        for (index, outcome) in finished {
            match outcome {
                Some(Ok(cells)) => columns[index] = Some(cells),
                Some(Err(e)) => return Err(e),
                None => return Err(ComparisonError::Cancelled),
            }
        }

        let compared = files.iter().map(FileContent::compared).collect();
        let columns = columns.into_iter().map(Option::unwrap_or_default).collect();
        let result = ComparisonResult::from_columns(terms, compared, columns);

        tracing::debug!(
            "Compared {} terms across {} files ({} found)",
            result.terms().len(),
            result.files().len(),
            result.found_count()
        );

        let _ = event_tx
            .send(ComparisonEvent::Finished {
                files: result.files().len(),
                cells: result.cell_count(),
                found: result.found_count(),
            })
            .await;

        Ok(result)
    }
}
