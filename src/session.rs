//! In-memory comparison session.
//!
//! A session owns the uploaded files, the master selection, the user's term
//! curation and the latest comparison result. Nothing outlives the session.
//!
//! State flows one way: pick a master (extracts its terms), curate terms,
//! run a comparison. Changing the master or removing a file discards the
//! result, returning the session to its pre-result state.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::compare::FileContent;
use crate::extract::ContentExtractor;
use crate::models::{ComparisonResult, FileId, Match, RawSource, UploadedFile};
use crate::services::{
    CancelFlag, ComparisonError, ComparisonEvent, ComparisonService, DEFAULT_WORKERS,
};
use crate::terms::{TermSelection, Tokenizer};

/// Errors returned by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No master file selected")]
    NoMaster,

    #[error("No terms selected for comparison")]
    EmptyTermSet,

    #[error("No files to compare")]
    NoFiles,

    #[error("Unknown file: {0}")]
    UnknownFile(FileId),

    #[error(transparent)]
    Comparison(#[from] ComparisonError),
}

/// Knobs for how a session runs comparisons.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Scan the master file along with the others.
    pub include_master: bool,
    /// Files scanned concurrently.
    pub workers: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            include_master: true,
            workers: DEFAULT_WORKERS,
        }
    }
}

/// A single user's comparison workspace.
#[derive(Debug, Default)]
pub struct Session {
    files: Vec<Arc<UploadedFile>>,
    master: Option<FileId>,
    selection: TermSelection,
    tokenizer: Tokenizer,
    extractor: ContentExtractor,
    options: SessionOptions,
    cancel: CancelFlag,
    result: Option<Arc<ComparisonResult>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_extractor(mut self, extractor: ContentExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Flag that stops the running comparison between file units.
    ///
    /// A cancelled run installs a fresh flag, so fetch it again before the
    /// next run.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    // --- Files ---

    /// Add a file uploaded now.
    pub fn add_file(
        &mut self,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        source: RawSource,
    ) -> FileId {
        self.add_file_at(name, mime_type, source, Utc::now())
    }

    /// Add a file with an explicit upload time.
    ///
    /// Ids are `"{name}-{millis}"`; a numeric suffix keeps them unique when
    /// the same name is added twice within one millisecond.
    pub fn add_file_at(
        &mut self,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        source: RawSource,
        uploaded_at: DateTime<Utc>,
    ) -> FileId {
        let name = name.into();
        let base = FileId::from_upload(&name, uploaded_at);
        let mut id = base.clone();
        let mut n = 1;
        while self.file(&id).is_some() {
            id = base.with_suffix(n);
            n += 1;
        }

        tracing::debug!("Added {} as {}", name, id);
        self.files.push(Arc::new(UploadedFile::new(
            id.clone(),
            name,
            mime_type,
            source,
            uploaded_at,
        )));
        id
    }

    /// Files in upload order.
    pub fn files(&self) -> &[Arc<UploadedFile>] {
        &self.files
    }

    pub fn file(&self, id: &FileId) -> Option<&Arc<UploadedFile>> {
        self.files.iter().find(|f| &f.id == id)
    }

    /// Remove a file.
    ///
    /// Any result is discarded. Removing the master also clears the
    /// extracted terms and their selection.
    pub fn remove_file(&mut self, id: &FileId) -> Result<Arc<UploadedFile>, SessionError> {
        let index = self
            .files
            .iter()
            .position(|f| &f.id == id)
            .ok_or_else(|| SessionError::UnknownFile(id.clone()))?;
        let removed = self.files.remove(index);

        if self.master.as_ref() == Some(id) {
            self.clear_master();
        }
        self.result = None;

        tracing::debug!("Removed {}", removed.name);
        Ok(removed)
    }

    // --- Master ---

    pub fn master(&self) -> Option<&Arc<UploadedFile>> {
        self.master.as_ref().and_then(|id| self.file(id))
    }

    /// Make a file the master and extract its terms.
    ///
    /// Every extracted term starts out selected. A master whose content
    /// cannot be read yields whatever terms its partial text holds.
    pub async fn set_master(&mut self, id: &FileId) -> Result<&[String], SessionError> {
        let file = self
            .file(id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownFile(id.clone()))?;

        let state = file.content(&self.extractor).await;
        if let Some(reason) = state.failure() {
            tracing::warn!("Master {} only partially extracted: {}", file.name, reason);
        }
        let terms = self.tokenizer.tokenize(state.text(), &file.mime_type);
        tracing::info!("Extracted {} terms from {}", terms.len(), file.name);

        self.master = Some(file.id.clone());
        self.selection.reset_extracted(terms);
        self.result = None;
        Ok(self.selection.extracted())
    }

    /// Forget the master, its terms and any result. Manual terms are kept.
    pub fn clear_master(&mut self) {
        self.master = None;
        self.selection.clear_extracted();
        self.result = None;
    }

    // --- Terms ---

    pub fn selection(&self) -> &TermSelection {
        &self.selection
    }

    /// Terms extracted from the master, sorted.
    pub fn extracted_terms(&self) -> &[String] {
        self.selection.extracted()
    }

    /// Flip one extracted term; `None` if it is not an extracted term.
    pub fn toggle_term(&mut self, term: &str) -> Option<bool> {
        self.selection.toggle(term)
    }

    pub fn select_all(&mut self) {
        self.selection.select_all();
    }

    pub fn deselect_all(&mut self) {
        self.selection.deselect_all();
    }

    /// Select exactly these extracted terms.
    pub fn select<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.selection.select_only(terms);
    }

    /// Replace the manual terms (comma-separated).
    pub fn set_manual_terms(&mut self, input: impl Into<String>) {
        self.selection.set_manual(input);
    }

    /// Selected extracted terms plus manual terms.
    pub fn working_terms(&self) -> BTreeSet<String> {
        self.selection.working_terms()
    }

    pub fn selection_summary(&self) -> String {
        self.selection.summary()
    }

    // --- Comparison ---

    /// Files a comparison would scan, in upload order.
    pub fn participants(&self) -> Vec<Arc<UploadedFile>> {
        self.files
            .iter()
            .filter(|f| self.options.include_master || self.master.as_ref() != Some(&f.id))
            .cloned()
            .collect()
    }

    /// Run a comparison of the working terms across the participating files.
    ///
    /// Refuses to start without a master, without files or without terms;
    /// a refused run leaves the previous result untouched.
    pub async fn run_comparison(
        &mut self,
        event_tx: mpsc::Sender<ComparisonEvent>,
    ) -> Result<Arc<ComparisonResult>, SessionError> {
        if self.master.is_none() {
            return Err(SessionError::NoMaster);
        }
        let terms = self.working_terms();
        if terms.iter().all(|t| t.trim().is_empty()) {
            return Err(SessionError::EmptyTermSet);
        }
        let participants = self.participants();
        if participants.is_empty() {
            return Err(SessionError::NoFiles);
        }

        let contents = self.load_contents(&participants).await;
        let service =
            ComparisonService::new(self.options.workers).with_cancel_flag(self.cancel.clone());
        let outcome = service.run(&terms, contents, event_tx).await;
        if self.cancel.is_cancelled() {
            self.cancel = CancelFlag::new();
        }
        let result = Arc::new(outcome?);

        self.result = Some(result.clone());
        Ok(result)
    }

    async fn load_contents(&self, files: &[Arc<UploadedFile>]) -> Vec<FileContent> {
        let states = join_all(files.iter().map(|f| f.content(&self.extractor))).await;
        files
            .iter()
            .zip(states)
            .map(|(file, state)| {
                if let Some(reason) = state.failure() {
                    tracing::warn!("Comparing partial text of {}: {}", file.name, reason);
                }
                FileContent::new(file.id.clone(), file.name.clone(), state.shared_text())
            })
            .collect()
    }

    /// Latest comparison result, if still current.
    pub fn result(&self) -> Option<&Arc<ComparisonResult>> {
        self.result.as_ref()
    }

    /// Matches for one (term, file) cell of the current result.
    pub fn context(&self, term: &str, file_id: &FileId) -> Option<&[Match]> {
        self.result
            .as_ref()?
            .cell(term, file_id)
            .map(|cell| cell.matches.as_slice())
    }
}
