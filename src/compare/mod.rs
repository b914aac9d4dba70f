//! Cross-document term matching.
//!
//! Every term is looked for, case-insensitively, as a substring of every
//! line of every file. The engine is a pure function of its inputs; progress
//! is reported through a caller-supplied callback.

mod engine;

use std::collections::BTreeSet;
use std::sync::Arc;

pub use engine::{compare, compare_with_progress, prepare_terms, scan_file, CompareProgress};

use crate::models::{ComparedFile, FileId};

/// Decoded content of one file, ready to be scanned.
#[derive(Debug, Clone)]
pub struct FileContent {
    pub id: FileId,
    pub name: String,
    pub content: Arc<str>,
}

impl FileContent {
    pub fn new(id: FileId, name: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            name: name.into(),
            content: content.into(),
        }
    }

    pub(crate) fn compared(&self) -> ComparedFile {
        ComparedFile {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// First id that occurs more than once in `files`.
pub(crate) fn duplicate_id(files: &[FileContent]) -> Option<&FileId> {
    let mut seen = BTreeSet::new();
    files.iter().map(|file| &file.id).find(|id| !seen.insert(*id))
}
