//! Uploaded file model with a write-once content cache.
//!
//! Raw bytes are assumed stable for the lifetime of a session, so the
//! decoded text is computed at most once per file and never invalidated.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::extract::ContentExtractor;
use crate::utils::content_kind;

/// Session-unique identifier of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    /// Build the base id for a file uploaded at `uploaded_at`: `"{name}-{millis}"`.
    pub fn from_upload(name: &str, uploaded_at: DateTime<Utc>) -> Self {
        Self(format!("{}-{}", name, uploaded_at.timestamp_millis()))
    }

    /// Derive a variant of this id for disambiguation (`"{id}-{n}"`).
    pub fn with_suffix(&self, n: usize) -> Self {
        Self(format!("{}-{}", self.0, n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Where an upload's original bytes come from.
#[derive(Debug, Clone)]
pub enum RawSource {
    /// Bytes already held in memory.
    Memory(Arc<[u8]>),
    /// A file on disk, read on first use.
    Path(PathBuf),
}

impl RawSource {
    /// Read the raw bytes.
    pub async fn read(&self) -> std::io::Result<Arc<[u8]>> {
        match self {
            Self::Memory(bytes) => Ok(bytes.clone()),
            Self::Path(path) => Ok(tokio::fs::read(path).await?.into()),
        }
    }
}

impl From<Vec<u8>> for RawSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Memory(bytes.into())
    }
}

impl From<&str> for RawSource {
    fn from(text: &str) -> Self {
        Self::Memory(Arc::from(text.as_bytes()))
    }
}

/// Decoded-text state of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentState {
    /// Extraction has not run yet.
    Unloaded,
    /// Extraction completed.
    Loaded(Arc<str>),
    /// Extraction failed or stopped early; `partial` is what was recovered.
    Failed { reason: String, partial: Arc<str> },
}

impl ContentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unloaded => "unloaded",
            Self::Loaded(_) => "loaded",
            Self::Failed { .. } => "failed",
        }
    }

    /// Text to search; failed files contribute whatever was recovered.
    pub fn text(&self) -> &str {
        match self {
            Self::Unloaded => "",
            Self::Loaded(text) => &**text,
            Self::Failed { partial, .. } => &**partial,
        }
    }

    /// Shared handle to the searchable text.
    pub fn shared_text(&self) -> Arc<str> {
        match self {
            Self::Unloaded => Arc::from(""),
            Self::Loaded(text) => text.clone(),
            Self::Failed { partial, .. } => partial.clone(),
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed { reason, .. } => Some(reason.as_str()),
            _ => None,
        }
    }
}

/// A document uploaded into a session.
#[derive(Debug)]
pub struct UploadedFile {
    /// Session-unique identifier.
    pub id: FileId,
    /// Original file name.
    pub name: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// When the file was added.
    pub uploaded_at: DateTime<Utc>,
    source: RawSource,
    content: OnceCell<ContentState>,
}

impl UploadedFile {
    /// Create a new upload.
    pub fn new(
        id: FileId,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        source: RawSource,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            mime_type: mime_type.into(),
            uploaded_at,
            source,
            content: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &RawSource {
        &self.source
    }

    /// Current content state without triggering extraction.
    pub fn state(&self) -> ContentState {
        self.content.get().cloned().unwrap_or(ContentState::Unloaded)
    }

    /// Decoded text, extracting it on first access.
    ///
    /// Concurrent callers share a single extraction; later callers get the
    /// cached state.
    pub async fn content(&self, extractor: &ContentExtractor) -> &ContentState {
        self.content
            .get_or_init(|| self.load_content(extractor))
            .await
    }

    async fn load_content(&self, extractor: &ContentExtractor) -> ContentState {
        let bytes = match self.source.read().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Could not read {}: {}", self.name, e);
                return ContentState::Failed {
                    reason: format!("unreadable source: {}", e),
                    partial: Arc::from(""),
                };
            }
        };

        let extractor = extractor.clone();
        let mime_type = self.mime_type.clone();
        let extraction =
            tokio::task::spawn_blocking(move || extractor.extract(&bytes, &mime_type)).await;

        match extraction {
            Ok(extraction) => {
                tracing::debug!(
                    "Extracted {} chars from {} ({})",
                    extraction.text.len(),
                    self.name,
                    content_kind(&self.mime_type).id()
                );
                match extraction.failure {
                    None => ContentState::Loaded(extraction.text.into()),
                    Some(err) => ContentState::Failed {
                        reason: err.to_string(),
                        partial: extraction.text.into(),
                    },
                }
            }
            Err(e) => {
                tracing::warn!("Extraction task for {} did not finish: {}", self.name, e);
                ContentState::Failed {
                    reason: format!("extraction task failed: {}", e),
                    partial: Arc::from(""),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn upload(source: RawSource, mime: &str) -> UploadedFile {
        let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        UploadedFile::new(FileId::from_upload("a.txt", at), "a.txt", mime, source, at)
    }

    #[test]
    fn test_file_id_format() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let id = FileId::from_upload("notes.txt", at);
        assert_eq!(id.as_str(), "notes.txt-1700000000123");
        assert_eq!(id.with_suffix(2).to_string(), "notes.txt-1700000000123-2");
    }

    #[test]
    fn test_content_state_text() {
        assert_eq!(ContentState::Unloaded.text(), "");
        assert_eq!(ContentState::Loaded(Arc::from("abc")).text(), "abc");
        let failed = ContentState::Failed {
            reason: "bad".to_string(),
            partial: Arc::from("part"),
        };
        assert_eq!(failed.text(), "part");
        assert_eq!(failed.failure(), Some("bad"));
        assert_eq!(failed.as_str(), "failed");
    }

    #[tokio::test]
    async fn test_content_loaded_once() {
        let file = upload(RawSource::from("hello world"), "text/plain");
        assert_eq!(file.state(), ContentState::Unloaded);

        let extractor = ContentExtractor::new();
        let first = file.content(&extractor).await.clone();
        assert_eq!(first, ContentState::Loaded(Arc::from("hello world")));
        assert_eq!(file.state(), first);
    }

    #[tokio::test]
    async fn test_missing_path_is_failed_and_empty() {
        let file = upload(
            RawSource::Path(PathBuf::from("/nonexistent/lexicompare/missing.txt")),
            "text/plain",
        );
        let state = file.content(&ContentExtractor::new()).await;
        assert!(state.failure().is_some());
        assert_eq!(state.text(), "");
    }

    #[tokio::test]
    async fn test_unsupported_type_loads_empty() {
        let file = upload(RawSource::from(vec![0x89, 0x50, 0x4e, 0x47]), "image/png");
        let state = file.content(&ContentExtractor::new()).await;
        assert_eq!(state, &ContentState::Loaded(Arc::from("")));
    }
}
