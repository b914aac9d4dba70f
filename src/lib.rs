//! LexiCompare - term extraction and cross-document matching.
//!
//! Pick a master document, extract its candidate terms, curate them, and
//! find every line in every other document that mentions one of them.
//! Text, CSV, JSON, PDF and DOCX uploads are understood.

pub mod cli;
pub mod compare;
pub mod config;
pub mod export;
pub mod extract;
pub mod models;
pub mod services;
pub mod session;
pub mod terms;
pub mod utils;

pub use compare::{compare, FileContent};
pub use extract::{ContentExtractor, Extraction, ExtractionError};
pub use models::{ComparisonResult, FileId, Match, RawSource, ResultCell, UploadedFile};
pub use services::{ComparisonError, ComparisonEvent, ComparisonService};
pub use session::{Session, SessionError, SessionOptions};
pub use terms::{tokenize, TermSelection, Tokenizer};
