//! Data models for LexiCompare.

mod comparison;
mod upload;

pub use comparison::{
    CellKey, ComparedFile, ComparisonReport, ComparisonResult, Match, ReportCell, ResultCell,
    TermRow,
};
pub use upload::{ContentState, FileId, RawSource, UploadedFile};
