//! Shared utility functions.
//!
//! - `mime`: MIME type classification and detection

mod mime;

pub use mime::{content_kind, detect_mime, is_json, mime_icon, ContentKind};
