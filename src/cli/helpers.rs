//! Shared helper functions for CLI commands.

use std::path::Path;

use tokio::io::AsyncReadExt;

use crate::models::{FileId, RawSource};
use crate::session::Session;
use crate::utils::detect_mime;

/// Bytes read from the start of a file for magic-number sniffing.
const SNIFF_LEN: usize = 8192;

/// Add a file on disk to the session.
///
/// The MIME type is `mime` when given, otherwise detected from the path and
/// the file's first bytes. Content is read again lazily when needed.
pub async fn add_path(
    session: &mut Session,
    path: &Path,
    mime: Option<&str>,
) -> anyhow::Result<FileId> {
    let mime_type = match mime {
        Some(m) => m.to_string(),
        None => {
            let head = read_head(path).await?;
            detect_mime(path, &head)
        }
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    tracing::debug!("{} detected as {}", path.display(), mime_type);
    Ok(session.add_file(name, mime_type, RawSource::Path(path.to_path_buf())))
}

async fn read_head(path: &Path) -> anyhow::Result<Vec<u8>> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot open {}: {}", path.display(), e))?;
    let mut head = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut head).await?;
    Ok(head)
}

/// Split a comma-separated option value into trimmed, non-empty items.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Truncate a string to `max` characters, marking the cut with `…`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
