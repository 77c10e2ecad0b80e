//! Crash-safe file writes

use crate::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Atomically replace `path` with `contents`.
///
/// The data is written to a temporary file in the same directory, flushed
/// to disk, then renamed over the target. Readers observe either the old
/// file or the new one, never a partial write.
pub fn write_atomic<P: AsRef<Path>>(path: P, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".reel-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

/// Serialize `value` as pretty-printed UTF-8 JSON and write it atomically.
///
/// Non-ASCII text is written as-is rather than escaped.
pub fn write_json_atomic<P: AsRef<Path>, T: Serialize + ?Sized>(path: P, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    write_atomic(path, content.as_bytes())
}
