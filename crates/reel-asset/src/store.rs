//! Flat file storage for original asset binaries

use reel_core::{ReelError, Result};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Binary storage keyed by storage name.
///
/// Stores files at `<root>/<id>.<ext>`; names are produced by
/// [`Asset::storage_name`](crate::Asset::storage_name).
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    /// Create a new content store at the given root directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under `name` and return the stored size
    pub fn put(&self, name: &str, bytes: &[u8]) -> Result<u64> {
        let mut reader = bytes;
        self.put_from(name, &mut reader)
    }

    /// Stream `reader` into the store under `name` and return the stored size.
    ///
    /// Bytes land in a temporary file that only takes the final name once
    /// the reader is exhausted, so a failed read leaves nothing behind. An
    /// existing binary with the same name is never overwritten.
    pub fn put_from<R: Read>(&self, name: &str, reader: &mut R) -> Result<u64> {
        let dest = self.path_for(name)?;
        fs::create_dir_all(&self.root)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".reel-")
            .suffix(".part")
            .tempfile_in(&self.root)?;
        let written = std::io::copy(reader, &mut tmp)?;
        tmp.flush()?;
        tmp.persist_noclobber(&dest)?;
        Ok(written)
    }

    /// Full path for a stored name
    pub fn get(&self, name: &str) -> Option<PathBuf> {
        let path = self.path_for(name).ok()?;
        path.is_file().then_some(path)
    }

    /// Check if a name exists in the store
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove a stored binary. Returns false when it was already gone.
    pub fn remove(&self, name: &str) -> Result<bool> {
        match self.get(name) {
            Some(path) => {
                fs::remove_file(path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Names are single path components; anything else is rejected
    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let is_plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if !is_plain {
            return Err(ReelError::ValidationError(format!(
                "Invalid storage name: {:?}",
                name
            )));
        }
        Ok(self.root.join(name))
    }
}
