//! Asset import and removal pipeline
//!
//! Import runs as one synchronous sequence:
//! validate → classify → persist binary → thumbnail → index.
//! Nothing is written until validation passes, and the index entry is the
//! last thing created, so a half-finished import is never visible to
//! `get` or `search`.

use crate::catalog::{AssetQuery, AssetStore};
use crate::store::ContentStore;
use crate::thumbnail::{Thumbnail, ThumbnailGenerator};
use crate::types::{extension_of, is_supported, Asset};
use reel_core::{ReelConfig, ReelError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Caller-supplied metadata attached at import time
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub tags: Vec<String>,
    pub description: String,
}

/// The asset collection: index, binaries and thumbnails under one data root
pub struct AssetLibrary {
    store: AssetStore,
    content: ContentStore,
    thumbnails: ThumbnailGenerator,
}

impl AssetLibrary {
    /// Open the library rooted at the configured data directory
    pub fn open(config: &ReelConfig) -> Result<Self> {
        std::fs::create_dir_all(config.assets_dir())?;
        std::fs::create_dir_all(config.thumbnails_dir())?;

        Ok(Self {
            store: AssetStore::open(config.index_path())?,
            content: ContentStore::new(config.assets_dir()),
            thumbnails: ThumbnailGenerator::new(config.thumbnails_dir(), &config.thumbnail),
        })
    }

    /// Assemble a library from already-built parts
    pub fn from_parts(store: AssetStore, content: ContentStore, thumbnails: ThumbnailGenerator) -> Self {
        Self {
            store,
            content,
            thumbnails,
        }
    }

    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    pub fn thumbnails(&self) -> &ThumbnailGenerator {
        &self.thumbnails
    }

    /// Import an uploaded stream under its original filename
    pub fn import<R: Read>(&self, filename: &str, reader: &mut R, options: ImportOptions) -> Result<Asset> {
        let original_name = validate_filename(filename)?;

        let mut asset = Asset::new(&original_name);
        while self.store.contains(&asset.id) {
            asset.id = reel_core::short_id();
        }
        tracing::info!(
            original_name = %asset.original_name,
            asset_type = %asset.asset_type,
            id = %asset.id,
            "importing asset"
        );

        asset.path = asset.storage_name();
        asset.file_size = self.content.put_from(&asset.path, reader)?;

        let source = self.content.root().join(&asset.path);
        let thumbnail = self
            .thumbnails
            .generate(&source, &asset.id, asset.asset_type);
        asset.thumbnail_path = thumbnail.name;
        asset.tags = options.tags;
        asset.description = options.description;

        if let Err(e) = self.store.add(asset.clone()) {
            self.discard_files(&asset);
            return Err(e);
        }
        Ok(asset)
    }

    /// Import from an in-memory buffer
    pub fn import_bytes(&self, filename: &str, bytes: &[u8], options: ImportOptions) -> Result<Asset> {
        let mut reader = bytes;
        self.import(filename, &mut reader, options)
    }

    /// Import a local file, using its file name as the original name
    pub fn import_file<P: AsRef<Path>>(&self, path: P, options: ImportOptions) -> Result<Asset> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ReelError::ValidationError(format!("Invalid file name: {}", path.display()))
            })?
            .to_string();
        // Validate before opening so unsupported files are rejected early
        validate_filename(&filename)?;
        let mut file = std::fs::File::open(path)?;
        self.import(&filename, &mut file, options)
    }

    pub fn get(&self, id: &str) -> Option<Asset> {
        self.store.get(id)
    }

    pub fn search(&self, filter: &AssetQuery) -> Vec<Asset> {
        self.store.search(filter)
    }

    pub fn update_tags(&self, id: &str, tags: Vec<String>) -> Result<bool> {
        self.store.update_tags(id, tags)
    }

    pub fn all_tags(&self) -> Vec<String> {
        self.store.all_tags()
    }

    /// Delete an asset: index entry first, then its binary and thumbnail.
    ///
    /// Returns false when the id is unknown.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let Some(asset) = self.store.get(id) else {
            return Ok(false);
        };
        if !self.store.remove(id)? {
            return Ok(false);
        }
        self.discard_files(&asset);
        tracing::info!(id, name = %asset.name, "deleted asset");
        Ok(true)
    }

    /// Rebuild the preview for an existing asset
    pub fn regenerate_thumbnail(&self, id: &str) -> Result<Option<Thumbnail>> {
        let Some(asset) = self.store.get(id) else {
            return Ok(None);
        };
        let thumbnail = self
            .thumbnails
            .generate(&self.asset_path(&asset), &asset.id, asset.asset_type);
        Ok(Some(thumbnail))
    }

    /// Absolute location of an asset's binary
    pub fn asset_path(&self, asset: &Asset) -> PathBuf {
        self.content.root().join(&asset.path)
    }

    /// Absolute location of an asset's thumbnail
    pub fn thumbnail_path(&self, asset: &Asset) -> PathBuf {
        self.thumbnails.dir().join(&asset.thumbnail_path)
    }

    fn discard_files(&self, asset: &Asset) {
        if let Err(e) = self.content.remove(&asset.path) {
            tracing::warn!(id = %asset.id, error = %e, "failed to remove asset binary");
        }
        if asset.thumbnail_path.is_empty() {
            return;
        }
        let thumb = self.thumbnail_path(asset);
        match std::fs::remove_file(&thumb) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %thumb.display(), error = %e, "failed to remove thumbnail")
            }
        }
    }
}

/// Reject uploads before anything touches the disk.
///
/// Returns the bare file name with any client-side directories stripped.
fn validate_filename(filename: &str) -> Result<String> {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() {
        return Err(ReelError::ValidationError("File name is empty".to_string()));
    }
    if !is_supported(base) {
        return Err(ReelError::ValidationError(format!(
            "Unsupported file type: .{}",
            extension_of(base)
        )));
    }
    Ok(base.to_string())
}
