//! Durable asset index backed by a single JSON file

use crate::types::{Asset, AssetType};
use reel_core::{fs, ReelError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

/// On-disk shape of the index: `{ "assets": [ ... ] }`
#[derive(Debug, Default, Deserialize)]
struct IndexFile {
    #[serde(default)]
    assets: Vec<Asset>,
}

/// Filters for [`AssetStore::search`]. Empty fields match everything;
/// populated fields are intersected.
#[derive(Debug, Clone, Default)]
pub struct AssetQuery {
    /// Case-insensitive substring of name or description
    pub query: Option<String>,
    /// Exact tag membership
    pub tag: Option<String>,
    pub asset_type: Option<AssetType>,
}

impl AssetQuery {
    pub fn text(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_type(mut self, asset_type: AssetType) -> Self {
        self.asset_type = Some(asset_type);
        self
    }
}

/// Mapping from asset id to [`Asset`], persisted to one index file.
///
/// Every mutation rewrites the whole index atomically. Mutations are
/// serialized by a writer lock; readers clone a snapshot of the current
/// collection and never wait on a write in progress.
#[derive(Debug)]
pub struct AssetStore {
    index_path: PathBuf,
    snapshot: RwLock<Arc<Vec<Asset>>>,
    writer: Mutex<()>,
}

impl AssetStore {
    /// Open the store at `index_path`, loading it when it exists
    pub fn open<P: AsRef<Path>>(index_path: P) -> Result<Self> {
        let index_path = index_path.as_ref().to_path_buf();
        let assets = if index_path.exists() {
            let content = std::fs::read_to_string(&index_path)?;
            let file: IndexFile = serde_json::from_str(&content)?;
            file.assets
        } else {
            Vec::new()
        };

        tracing::debug!(
            path = %index_path.display(),
            count = assets.len(),
            "opened asset index"
        );

        Ok(Self {
            index_path,
            snapshot: RwLock::new(Arc::new(assets)),
            writer: Mutex::new(()),
        })
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Snapshot of all assets in insertion order
    pub fn all(&self) -> Arc<Vec<Asset>> {
        match self.snapshot.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Append an asset and persist the collection. An id already in the
    /// index is rejected.
    pub fn add(&self, asset: Asset) -> Result<()> {
        let id = asset.id.clone();
        let added = self.mutate(|assets| {
            if assets.iter().any(|a| a.id == asset.id) {
                return false;
            }
            assets.push(asset);
            true
        })?;
        if !added {
            return Err(ReelError::ValidationError(format!(
                "Asset id already in use: {}",
                id
            )));
        }
        Ok(())
    }

    /// Remove an asset by id. Returns false when no such asset exists.
    pub fn remove(&self, id: &str) -> Result<bool> {
        self.mutate(|assets| {
            let before = assets.len();
            assets.retain(|a| a.id != id);
            assets.len() < before
        })
    }

    /// Get an asset by id
    pub fn get(&self, id: &str) -> Option<Asset> {
        self.all().iter().find(|a| a.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.all().iter().any(|a| a.id == id)
    }

    /// Assets matching every populated filter, in insertion order
    pub fn search(&self, filter: &AssetQuery) -> Vec<Asset> {
        let query = filter
            .query
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        let tag = filter.tag.as_deref().filter(|t| !t.is_empty());

        self.all()
            .iter()
            .filter(|a| query.as_deref().map_or(true, |q| a.matches_query(q)))
            .filter(|a| tag.map_or(true, |t| a.has_tag(t)))
            .filter(|a| filter.asset_type.map_or(true, |t| a.asset_type == t))
            .cloned()
            .collect()
    }

    /// Replace an asset's tags wholesale. Returns false when the id is unknown.
    pub fn update_tags(&self, id: &str, tags: Vec<String>) -> Result<bool> {
        self.mutate(|assets| match assets.iter_mut().find(|a| a.id == id) {
            Some(asset) => {
                asset.tags = tags;
                true
            }
            None => false,
        })
    }

    /// Every tag in use, sorted and de-duplicated
    pub fn all_tags(&self) -> Vec<String> {
        let tags: BTreeSet<String> = self
            .all()
            .iter()
            .flat_map(|a| a.tags.iter().cloned())
            .collect();
        tags.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.all().is_empty()
    }

    /// Read-modify-persist under the writer lock.
    ///
    /// `apply` edits a private copy and reports whether it changed anything.
    /// The copy is written to disk before it becomes visible, so a failed
    /// write leaves the in-memory state untouched.
    fn mutate<F>(&self, apply: F) -> Result<bool>
    where
        F: FnOnce(&mut Vec<Asset>) -> bool,
    {
        let _guard = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut assets: Vec<Asset> = self.all().as_ref().clone();
        if !apply(&mut assets) {
            return Ok(false);
        }

        fs::write_json_atomic(&self.index_path, &IndexFileRef { assets: &assets })?;

        let mut slot = match self.snapshot.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = Arc::new(assets);
        Ok(true)
    }
}

#[derive(Serialize)]
struct IndexFileRef<'a> {
    assets: &'a [Asset],
}
