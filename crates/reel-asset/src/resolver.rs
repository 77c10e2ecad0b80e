//! Weak asset reference resolution
//!
//! Other records point at assets by id without owning them. The referent
//! may have been deleted since; resolution reports that instead of failing.

use crate::catalog::AssetStore;
use crate::types::Asset;

/// Result of resolving one asset id
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Asset was found
    Found(Asset),
    /// The id no longer names an asset
    Dangling { id: String },
}

impl Resolution {
    /// Check if the asset was found
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn asset(&self) -> Option<&Asset> {
        match self {
            Resolution::Found(asset) => Some(asset),
            Resolution::Dangling { .. } => None,
        }
    }
}

/// Resolve a single id against the store
pub fn resolve(id: &str, store: &AssetStore) -> Resolution {
    match store.get(id) {
        Some(asset) => Resolution::Found(asset),
        None => {
            tracing::debug!(id, "dangling asset reference");
            Resolution::Dangling { id: id.to_string() }
        }
    }
}

/// Resolve many ids, preserving their order
pub fn resolve_all<'a, I>(ids: I, store: &AssetStore) -> Vec<Resolution>
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter().map(|id| resolve(id, store)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("reel_resolver_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn store_with_chair(dir: &std::path::Path) -> (AssetStore, String) {
        let store = AssetStore::open(dir.join("asset_store.json")).unwrap();
        let asset = Asset::new("chair.png");
        let id = asset.id.clone();
        store.add(asset).unwrap();
        (store, id)
    }

    #[test]
    fn test_resolve_found() {
        let dir = temp_dir();
        let (store, id) = store_with_chair(&dir);
        let result = resolve(&id, &store);
        assert!(result.is_found());
        assert_eq!(result.asset().unwrap().name, "chair");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_resolve_dangling() {
        let dir = temp_dir();
        let (store, id) = store_with_chair(&dir);
        store.remove(&id).unwrap();

        let result = resolve(&id, &store);
        assert_eq!(result, Resolution::Dangling { id: id.clone() });
        assert!(result.asset().is_none());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_resolve_all_keeps_order() {
        let dir = temp_dir();
        let (store, id) = store_with_chair(&dir);
        let results = resolve_all(["gone0001", id.as_str()], &store);
        assert_eq!(results.len(), 2);
        assert!(!results[0].is_found());
        assert!(results[1].is_found());
        std::fs::remove_dir_all(&dir).ok();
    }
}
