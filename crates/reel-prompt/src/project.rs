//! Project persistence for prompt documents
//!
//! Each document is stored as `<id>.json` in the projects directory so
//! projects can be copied or versioned individually.

use crate::document::PromptDocument;
use crate::params::TaskType;
use reel_core::{fs, is_valid_id, now_epoch_secs, ReelError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Listing entry for a saved project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub task_type: TaskType,
    pub created_at: f64,
    pub updated_at: f64,
}

impl From<&PromptDocument> for ProjectSummary {
    fn from(doc: &PromptDocument) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.name.clone(),
            task_type: doc.task_type.clone(),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// File-based project store
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    /// Create a new project store at the given root directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate and save a document, returning its id.
    ///
    /// Unnamed documents are named `项目_<id>`; `updated_at` is refreshed.
    pub fn save(&self, doc: &mut PromptDocument) -> Result<String> {
        doc.validate()?;
        if doc.name.trim().is_empty() {
            doc.name = format!("项目_{}", doc.id);
        }
        doc.updated_at = now_epoch_secs();

        self.write(doc)?;
        tracing::info!(id = %doc.id, name = %doc.name, "saved project");
        Ok(doc.id.clone())
    }

    /// Write a document as-is
    fn write(&self, doc: &PromptDocument) -> Result<()> {
        let path = self.path_for(&doc.id)?;
        fs::write_json_atomic(path, &doc.to_record())
    }

    /// Load a project by id. Returns `None` when it does not exist.
    pub fn load(&self, id: &str) -> Result<Option<PromptDocument>> {
        let path = self.path_for(id)?;
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        let doc = PromptDocument::from_json(&content).map_err(|e| {
            ReelError::JsonError(format!("Failed to parse project {}: {}", path.display(), e))
        })?;
        Ok(Some(doc))
    }

    /// List saved projects, most recently updated first.
    ///
    /// Files that cannot be read or parsed are skipped.
    pub fn list(&self) -> Result<Vec<ProjectSummary>> {
        let mut projects = Vec::new();

        if !self.root.exists() {
            return Ok(projects);
        }

        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") || !path.is_file() {
                continue;
            }

            let parsed = std::fs::read_to_string(&path)
                .map_err(ReelError::from)
                .and_then(|content| PromptDocument::from_json(&content));
            match parsed {
                Ok(doc) => projects.push(ProjectSummary::from(&doc)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable project file")
                }
            }
        }

        projects.sort_by(|a, b| b.updated_at.total_cmp(&a.updated_at));
        Ok(projects)
    }

    /// Delete a project. Returns false when it did not exist.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let path = self.path_for(id)?;
        if !path.is_file() {
            return Ok(false);
        }
        std::fs::remove_file(&path)?;
        tracing::info!(id, "deleted project");
        Ok(true)
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        if !is_valid_id(id) {
            return Err(ReelError::ValidationError(format!(
                "Invalid project id: {:?}",
                id
            )));
        }
        Ok(self.root.join(format!("{}.json", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("reel_project_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_save_and_load() {
        let dir = temp_dir();
        let store = ProjectStore::new(dir.join("projects"));

        let mut doc = PromptDocument::new();
        doc.subject = "一位穿着红色汉服的年轻女子".into();
        let before = doc.updated_at;
        let id = store.save(&mut doc).unwrap();

        assert_eq!(id, doc.id);
        assert_eq!(doc.name, format!("项目_{}", id));
        assert!(doc.updated_at >= before);

        let loaded = store.load(&id).unwrap().unwrap();
        assert_eq!(loaded.subject, doc.subject);
        assert_eq!(loaded.name, doc.name);

        let raw = std::fs::read_to_string(dir.join("projects").join(format!("{}.json", id))).unwrap();
        assert!(raw.contains("红色汉服"), "non-ASCII text is stored unescaped");
        assert!(raw.contains("\"prompt_text\""));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_keeps_explicit_name() {
        let dir = temp_dir();
        let store = ProjectStore::new(&dir);
        let mut doc = PromptDocument::new();
        doc.name = "雨夜".into();
        store.save(&mut doc).unwrap();
        assert_eq!(doc.name, "雨夜");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_rejects_invalid_parameters() {
        let dir = temp_dir();
        let store = ProjectStore::new(&dir);
        let mut doc = PromptDocument::new();
        doc.duration = 30;

        let err = store.save(&mut doc).unwrap_err();
        assert!(err.is_validation());
        assert!(store.list().unwrap().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_and_invalid_id() {
        let dir = temp_dir();
        let store = ProjectStore::new(&dir);
        assert!(store.load("nope1234").unwrap().is_none());
        assert!(store.load("../secret").is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_corrupt_is_error() {
        let dir = temp_dir();
        let store = ProjectStore::new(&dir);
        std::fs::write(dir.join("bad00001.json"), "{ not json").unwrap();
        assert!(store.load("bad00001").is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_list_most_recent_first_skipping_malformed() {
        let dir = temp_dir();
        let store = ProjectStore::new(&dir);

        for (name, updated_at) in [("first", 100.0), ("third", 300.0), ("second", 200.0)] {
            let mut doc = PromptDocument::new();
            doc.name = name.to_string();
            doc.updated_at = updated_at;
            store.write(&doc).unwrap();
        }
        std::fs::write(dir.join("broken01.json"), "[1, 2").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let names: Vec<_> = store.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["third", "second", "first"]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_legacy_file_loads_and_lists() {
        let dir = temp_dir();
        let store = ProjectStore::new(&dir);

        let mut doc = PromptDocument::new();
        doc.name = "current".into();
        store.save(&mut doc).unwrap();
        std::fs::write(
            dir.join("abcd1234.json"),
            r#"{"id": "abcd1234", "name": "legacy", "task_type": "first_last_frame",
                "subject": null, "scene": "古镇", "updated_at": 1.0}"#,
        )
        .unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].name, "legacy");
        assert_eq!(listed[1].task_type, TaskType::Other("first_last_frame".into()));

        let legacy = store.load("abcd1234").unwrap().unwrap();
        assert_eq!(legacy.subject, "");
        assert_eq!(legacy.build_text(), "古镇");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_timestamps_survive_reload() {
        let dir = temp_dir();
        let store = ProjectStore::new(&dir);

        let mut doc = PromptDocument::new();
        doc.created_at = 1_717_171_717.123_456_7;
        let id = store.save(&mut doc).unwrap();

        let loaded = store.load(&id).unwrap().unwrap();
        assert_eq!(loaded.created_at.to_bits(), doc.created_at.to_bits());
        assert_eq!(loaded.updated_at.to_bits(), doc.updated_at.to_bits());
        assert_eq!(loaded, doc);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_list_missing_root() {
        let store = ProjectStore::new(std::env::temp_dir().join(format!(
            "reel_project_test_missing_{}",
            uuid::Uuid::new_v4()
        )));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let dir = temp_dir();
        let store = ProjectStore::new(&dir);
        let mut doc = PromptDocument::new();
        let id = store.save(&mut doc).unwrap();

        assert!(store.delete(&id).unwrap());
        assert!(store.load(&id).unwrap().is_none());
        assert!(!store.delete(&id).unwrap());
        assert!(store.delete("a/b").is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
