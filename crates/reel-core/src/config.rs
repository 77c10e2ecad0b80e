//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `REEL_DATA_DIR`, `REEL_FFMPEG`, `REEL_DEFAULT_MODEL`
//! 2. Project-local: `.reel/config.toml`
//! 3. Global: `~/.reel/config.toml`

use crate::{ReelError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the data root lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Thumbnail generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    /// Bounding box width in pixels
    #[serde(default = "default_thumb_edge")]
    pub width: u32,
    /// Bounding box height in pixels
    #[serde(default = "default_thumb_edge")]
    pub height: u32,
    /// JPEG quality (1-100)
    #[serde(default = "default_quality")]
    pub quality: u8,
    /// Frame extraction executable
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,
    /// Upper bound on a single frame extraction
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: default_thumb_edge(),
            height: default_thumb_edge(),
            quality: default_quality(),
            ffmpeg: default_ffmpeg(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_thumb_edge() -> u32 {
    256
}
fn default_quality() -> u8 {
    85
}
fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

/// Prompt authoring defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Model assigned to new documents; `None` uses the built-in default
    #[serde(default)]
    pub default_model: Option<String>,
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReelConfigFile {
    #[serde(default)]
    pub storage: Option<StorageConfig>,
    #[serde(default)]
    pub thumbnail: Option<ThumbnailConfig>,
    #[serde(default)]
    pub prompt: Option<PromptConfig>,
}

/// Resolved configuration with environment variable overrides applied
#[derive(Debug, Clone, Default)]
pub struct ReelConfig {
    pub storage: StorageConfig,
    pub thumbnail: ThumbnailConfig,
    pub prompt: PromptConfig,
}

impl ReelConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = ReelConfig::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        let local_path = PathBuf::from(".reel/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            config.merge(local);
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load config from a specific file path only (env overrides still apply)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = ReelConfig::default();
        config.merge(Self::load_file(path)?);
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Config rooted at a specific data directory, all other settings default
    pub fn with_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        let mut config = ReelConfig::default();
        config.storage.data_dir = data_dir.as_ref().to_path_buf();
        config
    }

    pub fn data_dir(&self) -> &Path {
        &self.storage.data_dir
    }

    /// Directory holding original binaries (`assets/<id>.<ext>`)
    pub fn assets_dir(&self) -> PathBuf {
        self.storage.data_dir.join("assets")
    }

    /// Directory holding derived previews (`thumbnails/<id>_thumb.jpg`)
    pub fn thumbnails_dir(&self) -> PathBuf {
        self.storage.data_dir.join("thumbnails")
    }

    /// Directory holding one JSON file per prompt document
    pub fn projects_dir(&self) -> PathBuf {
        self.storage.data_dir.join("projects")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.storage.data_dir.join("logs")
    }

    /// The asset index file
    pub fn index_path(&self) -> PathBuf {
        self.storage.data_dir.join("asset_store.json")
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".reel").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<ReelConfigFile> {
        let content = std::fs::read_to_string(path)?;
        let file: ReelConfigFile = toml::from_str(&content).map_err(|e| {
            ReelError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        Ok(file)
    }

    /// Sections present in the overlay replace the current ones wholesale
    fn merge(&mut self, overlay: ReelConfigFile) {
        if let Some(storage) = overlay.storage {
            self.storage = storage;
        }
        if let Some(thumbnail) = overlay.thumbnail {
            self.thumbnail = thumbnail;
        }
        if let Some(prompt) = overlay.prompt {
            if prompt.default_model.is_some() {
                self.prompt.default_model = prompt.default_model;
            }
        }
    }

    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("REEL_DATA_DIR").filter(|v| !v.is_empty()) {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(ffmpeg) = lookup("REEL_FFMPEG").filter(|v| !v.is_empty()) {
            self.thumbnail.ffmpeg = ffmpeg;
        }
        if let Some(model) = lookup("REEL_DEFAULT_MODEL").filter(|v| !v.is_empty()) {
            self.prompt.default_model = Some(model);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn temp_config(content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("reel_config_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_config_file() {
        let config_str = r#"
[storage]
data_dir = "/srv/reel"

[thumbnail]
width = 320
height = 180
timeout_secs = 3
"#;
        let path = temp_config(config_str);
        let mut config = ReelConfig::default();
        config.merge(ReelConfig::load_file(&path).unwrap());

        assert_eq!(config.data_dir(), Path::new("/srv/reel"));
        assert_eq!(config.thumbnail.width, 320);
        assert_eq!(config.thumbnail.height, 180);
        assert_eq!(config.thumbnail.timeout_secs, 3);
        // Unset keys inside a present section fall back to defaults
        assert_eq!(config.thumbnail.quality, 85);
        assert_eq!(config.thumbnail.ffmpeg, "ffmpeg");

        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("REEL_DATA_DIR", "/tmp/reel-env"),
            ("REEL_FFMPEG", "/opt/ffmpeg/bin/ffmpeg"),
            ("REEL_DEFAULT_MODEL", "doubao-seedance-1-0-pro"),
        ]
        .into_iter()
        .collect();

        let mut config = ReelConfig::default();
        config.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.data_dir(), Path::new("/tmp/reel-env"));
        assert_eq!(config.thumbnail.ffmpeg, "/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(
            config.prompt.default_model.as_deref(),
            Some("doubao-seedance-1-0-pro")
        );
    }

    #[test]
    fn test_empty_env_is_ignored() {
        let mut config = ReelConfig::default();
        config.apply_env_overrides(|_| Some(String::new()));
        assert_eq!(config.data_dir(), Path::new("data"));
        assert_eq!(config.thumbnail.ffmpeg, "ffmpeg");
    }

    #[test]
    fn test_derived_paths() {
        let config = ReelConfig::with_data_dir("/var/lib/reel");
        assert_eq!(config.assets_dir(), PathBuf::from("/var/lib/reel/assets"));
        assert_eq!(config.thumbnails_dir(), PathBuf::from("/var/lib/reel/thumbnails"));
        assert_eq!(config.projects_dir(), PathBuf::from("/var/lib/reel/projects"));
        assert_eq!(config.index_path(), PathBuf::from("/var/lib/reel/asset_store.json"));
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let path = temp_config("[thumbnail\nwidth = ");
        let err = ReelConfig::load_file(&path).unwrap_err();
        assert!(matches!(err, ReelError::ConfigError(msg) if msg.contains("config.toml")));
        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(path.parent().unwrap()).ok();
    }
}
