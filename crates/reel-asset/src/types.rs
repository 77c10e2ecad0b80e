//! Asset type definitions

use reel_core::{now_epoch_secs, short_id, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of media the library can hold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    #[default]
    Image,
    Video,
    Audio,
}

impl AssetType {
    pub const ALL: [AssetType; 3] = [AssetType::Image, AssetType::Video, AssetType::Audio];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Image => "image",
            AssetType::Video => "video",
            AssetType::Audio => "audio",
        }
    }

    /// Lowercase extensions that classify as this type
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AssetType::Image => IMAGE_EXTENSIONS,
            AssetType::Video => VIDEO_EXTENSIONS,
            AssetType::Audio => AUDIO_EXTENSIONS,
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "image" => Ok(AssetType::Image),
            "video" => Ok(AssetType::Video),
            "audio" => Ok(AssetType::Audio),
            other => Err(format!(
                "unknown asset type '{}'; valid values: image, video, audio",
                other
            )),
        }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "aac", "ogg", "flac"];

/// Lowercased text after the last `.`, or empty when there is none
pub fn extension_of(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Classify a filename by extension. Unknown extensions are images.
pub fn classify(filename: &str) -> AssetType {
    let ext = extension_of(filename);
    AssetType::ALL
        .into_iter()
        .find(|t| t.extensions().contains(&ext.as_str()))
        .unwrap_or_default()
}

/// Whether the extension appears in the classifier table at all
pub fn is_supported(filename: &str) -> bool {
    let ext = extension_of(filename);
    AssetType::ALL
        .iter()
        .any(|t| t.extensions().contains(&ext.as_str()))
}

/// Metadata for one imported media file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default = "short_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(rename = "type", default)]
    pub asset_type: AssetType,
    /// Storage name of the binary, relative to the assets directory
    #[serde(default)]
    pub path: String,
    /// Storage name of the preview, relative to the thumbnails directory
    #[serde(default)]
    pub thumbnail_path: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// Seconds since the Unix epoch
    #[serde(default = "now_epoch_secs")]
    pub created_at: f64,
    /// Size of the binary in bytes
    #[serde(default)]
    pub file_size: u64,
}

impl Asset {
    /// Create a fresh asset for an uploaded file name.
    ///
    /// Assigns the id, derives the display name from the file stem and
    /// classifies the type. Storage paths are filled in by the import
    /// pipeline.
    pub fn new(original_name: &str) -> Self {
        // Leading dots belong to the stem: ".png" keeps ".png" as its name
        let name = original_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .filter(|stem| !stem.trim_start_matches('.').is_empty())
            .unwrap_or(original_name)
            .to_string();

        Self {
            id: short_id(),
            name,
            original_name: original_name.to_string(),
            asset_type: classify(original_name),
            path: String::new(),
            thumbnail_path: String::new(),
            tags: Vec::new(),
            description: String::new(),
            created_at: now_epoch_secs(),
            file_size: 0,
        }
    }

    /// Storage name for the binary: `<id>.<ext>`, `bin` when there is no extension
    pub fn storage_name(&self) -> String {
        let ext = extension_of(&self.original_name);
        let ext = if ext.is_empty() { "bin".to_string() } else { ext };
        format!("{}.{}", self.id, ext)
    }

    /// Case-insensitive substring match against name or description.
    /// `query` must already be lowercased.
    pub(crate) fn matches_query(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query) || self.description.to_lowercase().contains(query)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Plain structured record for the wire
    pub fn to_record(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Rebuild an asset from a record; missing fields take their defaults
    pub fn from_record(record: &serde_json::Value) -> Result<Self> {
        Ok(Asset::deserialize(record)?)
    }
}
