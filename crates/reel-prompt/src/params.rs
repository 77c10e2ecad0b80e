//! Video generation parameter tables

use serde::{Deserialize, Serialize};
use std::fmt;

/// A generation model offered to the author
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub recommended: bool,
}

pub const MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "doubao-seedance-2-0-260128",
        name: "Seedance 2.0",
        recommended: true,
    },
    ModelInfo {
        id: "doubao-seedance-1-5-pro",
        name: "Seedance 1.5 Pro",
        recommended: false,
    },
    ModelInfo {
        id: "doubao-seedance-1-0-pro",
        name: "Seedance 1.0 Pro",
        recommended: false,
    },
    ModelInfo {
        id: "doubao-seedance-1-0-pro-fast",
        name: "Seedance 1.0 Pro Fast",
        recommended: false,
    },
];

pub const DEFAULT_MODEL: &str = "doubao-seedance-2-0-260128";

pub const RESOLUTIONS: &[&str] = &["480p", "720p"];
pub const DEFAULT_RESOLUTION: &str = "720p";

pub const RATIOS: &[&str] = &["16:9", "4:3", "1:1", "9:16", "3:4"];
pub const DEFAULT_RATIO: &str = "16:9";

/// Output frame rate, fixed for every model
pub const FPS: u32 = 24;

/// Inclusive clip length bounds in seconds
pub const DURATION_RANGE: (i64, i64) = (2, 12);
pub const DEFAULT_DURATION: i64 = 5;

/// Look up a model by id
pub fn model(id: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|m| m.id == id)
}

/// Kind of generation task a document describes.
///
/// Names this build does not know are kept verbatim in `Other` so older
/// or newer project files still load and save unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskType {
    #[default]
    TextToVideo,
    ImageToVideo,
    VideoEdit,
    VideoExtend,
    Other(String),
}

impl TaskType {
    pub const ALL: [TaskType; 4] = [
        TaskType::TextToVideo,
        TaskType::ImageToVideo,
        TaskType::VideoEdit,
        TaskType::VideoExtend,
    ];

    /// Wire name
    pub fn as_str(&self) -> &str {
        match self {
            TaskType::TextToVideo => "text2video",
            TaskType::ImageToVideo => "image2video",
            TaskType::VideoEdit => "video_edit",
            TaskType::VideoExtend => "video_extend",
            TaskType::Other(name) => name,
        }
    }

    /// Display name shown to authors
    pub fn label(&self) -> &str {
        match self {
            TaskType::TextToVideo => "文生视频",
            TaskType::ImageToVideo => "图生视频",
            TaskType::VideoEdit => "视频编辑",
            TaskType::VideoExtend => "视频延长",
            TaskType::Other(name) => name,
        }
    }
}

impl From<&str> for TaskType {
    fn from(s: &str) -> Self {
        TaskType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .unwrap_or_else(|| TaskType::Other(s.to_string()))
    }
}

impl From<String> for TaskType {
    fn from(s: String) -> Self {
        match TaskType::from(s.as_str()) {
            TaskType::Other(_) => TaskType::Other(s),
            known => known,
        }
    }
}

impl From<TaskType> for String {
    fn from(task: TaskType) -> Self {
        match task {
            TaskType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter tables as display lines, models first
pub fn describe() -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Models:".to_string());
    for m in MODELS {
        let marker = if m.recommended { " (recommended)" } else { "" };
        lines.push(format!("  {:<30} {}{}", m.id, m.name, marker));
    }
    lines.push("Task types:".to_string());
    for task in TaskType::ALL {
        lines.push(format!("  {:<30} {}", task.as_str(), task.label()));
    }
    lines.push(format!("Resolutions: {}", RESOLUTIONS.join(", ")));
    lines.push(format!("Ratios: {}", RATIOS.join(", ")));
    lines.push(format!(
        "Duration: {}-{}s, {} fps",
        DURATION_RANGE.0, DURATION_RANGE.1, FPS
    ));
    lines
}
