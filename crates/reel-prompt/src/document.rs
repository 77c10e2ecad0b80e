//! Five-element prompt documents
//!
//! A document describes one video shot through five free-text elements
//! (subject, scene, action, camera, atmosphere) plus the generation
//! parameters, and references assets from the library by id.

use crate::params::{
    TaskType, DEFAULT_DURATION, DEFAULT_MODEL, DEFAULT_RATIO, DEFAULT_RESOLUTION, DURATION_RANGE,
    RATIOS, RESOLUTIONS,
};
use reel_core::{is_valid_id, now_epoch_secs, short_id, ReelError, Result};
use serde::{Deserialize, Serialize};

/// Separator placed between elements when composing prompt text
pub const ELEMENT_SEPARATOR: &str = "，";

/// Role assumed for a reference that does not state one
pub const DEFAULT_REF_ROLE: &str = "reference_image";

/// One of the five prompt elements, with the hint shown to authors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptElement {
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
}

/// The five elements in composition order
pub const ELEMENTS: [PromptElement; 5] = [
    PromptElement {
        key: "subject",
        label: "角色指定",
        placeholder: "描述主体：外貌特征、服装、表情、姿态。",
    },
    PromptElement {
        key: "scene",
        label: "场景设定",
        placeholder: "描述环境：时代背景、地点、光照条件。",
    },
    PromptElement {
        key: "action",
        label: "动作/剧情",
        placeholder: "描述运动序列：主体动作、互动、时间顺序。",
    },
    PromptElement {
        key: "camera",
        label: "镜头语言",
        placeholder: "描述运镜方式：推/拉/摇/移/环绕/跟随/升降。",
    },
    PromptElement {
        key: "atmosphere",
        label: "氛围/声音",
        placeholder: "描述风格、色调、音效。",
    },
];

/// Weak reference from a document to a library asset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefAsset {
    #[serde(default, alias = "asset_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Media kind as stated by the author (`image`, `video_url`, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ref_type: Option<String>,
    /// Location handed to the generation API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl RefAsset {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn role_or_default(&self) -> &str {
        self.role.as_deref().unwrap_or(DEFAULT_REF_ROLE)
    }

    /// Content part type on the wire: `image_url` unless another kind is stated
    pub fn wire_type(&self) -> &str {
        match self.ref_type.as_deref() {
            None | Some("image") => "image_url",
            Some(other) => other,
        }
    }
}

/// A structured video prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDocument {
    #[serde(default = "short_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "now_epoch_secs")]
    pub created_at: f64,
    #[serde(default = "now_epoch_secs")]
    pub updated_at: f64,

    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub scene: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub camera: String,
    #[serde(default)]
    pub atmosphere: String,

    #[serde(default)]
    pub task_type: TaskType,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_resolution")]
    pub resolution: String,
    /// Clip length in seconds
    #[serde(default = "default_duration")]
    pub duration: i64,
    #[serde(default = "default_ratio")]
    pub ratio: String,

    #[serde(default)]
    pub ref_assets: Vec<RefAsset>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_resolution() -> String {
    DEFAULT_RESOLUTION.to_string()
}
fn default_duration() -> i64 {
    DEFAULT_DURATION
}
fn default_ratio() -> String {
    DEFAULT_RATIO.to_string()
}

impl Default for PromptDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptDocument {
    /// Create an empty document with default parameters
    pub fn new() -> Self {
        let now = now_epoch_secs();
        Self {
            id: short_id(),
            name: String::new(),
            created_at: now,
            updated_at: now,
            subject: String::new(),
            scene: String::new(),
            action: String::new(),
            camera: String::new(),
            atmosphere: String::new(),
            task_type: TaskType::default(),
            model: default_model(),
            resolution: default_resolution(),
            duration: DEFAULT_DURATION,
            ratio: default_ratio(),
            ref_assets: Vec::new(),
        }
    }

    /// Element values in composition order
    pub fn elements(&self) -> [&str; 5] {
        [
            self.subject.as_str(),
            self.scene.as_str(),
            self.action.as_str(),
            self.camera.as_str(),
            self.atmosphere.as_str(),
        ]
    }

    /// Value of an element by key
    pub fn element(&self, key: &str) -> Option<&str> {
        ELEMENTS
            .iter()
            .position(|e| e.key == key)
            .map(|i| self.elements()[i])
    }

    /// Set an element by key
    pub fn set_element(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let slot = match key {
            "subject" => &mut self.subject,
            "scene" => &mut self.scene,
            "action" => &mut self.action,
            "camera" => &mut self.camera,
            "atmosphere" => &mut self.atmosphere,
            _ => {
                return Err(ReelError::InvalidEnumValue {
                    value: key.to_string(),
                    allowed: ELEMENTS.iter().map(|e| e.key.to_string()).collect(),
                })
            }
        };
        *slot = value.into();
        Ok(())
    }

    /// Compose the prompt text from the non-empty elements
    pub fn build_text(&self) -> String {
        self.elements()
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(ELEMENT_SEPARATOR)
    }

    /// Check the id and the video parameters against the supported values
    pub fn validate(&self) -> Result<()> {
        if !is_valid_id(&self.id) {
            return Err(ReelError::ValidationError(format!(
                "Invalid document id: {:?}",
                self.id
            )));
        }

        let (min, max) = DURATION_RANGE;
        if !(min..=max).contains(&self.duration) {
            return Err(ReelError::ValueOutOfRange {
                field: "duration".to_string(),
                min,
                max,
                value: self.duration,
            });
        }
        check_allowed(&self.resolution, RESOLUTIONS)?;
        check_allowed(&self.ratio, RATIOS)?;
        Ok(())
    }

    /// Record with every field plus the derived `prompt_text`
    pub fn to_record(&self) -> serde_json::Value {
        let mut record = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        if let Some(map) = record.as_object_mut() {
            map.insert(
                "prompt_text".to_string(),
                serde_json::Value::String(self.build_text()),
            );
        }
        record
    }

    /// Rebuild a document from a record; absent or null fields take their defaults
    pub fn from_record(record: &serde_json::Value) -> Result<Self> {
        let mut record = record.clone();
        strip_nulls(&mut record);
        if let Some(refs) = record.get_mut("ref_assets").and_then(|r| r.as_array_mut()) {
            refs.iter_mut().for_each(strip_nulls);
        }
        Ok(PromptDocument::deserialize(&record)?)
    }

    /// Parse a document from JSON text with the same leniency as `from_record`
    pub fn from_json(content: &str) -> Result<Self> {
        let record: serde_json::Value = serde_json::from_str(content)?;
        Self::from_record(&record)
    }
}

fn strip_nulls(record: &mut serde_json::Value) {
    if let Some(map) = record.as_object_mut() {
        map.retain(|_, v| !v.is_null());
    }
}

fn check_allowed(value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ReelError::InvalidEnumValue {
        value: value.to_string(),
        allowed: allowed.iter().map(|s| s.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_text_skips_empty_elements() {
        let mut doc = PromptDocument::new();
        doc.subject = "A".into();
        doc.camera = "C".into();
        assert_eq!(doc.build_text(), "A，C");
    }

    #[test]
    fn test_build_text_order_and_empty() {
        let mut doc = PromptDocument::new();
        assert_eq!(doc.build_text(), "");

        doc.atmosphere = "暖色调".into();
        doc.subject = "一只橘猫".into();
        doc.scene = "客厅".into();
        doc.action = "打哈欠".into();
        doc.camera = "近景".into();
        assert_eq!(doc.build_text(), "一只橘猫，客厅，打哈欠，近景，暖色调");
    }

    #[test]
    fn test_elements_by_key() {
        let mut doc = PromptDocument::new();
        doc.set_element("scene", "雨夜街道").unwrap();
        assert_eq!(doc.element("scene"), Some("雨夜街道"));
        assert_eq!(doc.element("plot"), None);
        assert!(doc.set_element("plot", "x").is_err());

        let keys: Vec<_> = ELEMENTS.iter().map(|e| e.key).collect();
        assert_eq!(keys, ["subject", "scene", "action", "camera", "atmosphere"]);
    }

    #[test]
    fn test_from_record_defaults() {
        let doc = PromptDocument::from_record(&json!({})).unwrap();
        assert_eq!(doc.id.len(), reel_core::SHORT_ID_LEN);
        assert_eq!(doc.name, "");
        assert_eq!(doc.task_type, TaskType::TextToVideo);
        assert_eq!(doc.model, "doubao-seedance-2-0-260128");
        assert_eq!(doc.resolution, "720p");
        assert_eq!(doc.duration, 5);
        assert_eq!(doc.ratio, "16:9");
        assert!(doc.ref_assets.is_empty());
        assert!(doc.created_at > 0.0);
    }

    #[test]
    fn test_record_round_trip_with_prompt_text() {
        let mut doc = PromptDocument::new();
        doc.subject = "香水瓶".into();
        doc.created_at = 1_700_000_000.123_456_7;
        doc.updated_at = 1_700_000_100.987_654_3;
        doc.task_type = TaskType::ImageToVideo;
        doc.ref_assets.push(RefAsset::new("ab12cd34").with_role("first_frame"));

        let record = doc.to_record();
        assert_eq!(record["prompt_text"], "香水瓶");
        assert_eq!(record["task_type"], "image2video");
        assert_eq!(record["ref_assets"][0]["id"], "ab12cd34");

        let back = PromptDocument::from_record(&record).unwrap();
        assert_eq!(back, doc);

        let text = serde_json::to_string_pretty(&record).unwrap();
        let reread = PromptDocument::from_json(&text).unwrap();
        assert_eq!(reread.created_at.to_bits(), doc.created_at.to_bits());
        assert_eq!(reread, doc);
    }

    #[test]
    fn test_null_fields_take_defaults() {
        let doc = PromptDocument::from_record(&json!({
            "id": "ab12cd34",
            "name": null,
            "subject": null,
            "scene": "江南水乡",
            "model": null,
            "ratio": null,
            "duration": null,
            "ref_assets": [{"id": "ef56ab78", "role": null, "path": null}]
        }))
        .unwrap();
        assert_eq!(doc.id, "ab12cd34");
        assert_eq!(doc.name, "");
        assert_eq!(doc.subject, "");
        assert_eq!(doc.model, "doubao-seedance-2-0-260128");
        assert_eq!(doc.ratio, "16:9");
        assert_eq!(doc.duration, 5);
        assert_eq!(doc.build_text(), "江南水乡");
        assert_eq!(doc.ref_assets[0].role_or_default(), "reference_image");

        let null_refs = PromptDocument::from_record(&json!({"ref_assets": null})).unwrap();
        assert!(null_refs.ref_assets.is_empty());
    }

    #[test]
    fn test_unknown_task_type_round_trips() {
        let doc = PromptDocument::from_record(&json!({
            "id": "ab12cd34",
            "task_type": "first_last_frame"
        }))
        .unwrap();
        assert_eq!(doc.task_type, TaskType::Other("first_last_frame".into()));

        let record = doc.to_record();
        assert_eq!(record["task_type"], "first_last_frame");
        assert_eq!(PromptDocument::from_record(&record).unwrap(), doc);
    }

    #[test]
    fn test_ref_asset_accepts_asset_id_key() {
        let doc = PromptDocument::from_record(&json!({
            "ref_assets": [{"asset_id": "ab12cd34", "role": "reference_image"}]
        }))
        .unwrap();
        assert_eq!(doc.ref_assets[0].id, "ab12cd34");
    }

    #[test]
    fn test_ref_wire_type_and_role() {
        let plain = RefAsset::new("a");
        assert_eq!(plain.wire_type(), "image_url");
        assert_eq!(plain.role_or_default(), "reference_image");

        let image = RefAsset {
            ref_type: Some("image".into()),
            ..RefAsset::new("b")
        };
        assert_eq!(image.wire_type(), "image_url");

        let video = RefAsset {
            ref_type: Some("video_url".into()),
            ..RefAsset::new("c")
        };
        assert_eq!(video.wire_type(), "video_url");
    }

    #[test]
    fn test_validate() {
        let mut doc = PromptDocument::new();
        assert!(doc.validate().is_ok());

        doc.duration = 13;
        assert!(matches!(
            doc.validate(),
            Err(ReelError::ValueOutOfRange { value: 13, .. })
        ));
        doc.duration = 2;
        assert!(doc.validate().is_ok());

        doc.resolution = "1080p".into();
        assert!(matches!(doc.validate(), Err(ReelError::InvalidEnumValue { .. })));
        doc.resolution = "480p".into();

        doc.ratio = "21:9".into();
        assert!(doc.validate().unwrap_err().is_validation());
        doc.ratio = "9:16".into();

        doc.id = "../x".into();
        assert!(doc.validate().is_err());
    }

    #[test]
    fn test_load_is_permissive() {
        let doc = PromptDocument::from_record(&json!({"duration": 99, "ratio": "2:1"})).unwrap();
        assert_eq!(doc.duration, 99);
        assert!(doc.validate().is_err());
    }
}
