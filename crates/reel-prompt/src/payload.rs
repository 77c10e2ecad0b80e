//! Generation API request body

use crate::document::{PromptDocument, RefAsset};
use crate::params::FPS;
use reel_asset::{resolve, AssetStore, Resolution};
use serde::{Deserialize, Serialize};

/// Request body accepted by the video generation API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiPayload {
    pub model: String,
    pub content: Vec<ContentPart>,
    pub video_config: VideoConfig,
}

/// One entry of the `content` array: the prompt text first, then references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    Text(TextPart),
    Media(MediaPart),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPart {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaPart {
    #[serde(rename = "type")]
    pub kind: String,
    pub image_url: MediaUrl,
    #[serde(rename = "image_role")]
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    pub resolution: String,
    pub duration: i64,
    pub ratio: String,
    pub fps: u32,
}

impl ContentPart {
    fn text(text: String) -> Self {
        ContentPart::Text(TextPart {
            kind: "text".to_string(),
            text,
        })
    }

    fn media(reference: &RefAsset, url: String) -> Self {
        ContentPart::Media(MediaPart {
            kind: reference.wire_type().to_string(),
            image_url: MediaUrl { url },
            role: reference.role_or_default().to_string(),
        })
    }
}

impl ApiPayload {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl PromptDocument {
    /// Build the API request using each reference's stored path as its url
    pub fn to_api_payload(&self) -> ApiPayload {
        self.payload_with(|r| r.path.clone().unwrap_or_default())
    }

    /// Build the API request, resolving references without a path through
    /// the asset store. Dangling references keep an empty url.
    pub fn to_api_payload_resolved(&self, store: &AssetStore) -> ApiPayload {
        self.payload_with(|r| {
            if let Some(path) = &r.path {
                return path.clone();
            }
            match resolve(&r.id, store) {
                Resolution::Found(asset) => format!("assets/{}", asset.path),
                Resolution::Dangling { id } => {
                    tracing::warn!(document = %self.id, asset = %id, "reference to missing asset");
                    String::new()
                }
            }
        })
    }

    fn payload_with<F>(&self, url_for: F) -> ApiPayload
    where
        F: Fn(&RefAsset) -> String,
    {
        let mut content = Vec::with_capacity(self.ref_assets.len() + 1);
        content.push(ContentPart::text(self.build_text()));
        content.extend(
            self.ref_assets
                .iter()
                .map(|r| ContentPart::media(r, url_for(r))),
        );

        ApiPayload {
            model: self.model.clone(),
            content,
            video_config: VideoConfig {
                resolution: self.resolution.clone(),
                duration: self.duration,
                ratio: self.ratio.clone(),
                fps: FPS,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_asset::Asset;
    use serde_json::json;

    #[test]
    fn test_payload_shape() {
        let mut doc = PromptDocument::new();
        doc.subject = "A".into();
        doc.camera = "C".into();
        doc.ref_assets.push(RefAsset {
            path: Some("assets/ab12cd34.png".into()),
            ..RefAsset::new("ab12cd34")
        });

        let value = doc.to_api_payload().to_json();
        assert_eq!(
            value,
            json!({
                "model": "doubao-seedance-2-0-260128",
                "content": [
                    {"type": "text", "text": "A，C"},
                    {
                        "type": "image_url",
                        "image_url": {"url": "assets/ab12cd34.png"},
                        "image_role": "reference_image"
                    }
                ],
                "video_config": {"resolution": "720p", "duration": 5, "ratio": "16:9", "fps": 24}
            })
        );
    }

    #[test]
    fn test_payload_ref_type_and_role() {
        let mut doc = PromptDocument::new();
        doc.ref_assets.push(RefAsset {
            ref_type: Some("video_url".into()),
            ..RefAsset::new("v1").with_role("reference_video")
        });
        doc.ref_assets.push(RefAsset::new("missing"));

        let payload = doc.to_api_payload();
        assert_eq!(payload.content.len(), 3);
        match &payload.content[1] {
            ContentPart::Media(part) => {
                assert_eq!(part.kind, "video_url");
                assert_eq!(part.role, "reference_video");
            }
            other => panic!("expected media part, got {:?}", other),
        }
        match &payload.content[2] {
            ContentPart::Media(part) => assert_eq!(part.image_url.url, ""),
            other => panic!("expected media part, got {:?}", other),
        }
    }

    #[test]
    fn test_payload_parses_back() {
        let mut doc = PromptDocument::new();
        doc.ref_assets.push(RefAsset::new("x"));
        let payload = doc.to_api_payload();
        let back: ApiPayload = serde_json::from_value(payload.to_json()).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_resolved_payload() {
        let dir = std::env::temp_dir().join(format!("reel_payload_test_{}", uuid::Uuid::new_v4()));
        let store = AssetStore::open(dir.join("asset_store.json")).unwrap();
        let mut asset = Asset::new("chair.png");
        asset.path = asset.storage_name();
        store.add(asset.clone()).unwrap();

        let mut doc = PromptDocument::new();
        doc.ref_assets.push(RefAsset::new(asset.id.clone()));
        doc.ref_assets.push(RefAsset::new("deleted1"));
        doc.ref_assets.push(RefAsset {
            path: Some("https://cdn.example.com/x.png".into()),
            ..RefAsset::new(asset.id.clone())
        });

        let payload = doc.to_api_payload_resolved(&store);
        let urls: Vec<_> = payload
            .content
            .iter()
            .filter_map(|p| match p {
                ContentPart::Media(m) => Some(m.image_url.url.clone()),
                ContentPart::Text(_) => None,
            })
            .collect();
        assert_eq!(
            urls,
            vec![
                format!("assets/{}", asset.path),
                String::new(),
                "https://cdn.example.com/x.png".to_string()
            ]
        );

        std::fs::remove_dir_all(&dir).ok();
    }
}
