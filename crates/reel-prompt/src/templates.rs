//! Preset prompt templates
//!
//! Templates ship inside the binary as TOML and seed new documents with
//! a complete five-element prompt and matching video parameters.

use crate::document::PromptDocument;
use crate::params::TaskType;
use reel_core::{ReelError, Result};
use serde::{Deserialize, Serialize};

const BUILTIN_TEMPLATES: &str = include_str!("templates.toml");

/// A preset prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
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
    pub resolution: String,
    pub duration: i64,
    pub ratio: String,
}

/// TOML file wrapper
#[derive(Debug, Deserialize)]
struct TemplateFile {
    template: Vec<Template>,
}

/// All built-in templates in presentation order
pub fn templates() -> Result<Vec<Template>> {
    let file: TemplateFile = toml::from_str(BUILTIN_TEMPLATES).map_err(|e| {
        ReelError::TomlParseError(format!("Failed to parse built-in templates: {}", e))
    })?;
    Ok(file.template)
}

/// Look up a built-in template by id
pub fn template(id: &str) -> Result<Option<Template>> {
    Ok(templates()?.into_iter().find(|t| t.id == id))
}

impl PromptDocument {
    /// Start a new unnamed document from a template
    pub fn from_template(template: &Template) -> Self {
        Self {
            subject: template.subject.clone(),
            scene: template.scene.clone(),
            action: template.action.clone(),
            camera: template.camera.clone(),
            atmosphere: template.atmosphere.clone(),
            task_type: template.task_type.clone(),
            resolution: template.resolution.clone(),
            duration: template.duration,
            ratio: template.ratio.clone(),
            ..Self::new()
        }
    }
}
