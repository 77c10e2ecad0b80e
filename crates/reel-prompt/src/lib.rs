//! Reel Prompt - structured video prompts
//!
//! Authors describe a shot through five elements, pick generation
//! parameters and reference library assets. Documents are saved one file
//! per project and exported as generation API requests.

mod document;
pub mod params;
mod payload;
mod project;
mod templates;

pub use document::{
    PromptDocument, PromptElement, RefAsset, DEFAULT_REF_ROLE, ELEMENTS, ELEMENT_SEPARATOR,
};
pub use params::TaskType;
pub use payload::{ApiPayload, ContentPart, MediaPart, MediaUrl, TextPart, VideoConfig};
pub use project::{ProjectStore, ProjectSummary};
pub use templates::{template, templates, Template};
