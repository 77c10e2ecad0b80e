//! Reel Asset - media asset store and thumbnail pipeline
//!
//! Uploaded files are classified by extension, stored under a short id,
//! given a 256x256 JPEG preview, and recorded in a JSON index that other
//! records reference by id.

mod catalog;
pub mod glyph;
mod library;
mod resolver;
mod store;
pub mod thumbnail;
mod types;

pub use catalog::{AssetQuery, AssetStore};
pub use library::{AssetLibrary, ImportOptions};
pub use resolver::{resolve, resolve_all, Resolution};
pub use store::ContentStore;
pub use thumbnail::{FfmpegExtractor, FrameExtractor, Thumbnail, ThumbnailGenerator, ThumbnailSource};
pub use types::{classify, extension_of, is_supported, Asset, AssetType};
