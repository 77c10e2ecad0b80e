//! Reel Core - Foundational types for the Reel workspace
//!
//! This crate provides the pieces every other Reel crate depends on:
//! - `ReelError` and the `Result` alias
//! - Short id generation and the epoch clock
//! - Atomic file writes
//! - Layered configuration (`ReelConfig`)

pub mod config;
mod error;
pub mod fs;
mod id;

pub use config::{PromptConfig, ReelConfig, StorageConfig, ThumbnailConfig};
pub use error::{ReelError, Result};
pub use id::{is_valid_id, now_epoch_secs, short_id, SHORT_ID_LEN};
