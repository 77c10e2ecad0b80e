//! CLI command implementations

pub mod asset;
pub mod prompt;
pub mod template;

/// Split a comma-separated list, dropping empty entries
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
