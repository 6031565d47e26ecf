//! Terminal commands that run against the same engine as the MCP tools.

pub mod context;
pub mod search;
pub mod stats;

/// Shorten `content` to at most `max` characters, appending "..." when cut.
pub(crate) fn truncate_preview(content: &str, max: usize) -> String {
    match content.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &content[..idx]),
        None => content.to_string(),
    }
}
