//! Persisted record type.

use serde::{Deserialize, Serialize};

/// Maximum stored content length, in characters.
pub const MAX_CONTENT_CHARS: usize = 100;

/// A row of the `texts` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TextRecord {
    /// Assigned by the store; `None` before insertion.
    pub id: Option<i64>,
    pub some_text: String,
}

impl TextRecord {
    /// A record not yet stored, with content already truncated.
    pub fn new(content: &str) -> Self {
        Self {
            id: None,
            some_text: truncate(content),
        }
    }
}

/// Keep the first [`MAX_CONTENT_CHARS`] characters.
pub fn truncate(content: &str) -> String {
    match content.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((cut, _)) => content[..cut].to_string(),
        None => content.to_string(),
    }
}
