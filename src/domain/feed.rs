use serde::{Deserialize, Serialize};

use crate::domain::Strip;

/// Root-level channel tags recognised by the feed parser.
///
/// Anything outside this allow-list is ignored at channel level.
pub const CHANNEL_TAGS: &[&str] = &["title", "link", "description", "language"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelMetadata {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
}

impl ChannelMetadata {
    pub fn is_channel_tag(name: &str) -> bool {
        CHANNEL_TAGS.contains(&name)
    }

    /// Store a parsed root tag. Unknown names are dropped, duplicates
    /// overwrite (last occurrence wins).
    pub fn set(&mut self, name: &str, value: Option<String>) {
        match name {
            "title" => self.title = value,
            "link" => self.link = value,
            "description" => self.description = value,
            "language" => self.language = value,
            _ => {}
        }
    }
}

/// Canonical aggregation output: channel metadata plus strips sorted
/// ascending by publish date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComicFeed {
    pub channel: ChannelMetadata,
    pub strips: Vec<Strip>,
}
