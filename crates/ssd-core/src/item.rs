//! Screenshot items and per-item download outcomes.

use std::path::PathBuf;

/// File extension for saved screenshots.
pub const IMAGE_EXT: &str = "jpg";

/// One discovered screenshot: the numeric identifier is the primary key
/// within a profile, and the detail-page URL is derived from it at crawl
/// time. Items are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    /// Profile-scoped screenshot identifier.
    pub id: u64,
    /// Detail page that embeds the final media URL.
    pub detail_url: String,
}

impl Item {
    pub fn new(id: u64, detail_url: String) -> Self {
        Self { id, detail_url }
    }

    /// Local file name the image is saved under.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id, IMAGE_EXT)
    }
}

/// Outcome of one item's download pipeline, after its retry loop finished.
#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub id: u64,
    pub success: bool,
    pub path: PathBuf,
}
