//! Idempotent image download to disk.

use std::fs;
use std::path::Path;

use crate::fetch;

/// Downloads `media_url` to `dest`, returning true when the file is now
/// present and false when the attempt should be retried.
///
/// A file already on disk is trusted and skipped without any network
/// traffic, which is what makes interrupted runs safe to repeat. On
/// failure any partial file is removed so a later attempt starts clean;
/// no error escapes this function.
pub fn download(media_url: &str, dest: &Path) -> bool {
    if dest.exists() {
        tracing::debug!(path = %dest.display(), "already on disk, skipping");
        return true;
    }

    match fetch::fetch_to_file(media_url, dest) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(url = %media_url, "image download failed: {}", e);
            if dest.exists() {
                if let Err(rm) = fs::remove_file(dest) {
                    tracing::warn!(path = %dest.display(), "could not remove partial file: {}", rm);
                }
            }
            false
        }
    }
}
