//! Marker-based field extraction from raw page text.
//!
//! Every scraping step locates fields by splitting on fixed substrings
//! rather than parsing markup. The helpers here are the single seam for
//! that positional logic: they have no awareness of nesting and rely on
//! the markers being unique and stable in the source text.

use crate::error::ScrapeError;

/// Returns the text between the first `start` marker and the first `end`
/// marker that follows it.
pub fn extract_between<'a>(text: &'a str, start: &str, end: &str) -> Result<&'a str, ScrapeError> {
    let after = extract_after(text, start)?;
    match after.split_once(end) {
        Some((field, _)) => Ok(field),
        None => Err(ScrapeError::MarkerNotFound(end.to_string())),
    }
}

/// Returns everything after the first occurrence of `marker`.
pub fn extract_after<'a>(text: &'a str, marker: &str) -> Result<&'a str, ScrapeError> {
    match text.split_once(marker) {
        Some((_, after)) => Ok(after),
        None => Err(ScrapeError::MarkerNotFound(marker.to_string())),
    }
}

/// Returns everything after the *last* occurrence of `marker`. Used for
/// pagination, where the final page link carries the highest page number.
pub fn extract_after_last<'a>(text: &'a str, marker: &str) -> Result<&'a str, ScrapeError> {
    match text.rsplit_once(marker) {
        Some((_, after)) => Ok(after),
        None => Err(ScrapeError::MarkerNotFound(marker.to_string())),
    }
}
