//! Resolves a screenshot item to its final CDN media URL.
//!
//! The detail page embeds the real image location inside its media
//! container markup; one secondary GET plus marker extraction turns the
//! opaque identifier into a downloadable URL. Retry is the caller's
//! responsibility.

use crate::error::ScrapeError;
use crate::fetch;
use crate::item::Item;
use crate::markers;
use crate::site::Site;

/// Marker opening the media container on a detail page.
const MEDIA_SECTION_MARKER: &str = "actualmediactn";

/// Fetches the item's detail page and extracts the media URL.
pub fn resolve(site: &Site, item: &Item) -> Result<String, ScrapeError> {
    let page = fetch::fetch_text(&item.detail_url)?;
    let url = extract_media_url(site, &page)?;
    tracing::debug!(id = item.id, url = %url, "resolved media URL");
    Ok(url)
}

fn extract_media_url(site: &Site, page: &str) -> Result<String, ScrapeError> {
    let section =
        markers::extract_after(page, MEDIA_SECTION_MARKER).map_err(|_| ScrapeError::MalformedPage)?;
    let path = markers::extract_between(section, &site.media_cdn, "\"")
        .map_err(|_| ScrapeError::MalformedPage)?;
    Ok(format!("{}{}", site.media_cdn, path))
}
