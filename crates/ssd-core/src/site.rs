//! Endpoint set for the scraped site.
//!
//! All URLs the scraper touches derive from two bases: the community site
//! (listing and detail pages) and the image CDN. Bundling them here keeps
//! the rest of the engine free of hard-coded hosts and lets integration
//! tests point the whole pipeline at a local fixture server.

/// Base URLs for one scraping target.
#[derive(Debug, Clone)]
pub struct Site {
    /// Community site root, no trailing slash (listing and detail pages).
    pub community: String,
    /// Media CDN prefix, with trailing slash, that detail pages embed in
    /// front of the per-image path.
    pub media_cdn: String,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            community: "https://steamcommunity.com".to_string(),
            media_cdn: "https://steamuserimages-a.akamaihd.net/ugc/".to_string(),
        }
    }
}

impl Site {
    /// Screenshot listing URL for a profile name, forced into grid view so
    /// the markup carries the pagination markers the crawler expects.
    pub fn listing_url(&self, name: &str) -> String {
        ensure_grid_view(&format!("{}/id/{}/screenshots/", self.community, name))
    }

    /// The detail-page URL prefix; listing pages embed one full detail URL
    /// per screenshot, so this doubles as the item delimiter when parsing.
    pub fn detail_url_prefix(&self) -> String {
        format!("{}/sharedfiles/filedetails/?id=", self.community)
    }

    /// Detail-page URL for one screenshot identifier.
    pub fn detail_url(&self, id: u64) -> String {
        format!("{}{}", self.detail_url_prefix(), id)
    }
}

/// Appends `view=grid` unless the URL already requests it.
pub fn ensure_grid_view(url: &str) -> String {
    if url.to_ascii_lowercase().contains("view=grid") {
        return url.to_string();
    }
    if url.contains('?') {
        format!("{url}&view=grid")
    } else {
        format!("{url}?view=grid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_url_is_grid_view() {
        let site = Site::default();
        assert_eq!(
            site.listing_url("gabe"),
            "https://steamcommunity.com/id/gabe/screenshots/?view=grid"
        );
    }

    #[test]
    fn detail_url_appends_id() {
        let site = Site::default();
        assert_eq!(
            site.detail_url(101),
            "https://steamcommunity.com/sharedfiles/filedetails/?id=101"
        );
    }

    #[test]
    fn ensure_grid_view_query_forms() {
        assert_eq!(ensure_grid_view("https://x/a/"), "https://x/a/?view=grid");
        assert_eq!(
            ensure_grid_view("https://x/a/?p=2"),
            "https://x/a/?p=2&view=grid"
        );
        assert_eq!(
            ensure_grid_view("https://x/a/?view=grid"),
            "https://x/a/?view=grid"
        );
    }
}
