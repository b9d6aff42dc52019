//! Account modeling and listing-URL validation.

use crate::error::ScrapeError;
use crate::site::Site;

/// A source profile to crawl: the raw name token as supplied by the caller
/// and the normalized grid-view listing URL derived from it.
#[derive(Debug, Clone)]
pub struct Account {
    name: String,
    listing_url: String,
}

impl Account {
    /// Builds an account from a profile name token, rejecting it up front
    /// when the derived URL does not reference the site's screenshot
    /// listing (e.g. an empty token or one containing path separators).
    pub fn new(site: &Site, name: &str) -> Result<Self, ScrapeError> {
        let name = name.trim();
        let listing_url = site.listing_url(name);
        validate_listing_url(site, name, &listing_url)?;
        Ok(Self {
            name: name.to_string(),
            listing_url,
        })
    }

    /// Raw profile name token.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized listing URL (grid view).
    pub fn listing_url(&self) -> &str {
        &self.listing_url
    }

    /// Listing URL for one page of the paginated result set.
    pub fn page_url(&self, page: u32) -> String {
        format!("{}&p={}", self.listing_url, page)
    }
}

/// The listing URL must stay on the site's host and reference its
/// screenshots path; anything else means the name token was malformed.
fn validate_listing_url(site: &Site, name: &str, listing_url: &str) -> Result<(), ScrapeError> {
    if name.is_empty() || name.contains('/') || name.contains('?') || name.contains('#') {
        return Err(ScrapeError::InvalidAccount(listing_url.to_string()));
    }
    let parsed = url::Url::parse(listing_url)
        .map_err(|_| ScrapeError::InvalidAccount(listing_url.to_string()))?;
    let expected_host = url::Url::parse(&site.community)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string));
    let host_ok = match (parsed.host_str(), expected_host.as_deref()) {
        (Some(h), Some(e)) => h.eq_ignore_ascii_case(e),
        _ => false,
    };
    if !host_ok || !parsed.path().contains("/screenshots") {
        return Err(ScrapeError::InvalidAccount(listing_url.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_name_and_normalizes_url() {
        let site = Site::default();
        let account = Account::new(&site, " gabe ").unwrap();
        assert_eq!(account.name(), "gabe");
        assert_eq!(
            account.listing_url(),
            "https://steamcommunity.com/id/gabe/screenshots/?view=grid"
        );
    }

    #[test]
    fn page_url_appends_page_parameter() {
        let site = Site::default();
        let account = Account::new(&site, "gabe").unwrap();
        assert_eq!(
            account.page_url(3),
            "https://steamcommunity.com/id/gabe/screenshots/?view=grid&p=3"
        );
    }

    #[test]
    fn rejects_empty_and_path_like_names() {
        let site = Site::default();
        for bad in ["", "   ", "a/b", "name?x=1", "frag#ment"] {
            let err = Account::new(&site, bad).unwrap_err();
            assert!(matches!(err, ScrapeError::InvalidAccount(_)), "{bad:?}");
        }
    }

    #[test]
    fn validates_against_the_site_host() {
        let local = Site {
            community: "http://127.0.0.1:8080".to_string(),
            media_cdn: "http://127.0.0.1:8080/ugc/".to_string(),
        };
        let account = Account::new(&local, "tester").unwrap();
        assert!(account.listing_url().starts_with("http://127.0.0.1:8080/id/tester/"));
    }
}
