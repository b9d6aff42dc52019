//! Scrape error taxonomy shared by the crawler, resolver and orchestrator.

use thiserror::Error;

use crate::fetch::FetchError;

/// Errors produced while scraping listing and detail pages.
///
/// Fetch failures are transient and subject to retry; the structural
/// variants mean the page text no longer matches the expected markers and
/// retrying the same request cannot help.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A fixed marker substring was absent from the page text.
    #[error("marker `{0}` not found in page text")]
    MarkerNotFound(String),

    /// Detail page fetched fine but the embedded media URL is missing.
    #[error("detail page has no embedded media URL")]
    MalformedPage,

    /// Listing page structure does not match the expected format.
    #[error("listing page format mismatch: {0}")]
    CorruptListing(String),

    /// The account token does not produce a valid screenshot listing URL.
    #[error("invalid account listing URL: {0}")]
    InvalidAccount(String),

    /// Transport or HTTP-status failure from the underlying GET.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// A download attempt did not leave a valid file on disk.
    #[error("image download attempt failed")]
    DownloadFailed,
}
