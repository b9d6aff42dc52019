//! Sequential crawler for paginated screenshot listings.
//!
//! Pages are walked one at a time because the declared last page is only
//! discovered incrementally from each response. Transient fetch failures
//! retry the same page against a bounded budget; structural mismatches
//! abort the account instead, since retrying cannot fix a changed page
//! format.

use std::collections::HashSet;

use crate::account::Account;
use crate::error::ScrapeError;
use crate::fetch;
use crate::item::Item;
use crate::markers;
use crate::retry::{run_with_retry, RetryPolicy};
use crate::site::Site;

const TITLE_START: &str = "<title>Steam Community ::";
const TITLE_END: &str = " :: Screenshots</title>";
const CURRENT_PAGE_MARKER: &str = "pagingCurrentPage";
const PAGE_LINK_MARKER: &str = "\"pagingPageLink\"";
const IMAGE_WALL_MARKER: &str = "<div id=\"image_wall\">";

/// Result of one account crawl: the profile's display name (when at least
/// one page was parsed) and the discovered items in listing order, keyed
/// by identifier with duplicates across pages dropped.
#[derive(Debug)]
pub struct CrawlOutcome {
    pub display_name: Option<String>,
    pub items: Vec<Item>,
}

/// Fields parsed out of a single listing page.
#[derive(Debug)]
struct ListingPage {
    display_name: String,
    /// Server-reported page number; authoritative over the requested one.
    current_page: u32,
    /// Highest page number among the pagination links, or `current_page`
    /// when the listing has no pagination.
    last_page: u32,
    ids: Vec<u64>,
    /// An unparsable item token was seen; stop discovering further pages.
    truncated: bool,
}

/// Walks the account's listing pages and collects every screenshot item.
///
/// `on_page` fires once per parsed page with the display name and the
/// server-reported page number, for status reporting.
///
/// Exhausting the fetch retry budget ends the crawl early with whatever
/// was collected; only a corrupt listing is an error.
pub fn crawl<F>(
    site: &Site,
    account: &Account,
    policy: &RetryPolicy,
    mut on_page: F,
) -> Result<CrawlOutcome, ScrapeError>
where
    F: FnMut(&str, u32),
{
    let detail_prefix = site.detail_url_prefix();
    let mut current_page: u32 = 1;
    let mut seen: HashSet<u64> = HashSet::new();
    let mut items: Vec<Item> = Vec::new();
    let mut display_name: Option<String> = None;

    loop {
        let url = account.page_url(current_page);
        let text = match run_with_retry(policy, || fetch::fetch_text(&url)) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(
                    account = account.name(),
                    page = current_page,
                    "giving up on listing page: {}",
                    e
                );
                break;
            }
        };

        let page = parse_listing_page(&text, &detail_prefix)?;
        on_page(&page.display_name, page.current_page);
        if display_name.is_none() {
            display_name = Some(page.display_name);
        }

        current_page = page.current_page;
        for id in page.ids {
            if seen.insert(id) {
                items.push(Item::new(id, site.detail_url(id)));
            }
        }

        if page.truncated {
            break;
        }

        current_page += 1;
        if current_page - 1 >= page.last_page {
            break;
        }
    }

    tracing::info!(
        account = account.name(),
        count = items.len(),
        "listing crawl finished"
    );
    Ok(CrawlOutcome {
        display_name,
        items,
    })
}

fn parse_listing_page(text: &str, detail_prefix: &str) -> Result<ListingPage, ScrapeError> {
    let display_name = markers::extract_between(text, TITLE_START, TITLE_END)
        .map_err(|_| ScrapeError::CorruptListing("missing screenshots title".to_string()))?
        .trim()
        .to_string();

    let current_section = markers::extract_after(text, CURRENT_PAGE_MARKER)
        .map_err(|_| ScrapeError::CorruptListing("missing current-page field".to_string()))?;
    let current_page: u32 = markers::extract_between(current_section, ">", "<")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| ScrapeError::CorruptListing("unparsable current-page field".to_string()))?;

    // No pagination links means a single-page listing.
    let last_page = markers::extract_after_last(text, PAGE_LINK_MARKER)
        .ok()
        .and_then(|after| markers::extract_between(after, ">", "<").ok())
        .and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(current_page);

    let wall = markers::extract_after(text, IMAGE_WALL_MARKER)
        .map_err(|_| ScrapeError::CorruptListing("missing image wall".to_string()))?;

    let mut ids = Vec::new();
    let mut truncated = false;
    for token in wall.split(detail_prefix).skip(1).filter(|t| !t.is_empty()) {
        let raw = token.split('"').next().unwrap_or(token);
        match raw.parse::<u64>() {
            Ok(id) => ids.push(id),
            Err(e) => {
                tracing::error!("unparsable screenshot id {:?}: {}", raw, e);
                truncated = true;
            }
        }
    }

    Ok(ListingPage {
        display_name,
        current_page,
        last_page,
        ids,
        truncated,
    })
}
