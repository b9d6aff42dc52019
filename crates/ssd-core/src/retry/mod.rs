//! Retry and backoff policy.
//!
//! One primitive serves two very different call sites: the listing crawler
//! retries a page fetch a bounded number of times before giving up on the
//! account, while the per-image download pipeline retries forever with a
//! fixed delay. Both are expressed as a [`RetryPolicy`] and share the
//! [`run_with_retry`] loop.

mod classify;
mod policy;
mod run;

pub use classify::{classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;

/// Maps an error into a retry [`ErrorKind`].
///
/// Implemented by the fetch and scrape error types so the retry loop can
/// log and shape backoff without knowing the concrete error.
pub trait Classify {
    fn retry_kind(&self) -> ErrorKind;
}
