//! Classify HTTP status and curl errors into retry policy error kinds.

use crate::error::ScrapeError;
use crate::fetch::FetchError;
use crate::retry::policy::ErrorKind;
use crate::retry::Classify;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

impl Classify for FetchError {
    fn retry_kind(&self) -> ErrorKind {
        match self {
            FetchError::Curl(e) => classify_curl_error(e),
            FetchError::Http(code) => classify_http_status(*code),
            FetchError::Storage(_) => ErrorKind::Other,
        }
    }
}

impl Classify for ScrapeError {
    fn retry_kind(&self) -> ErrorKind {
        match self {
            ScrapeError::Fetch(e) => e.retry_kind(),
            // Structural mismatches are not transport faults; bounded
            // policies stop on them quickly, unbounded ones keep trying.
            _ => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_429_and_503_throttled() {
        assert_eq!(classify_http_status(429), ErrorKind::Throttled);
        assert_eq!(classify_http_status(503), ErrorKind::Throttled);
    }

    #[test]
    fn http_5xx_retryable() {
        assert!(matches!(classify_http_status(500), ErrorKind::Http5xx(500)));
        assert!(matches!(classify_http_status(502), ErrorKind::Http5xx(502)));
    }

    #[test]
    fn http_4xx_other() {
        assert_eq!(classify_http_status(404), ErrorKind::Other);
        assert_eq!(classify_http_status(403), ErrorKind::Other);
    }

    #[test]
    fn fetch_error_kinds() {
        assert_eq!(FetchError::Http(503).retry_kind(), ErrorKind::Throttled);
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        assert_eq!(FetchError::Storage(io).retry_kind(), ErrorKind::Other);
    }

    #[test]
    fn scrape_error_kinds() {
        assert_eq!(
            ScrapeError::Fetch(FetchError::Http(500)).retry_kind(),
            ErrorKind::Http5xx(500)
        );
        assert_eq!(ScrapeError::MalformedPage.retry_kind(), ErrorKind::Other);
    }
}
