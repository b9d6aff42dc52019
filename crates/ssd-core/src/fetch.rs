//! HTTP GET helpers built on the curl crate.
//!
//! Two flavors: whole-page text fetches for the scraper and a streaming
//! fetch that writes the body straight to disk for image downloads. Both
//! are blocking; async callers run them inside `spawn_blocking`.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const PAGE_TIMEOUT: Duration = Duration::from_secs(60);
// Images can be large; abort on stalled transfers instead of wall clock.
const LOW_SPEED_LIMIT: u32 = 1024;
const LOW_SPEED_TIME: Duration = Duration::from_secs(60);
const MEDIA_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_REDIRECTS: u32 = 10;
const USER_AGENT: &str = concat!("ssd/", env!("CARGO_PKG_VERSION"));

/// Error from a single GET (curl failure, HTTP status, or disk write).
/// Kept structured so the retry policy can classify before callers convert
/// to anyhow.
#[derive(Debug)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// Disk write failed while streaming the body. Not a network fault.
    Storage(std::io::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Curl(e) => write!(f, "{}", e),
            FetchError::Http(code) => write!(f, "HTTP {}", code),
            FetchError::Storage(e) => write!(f, "storage: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Curl(e) => Some(e),
            FetchError::Storage(e) => Some(e),
            FetchError::Http(_) => None,
        }
    }
}

fn new_easy(url: &str, timeout: Duration) -> Result<curl::easy::Easy, FetchError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(FetchError::Curl)?;
    easy.follow_location(true).map_err(FetchError::Curl)?;
    easy.max_redirections(MAX_REDIRECTS).map_err(FetchError::Curl)?;
    easy.useragent(USER_AGENT).map_err(FetchError::Curl)?;
    easy.connect_timeout(CONNECT_TIMEOUT).map_err(FetchError::Curl)?;
    easy.timeout(timeout).map_err(FetchError::Curl)?;
    Ok(easy)
}

/// Fetches a page as text. Non-2xx statuses are errors; the body is
/// decoded lossily since scrape markers are all ASCII.
pub fn fetch_text(url: &str) -> Result<String, FetchError> {
    let mut easy = new_easy(url, PAGE_TIMEOUT)?;
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                buf.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(FetchError::Curl)?;
        transfer.perform().map_err(FetchError::Curl)?;
    }

    let code = easy.response_code().map_err(FetchError::Curl)?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Streams a GET body to `dest`, creating (or truncating) the file.
///
/// On any failure the partial file is left in place; callers that need
/// delete-on-failure semantics handle removal themselves.
pub fn fetch_to_file(url: &str, dest: &Path) -> Result<(), FetchError> {
    let mut easy = new_easy(url, MEDIA_TIMEOUT)?;
    easy.low_speed_limit(LOW_SPEED_LIMIT).map_err(FetchError::Curl)?;
    easy.low_speed_time(LOW_SPEED_TIME).map_err(FetchError::Curl)?;

    let mut file = File::create(dest).map_err(FetchError::Storage)?;
    let write_error: Arc<Mutex<Option<std::io::Error>>> = Arc::new(Mutex::new(None));
    let write_error_cb = Arc::clone(&write_error);
    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(move |data| {
                match file.write_all(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        let _ = write_error_cb.lock().unwrap().replace(e);
                        Ok(0) // abort transfer
                    }
                }
            })
            .map_err(FetchError::Curl)?;
        if let Err(e) = transfer.perform() {
            if e.is_write_error() {
                if let Some(io_err) = write_error.lock().unwrap().take() {
                    return Err(FetchError::Storage(io_err));
                }
            }
            return Err(FetchError::Curl(e));
        }
    }

    let code = easy.response_code().map_err(FetchError::Curl)?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    Ok(())
}
