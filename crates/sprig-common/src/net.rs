//! Blocking HTTP fetch for pulling pages into the parser.
//!
//! The parsing core only ever sees a markup string; this helper is the glue
//! that produces one from a URL. Kept deliberately small: one GET, a browser
//! User-Agent, a timeout.

use std::time::Duration;

/// User-Agent header sent with all requests.
///
/// Mimics a common desktop browser to avoid basic bot detection.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Failure modes of a page fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed or the request itself failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),
}

/// Fetch a URL and return its body as text.
///
/// # Errors
///
/// Returns [`FetchError`] if the client cannot be created, the request fails,
/// the response has a non-success status, or the body cannot be decoded.
pub fn fetch_text(url: &str) -> Result<String, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .build()?;

    let response = client.get(url).header("User-Agent", USER_AGENT).send()?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    Ok(response.text()?)
}
