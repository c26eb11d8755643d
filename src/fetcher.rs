//! HTTP adapter around the parser: fetch feed bytes, then hand them to
//! [`parse_feed`](crate::parse_feed).
//!
//! The transport layer never mixes with the parse layer: a transport
//! failure (or an empty body) returns before the parser is ever invoked,
//! and a tokenizer failure travels inside the returned [`FeedParse`], not
//! as a [`FetchError`]. Callers wanting a timeout impose it here — the
//! parser itself never blocks.

use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;

use crate::parser::{parse_feed, FeedParse};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while acquiring feed bytes.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code.
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the 30-second timeout.
    #[error("request timed out")]
    Timeout,
    /// Response body exceeded the 10MB size limit.
    #[error("response too large")]
    TooLarge,
    /// Transport succeeded but the body was empty — there is nothing to
    /// parse, so the parser is not consulted.
    #[error("response body was empty")]
    EmptyBody,
}

/// Fetches a feed URL and parses the response body.
///
/// # Arguments
///
/// * `client` - HTTP client (caller controls configuration)
/// * `url` - URL of the RSS/Atom document
///
/// # Returns
///
/// On transport success with a non-empty body, the parser's [`FeedParse`]
/// is forwarded intact — including the partial-feed-plus-error case for
/// malformed XML. Check [`FeedParse::error`] if you need all-or-nothing
/// semantics.
///
/// # Errors
///
/// Returns [`FetchError`] without invoking the parser when the request
/// fails, times out, returns a non-2xx status, exceeds the size limit, or
/// carries an empty body.
pub async fn fetch_feed(client: &reqwest::Client, url: &str) -> Result<FeedParse, FetchError> {
    let response = tokio::time::timeout(FETCH_TIMEOUT, client.get(url).send())
        .await
        .map_err(|_| FetchError::Timeout)?
        .map_err(FetchError::Network)?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;
    if bytes.is_empty() {
        return Err(FetchError::EmptyBody);
    }

    tracing::debug!(url, bytes = bytes.len(), "Fetched feed body");
    Ok(parse_feed(&bytes))
}

/// Reads the response body with a hard size limit using stream-based
/// reading, so an oversized body is rejected without buffering all of it.
async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::TooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::TooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
