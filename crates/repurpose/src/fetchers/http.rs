//! Shared HTTP plumbing for the built-in fetchers

use crate::error::FetchError;
use crate::fetchers::FetchOptions;
use crate::DEFAULT_USER_AGENT;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

/// Binary content type prefixes
const BINARY_PREFIXES: &[&str] = &[
    "image/",
    "audio/",
    "video/",
    "application/octet-stream",
    "application/pdf",
    "application/zip",
    "application/gzip",
    "application/x-tar",
    "application/x-rar",
    "application/x-7z",
    "application/vnd.ms-",
    "application/vnd.openxmlformats",
    "font/",
];

const ACCEPT_HTML: &str = "text/html, application/xhtml+xml, text/plain;q=0.9, */*;q=0.8";

/// Build a client carrying the configured User-Agent and timeouts
pub(crate) fn build_client(options: &FetchOptions) -> Result<reqwest::Client, FetchError> {
    let mut headers = HeaderMap::new();
    let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
    );
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

    reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(options.connect_timeout)
        .build()
        .map_err(FetchError::ClientBuildError)
}

/// GET `url` and return the body as text
///
/// Non-success statuses, binary content types and bodies that do not finish
/// before `options.timeout` are errors.
pub(crate) async fn get_text(url: Url, options: &FetchOptions) -> Result<String, FetchError> {
    let client = build_client(options)?;
    let deadline = tokio::time::Instant::now() + options.timeout;

    let response = tokio::time::timeout_at(deadline, client.get(url).send())
        .await
        .map_err(|_| FetchError::Timeout)?
        .map_err(FetchError::from_reqwest)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    if let Some(ct) = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
    {
        if is_binary_content_type(ct) {
            return Err(FetchError::BinaryContent(ct.to_string()));
        }
    }

    let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
    let body = read_body_with_timeout(response.bytes_stream(), remaining).await?;

    debug!(bytes = body.len(), "Body received");
    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Check if content type indicates binary content
pub(crate) fn is_binary_content_type(content_type: &str) -> bool {
    let ct_lower = content_type.to_lowercase();
    BINARY_PREFIXES
        .iter()
        .any(|prefix| ct_lower.starts_with(prefix))
}

/// Read a body stream until it ends or `timeout` elapses
///
/// Partial content is discarded: a deadline hit is [`FetchError::BodyTimeout`]
/// and a broken stream is [`FetchError::RequestError`].
async fn read_body_with_timeout<S, B, E>(stream: S, timeout: Duration) -> Result<Bytes, FetchError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    futures::pin_mut!(stream);
    let mut body = Vec::new();
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        let chunk_future = stream.next();
        let timeout_future = tokio::time::sleep_until(deadline);

        tokio::select! {
            chunk = chunk_future => {
                match chunk {
                    Some(Ok(bytes)) => {
                        body.extend_from_slice(bytes.as_ref());
                    }
                    Some(Err(e)) => {
                        error!("Error reading body chunk: {}", e);
                        return Err(FetchError::RequestError(e.to_string()));
                    }
                    None => {
                        // Stream complete
                        return Ok(Bytes::from(body));
                    }
                }
            }
            _ = timeout_future => {
                warn!("Body timeout reached, discarding partial content");
                return Err(FetchError::BodyTimeout);
            }
        }
    }
}
