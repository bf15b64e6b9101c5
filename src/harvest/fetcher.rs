//! HTTP fetcher for catalog and detail pages
//!
//! The catalog base page is a plain GET; deeper catalog pages are requested
//! by POSTing the page token as a form field, which is how the source site
//! paginates. Transient failures (non-2xx status, network errors) are
//! retried a fixed number of times with a configurable delay, then surfaced
//! as an error so the controller can skip the page or item and keep going.

use crate::HarvestError;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

/// Attempts per fetch before giving up
const MAX_ATTEMPTS: u32 = 3;

/// Builds the HTTP client used for every request in a run
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("cuvee/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one catalog page
///
/// Page token 0 is the base listing (GET); any other token is requested via
/// POST with a `page` form field.
pub async fn fetch_catalog_page(
    client: &Client,
    hostname: &str,
    page: u32,
    retry_delay: Duration,
) -> crate::Result<String> {
    let request = || {
        if page == 0 {
            client.get(hostname)
        } else {
            client.post(hostname).form(&[("page", page.to_string())])
        }
    };

    fetch_with_retry(hostname, request, retry_delay).await
}

/// Fetches one item detail page
pub async fn fetch_detail_page(
    client: &Client,
    url: &str,
    retry_delay: Duration,
) -> crate::Result<String> {
    fetch_with_retry(url, || client.get(url), retry_delay).await
}

async fn fetch_with_retry<F>(
    url: &str,
    request: F,
    retry_delay: Duration,
) -> crate::Result<String>
where
    F: Fn() -> RequestBuilder,
{
    let mut last_error = String::new();

    for attempt in 1..=MAX_ATTEMPTS {
        match request().send().await {
            Ok(response) => match response.error_for_status() {
                Ok(response) => match response.text().await {
                    Ok(body) => return Ok(body),
                    Err(e) => last_error = format!("body read failed: {}", e),
                },
                Err(e) => last_error = format!("status error: {}", e),
            },
            Err(e) => last_error = format!("request failed: {}", e),
        }

        if attempt < MAX_ATTEMPTS {
            tracing::warn!(
                "Fetch attempt {}/{} for {} failed ({}), retrying",
                attempt,
                MAX_ATTEMPTS,
                url,
                last_error
            );
            tokio::time::sleep(retry_delay).await;
        }
    }

    Err(HarvestError::FetchExhausted {
        url: url.to_string(),
        attempts: MAX_ATTEMPTS,
        reason: last_error,
    })
}
