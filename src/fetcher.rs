// src/fetcher.rs

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::time::{Duration, Instant};

use crate::errors::{Result, SolveError};

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Safari/537.36";

/// Retrieves the raw text of a quiz page.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    timeout: Duration,
}

impl PageFetcher {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// GETs `url` and returns its body as text whatever the status code.
    /// Only transport failures (DNS, connect, TLS, timeout) or an undecodable body are errors.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        log::info!("📡 Fetching page: {}", url);
        let start = Instant::now();

        let fetch_err = |source| SolveError::Fetch {
            url: url.to_string(),
            source,
        };

        let resp = self
            .client
            .get(url)
            .headers(browser_headers())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(fetch_err)?;

        let status = resp.status();
        let body = resp.text().await.map_err(fetch_err)?;

        log::info!(
            "📥 Page fetched with status {} ({} bytes, {}ms)",
            status,
            body.len(),
            start.elapsed().as_millis()
        );
        log::debug!(
            "Page text (first 1000 chars):\n{}",
            body.chars().take(1000).collect::<String>()
        );

        Ok(body)
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers
}
