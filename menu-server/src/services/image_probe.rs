//! Image reachability probe
//!
//! HEAD request per unique URL, bounded concurrency, per-request timeout.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use shared::error::{AppError, AppResult};
use shared::models::ImageProbeResult;

#[derive(Debug, Clone)]
pub struct ImageProbe {
    client: Client,
    concurrency: usize,
}

impl ImageProbe {
    pub fn new(timeout: Duration, concurrency: usize) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("menu-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            concurrency: concurrency.max(1),
        })
    }

    /// Probe every URL once; results come back sorted by URL
    pub async fn probe_all<I>(&self, urls: I) -> Vec<ImageProbeResult>
    where
        I: IntoIterator<Item = String>,
    {
        let mut unique: Vec<String> = urls.into_iter().collect();
        unique.sort();
        unique.dedup();

        let mut results: Vec<ImageProbeResult> = stream::iter(unique)
            .map(|url| self.probe(url))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        results.sort_by(|a, b| a.url.cmp(&b.url));
        results
    }

    pub async fn probe(&self, url: String) -> ImageProbeResult {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return ImageProbeResult {
                url,
                status: None,
                ok: false,
                error: Some("not an absolute http(s) URL".into()),
            };
        }

        match self.client.head(&url).send().await {
            Ok(resp) => {
                let status = resp.status();
                if !status.is_success() {
                    tracing::warn!(%url, status = status.as_u16(), "Image probe failed");
                }
                ImageProbeResult {
                    url,
                    status: Some(status.as_u16()),
                    ok: status.is_success(),
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "Image probe failed");
                ImageProbeResult {
                    url,
                    status: None,
                    ok: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
