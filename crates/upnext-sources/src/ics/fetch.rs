//! HTTP retrieval of ICS documents.

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::{SourceError, SourceResult};

/// Downloads ICS documents from published feed URLs.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    http_client: reqwest::Client,
}

impl FeedFetcher {
    /// Creates a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> SourceResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("upnext/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { http_client })
    }

    /// Fetches the document at `url` as text.
    pub async fn fetch(&self, url: &Url) -> SourceResult<String> {
        let response = self.http_client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(SourceError::invalid_response(format!(
                "feed returned {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::network(format!("failed to read feed body: {e}")))?;

        debug!(url = %url, bytes = body.len(), "fetched feed");
        Ok(body)
    }
}
