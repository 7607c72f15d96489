//! Remote image download.

use std::time::Duration;

use reqwest::Client;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("{url} is larger than {limit} bytes")]
    TooLarge { url: String, limit: u64 },
}

/// Downloads image bytes with a per-request timeout and a body size cap.
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    http: Client,
    max_bytes: u64,
}

impl ImageFetcher {
    pub fn new(timeout: Duration, max_bytes: u64) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, max_bytes))
    }

    pub fn with_client(http: Client, max_bytes: u64) -> Self {
        Self { http, max_bytes }
    }

    /// GET `url` and return the body. Non-2xx responses are errors.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut resp = self.http.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if resp.content_length().is_some_and(|len| len > self.max_bytes) {
            return Err(self.too_large(url));
        }

        let mut body = Vec::new();
        while let Some(chunk) = resp.chunk().await? {
            if (body.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(self.too_large(url));
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(url, bytes = body.len(), "Fetched image");
        Ok(body)
    }

    /// Fetch two images concurrently. Both requests always run to completion.
    pub async fn fetch_pair(
        &self,
        first: &str,
        second: &str,
    ) -> (Result<Vec<u8>, FetchError>, Result<Vec<u8>, FetchError>) {
        tokio::join!(self.fetch(first), self.fetch(second))
    }

    fn too_large(&self, url: &str) -> FetchError {
        FetchError::TooLarge {
            url: url.to_string(),
            limit: self.max_bytes,
        }
    }
}
