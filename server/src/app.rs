use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::services::image_fetch::{FetchError, ImageFetcher};

/// Application shared state accessible from axum handlers.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// Application configuration
    config: AppConfig,
    /// Pooled HTTP client for remote images
    fetcher: ImageFetcher,
    /// Cancelled when the process shuts down
    shutdown_token: CancellationToken,
}

impl SharedState {
    /// Create shared state, building the fetcher from the config.
    pub fn new(config: AppConfig) -> Result<Self, FetchError> {
        let fetcher = ImageFetcher::new(config.fetch_timeout(), config.max_image_bytes)?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    pub fn with_fetcher(config: AppConfig, fetcher: ImageFetcher) -> Self {
        Self {
            inner: Arc::new(SharedStateInner {
                config,
                fetcher,
                shutdown_token: CancellationToken::new(),
            }),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.inner.config.server_port
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn fetcher(&self) -> &ImageFetcher {
        &self.inner.fetcher
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }
}
