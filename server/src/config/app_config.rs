//! Runtime application configuration loaded from the environment.

use std::str::FromStr;
use std::time::Duration;

use super::validation::validate_setting;

const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;
const DEFAULT_MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;
const DEFAULT_MAX_CANVAS_PIXELS: u64 = 100_000_000;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub fetch_timeout_secs: u64,
    pub max_image_bytes: u64,
    pub max_canvas_pixels: u64,
    pub jpeg_quality: u8,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: DEFAULT_SERVER_HOST.into(),
            server_port: DEFAULT_SERVER_PORT,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_canvas_pixels: DEFAULT_MAX_CANVAS_PIXELS,
            jpeg_quality: watermark_engine::DEFAULT_JPEG_QUALITY,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`. Missing, empty or invalid values
    /// fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| -> Option<String> {
            let value = lookup(key)?;
            let value = value.trim();
            if value.is_empty() {
                return None;
            }
            match validate_setting(key, value) {
                Ok(()) => Some(value.to_string()),
                Err(e) => {
                    tracing::warn!("Ignoring invalid setting {key}={value:?}: {e}");
                    None
                }
            }
        };

        Self {
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or(get("SERVER_PORT"), defaults.server_port),
            fetch_timeout_secs: parse_or(get("FETCH_TIMEOUT_SECS"), defaults.fetch_timeout_secs),
            max_image_bytes: parse_or(get("MAX_IMAGE_BYTES"), defaults.max_image_bytes),
            max_canvas_pixels: parse_or(get("MAX_CANVAS_PIXELS"), defaults.max_canvas_pixels),
            jpeg_quality: parse_or(get("JPEG_QUALITY"), defaults.jpeg_quality),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}
