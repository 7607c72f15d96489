pub mod app;
pub mod config;
pub mod server;
pub mod services;

use config::AppConfig;

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load `.env`, then build the runtime config from the environment.
pub fn init_config() -> AppConfig {
    load_dotenv();

    let config = AppConfig::from_env();
    tracing::info!(
        addr = %config.bind_addr(),
        fetch_timeout_secs = config.fetch_timeout_secs,
        max_image_bytes = config.max_image_bytes,
        max_canvas_pixels = config.max_canvas_pixels,
        jpeg_quality = config.jpeg_quality,
        "Settings loaded"
    );
    config
}
