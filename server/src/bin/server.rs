//! Watermark server binary.
//!
//! Starts the axum web server and waits for Ctrl+C.

use tracing_subscriber::EnvFilter;

use watermark_server_lib::app::SharedState;
use watermark_server_lib::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting watermark server");

    let config = watermark_server_lib::init_config();
    let state = SharedState::new(config)?;

    let server_state = state.clone();
    let mut server_handle = tokio::spawn(async move {
        let result = server::start_server(server_state).await;
        if let Err(e) = &result {
            tracing::error!("Server failed: {e:#}");
        }
        result
    });

    tracing::info!(
        port = state.server_port(),
        "Watermark server running. Press Ctrl+C to stop."
    );

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Shutting down...");
            state.shutdown_token().cancel();
        }
        result = &mut server_handle => {
            return result?;
        }
    }

    server_handle.await?
}
