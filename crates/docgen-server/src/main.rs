//! docgen HTTP server.
//!
//! Stores projects and uploaded DOCX/PPTX templates on the local filesystem
//! and fills `{{placeholder}}` tokens in templates with project data.

use std::sync::Arc;

use clap::Parser;
use docgen_server::{router, AppState, Config};
use docgen_store_local::JsonFileStore;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    info!("Starting docgen-server v{}", env!("CARGO_PKG_VERSION"));
    info!("  Host: {}", config.host);
    info!("  Port: {}", config.port);
    info!("  Data dir: {}", config.data_dir.display());
    info!("  Max upload: {} bytes", config.max_upload_bytes);

    let dictionary = config.load_dictionary()?;
    match &config.placeholder_dictionary {
        Some(path) => info!(
            "  Placeholders: {} keys from {}",
            dictionary.len(),
            path.display()
        ),
        None => info!(
            "  Placeholders: {} built-in keys ({:?})",
            dictionary.len(),
            config.locale
        ),
    }

    let store = Arc::new(JsonFileStore::open(&config.data_dir).await?);
    let state = AppState::new(store, dictionary);
    let app = router(state, config.max_upload_bytes);

    // Bind and serve
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, initiating shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
        info!("Received SIGTERM, initiating shutdown");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
