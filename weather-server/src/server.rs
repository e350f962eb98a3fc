use anyhow::Context;
use std::sync::Arc;
use weather_core::{Config, InMemoryStore, WeatherService, provider_from_config};

use crate::routes;

/// Build the service from `config` and serve it until Ctrl-C.
///
/// Fails before binding if no provider access key is available.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    let provider = provider_from_config(&config)?;
    let service = WeatherService::new(provider, Arc::new(InMemoryStore::new()));

    let addr = config.server.socket_addr();
    let api = routes::routes(service, config.server.allowed_origins.clone());

    let (bound, server) = warp::serve(api)
        .try_bind_with_graceful_shutdown(addr, shutdown_signal())
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(addr = %bound, origins = ?config.server.allowed_origins, "weather server listening");
    server.await;
    tracing::info!("weather server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
