//! users-gateway server entry point.
//!
//! Starts the Axum HTTP server with the REST endpoints and the
//! registration event stream.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use users_gateway::api;
use users_gateway::app_state::AppState;
use users_gateway::auth::{PublicAllowlist, TokenService};
use users_gateway::config::{AppConfig, LogFormat};
use users_gateway::domain::EventHub;
use users_gateway::persistence::{InMemoryUserStore, PostgresUserStore, UserStore};
use users_gateway::service::{AlbumsClient, PasswordHasher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env().context("loading configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, ?config, "starting users-gateway");

    // Signing key: refuse to start without a usable one
    let ttl = chrono::Duration::from_std(config.token_ttl).context("TOKEN_TTL_SECS out of range")?;
    let tokens = TokenService::new(&config.token_secret)
        .and_then(|tokens| tokens.with_ttl(ttl))
        .context("configuring token signing")?;

    // Build persistence layer
    let store: Arc<dyn UserStore> = if config.persistence_enabled {
        Arc::new(
            PostgresUserStore::connect(&config)
                .await
                .context("connecting to postgres")?,
        )
    } else {
        tracing::info!("persistence disabled, using in-memory user store");
        Arc::new(InMemoryUserStore::new())
    };

    // Optional album enrichment
    let albums = match &config.albums_base_url {
        Some(base_url) => Some(
            AlbumsClient::new(base_url.clone(), config.albums_timeout)
                .context("building albums client")?,
        ),
        None => {
            tracing::info!("ALBUMS_BASE_URL not set, album enrichment disabled");
            None
        }
    };

    let allowlist = PublicAllowlist::standard();
    #[cfg(feature = "swagger-ui")]
    let allowlist = api::openapi::allow_docs(allowlist);

    // Build application state
    let app_state = AppState::new(
        store,
        Arc::new(tokens),
        PasswordHasher::new(config.hash_workers),
        EventHub::new(config.event_hub_capacity),
        albums,
        allowlist,
    );

    // Build router
    let app = api::build_app(app_state, config.request_timeout);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
