//! Client registration backend - entry point.

use anyhow::Context;
use client_registry::api::{create_router, AppState};
use client_registry::config::Config;
use client_registry::notify::AdminNotifier;
use client_registry::store::PgClientStore;
use std::net::SocketAddr;
use std::sync::Arc;
use telegram_client::TelegramClient;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting client registration backend");

    let default_region = config.registration.region()?;
    let display_offset = config.registration.display_offset()?;

    anyhow::ensure!(
        config.bot.webhook_path.starts_with('/'),
        "bot.webhook_path must start with '/'"
    );

    // Initialize storage
    let store = PgClientStore::connect(&config.database)
        .await
        .context("Failed to connect to the database")?;
    store
        .init_schema()
        .await
        .context("Failed to initialize the database schema")?;

    // Initialize the bot
    let bot = TelegramClient::new(&config.bot.token, &config.bot.api_url, config.bot.timeout)
        .context("Failed to create Telegram client")?;

    if bot.health_check().await {
        info!("Telegram Bot API reachable");
    } else {
        warn!("Telegram Bot API health check failed - notifications may not be delivered");
    }

    let webhook_url = format!("{}{}", config.bot.webhook_url, config.bot.webhook_path);
    if let Err(e) = bot.set_webhook(&webhook_url).await {
        warn!(error = %e, "Failed to register the bot webhook");
    }

    // Create application state
    let notifier = AdminNotifier::new(bot.clone(), config.bot.admin_chat_id, display_offset);
    let state = AppState::new(Arc::new(store), Arc::new(notifier), default_region);

    let app = create_router(
        state,
        &config.bot.webhook_path,
        config.cors.frontend_origin.as_deref(),
    );

    // Bind to address
    let addr = SocketAddr::new(
        config
            .server
            .listen_addr
            .parse()
            .unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }

    // Remove the webhook registered at startup
    if let Err(e) = bot.delete_webhook().await {
        warn!(error = %e, "Failed to remove the bot webhook");
    }

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
