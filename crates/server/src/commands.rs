//! Entry points behind the CLI subcommands

use crate::{Settings, app};
use anyhow::{Context, Result};
use bankfront_core::{
    Clock, ExpirationWatcher, FileSessionStore, SessionStore, SystemClock,
    watcher::LoggingNotifier,
};
use bankfront_http::{client::PortalClient, types::LoginRequest};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Run the HTTP server until Ctrl+C
pub async fn serve(settings: Settings) -> Result<()> {
    let state = app::build_state(&settings)?;
    let router = app::build_app(&settings, state);

    let listener = tokio::net::TcpListener::bind(settings.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.server.bind_addr))?;
    info!(addr = %listener.local_addr()?, "Bankfront listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Log in through a running portal and persist the session to a file
pub async fn login(base_url: &str, email: &str, password: &str, session: &Path) -> Result<()> {
    let client = PortalClient::builder()
        .base_url(base_url)
        .session_store(Arc::new(FileSessionStore::new(session)))
        .build()?;

    let session = client.login(&LoginRequest::new(email, password)).await?;
    println!("Logged in; session expires at {}", session.expiry_iso());
    Ok(())
}

/// Remove a persisted session
pub fn logout(session: &Path) -> Result<()> {
    FileSessionStore::new(session).clear()?;
    println!("Session cleared");
    Ok(())
}

/// Watch a persisted session and expire it ahead of time, until Ctrl+C
pub async fn watch_session(settings: &Settings, session: &Path) -> Result<()> {
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(session));

    if let Some(current) = store.load()?
        && current.is_expired(SystemClock.now())
    {
        info!(expires_at = %current.expiry_iso(), "Session already expired");
    }

    let watcher = ExpirationWatcher::new(store, Arc::new(LoggingNotifier))
        .with_login_path(settings.guard.login_path.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = watcher.spawn(shutdown_rx);

    shutdown_signal().await;
    let _ = shutdown_tx.send(true);
    handle.await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Received shutdown signal");
}
