//! Wiring from [`ServerConfig`] to a running service.

use std::path::Path;
use std::sync::Arc;

use termcal_core::CredentialRecord;
use termcal_providers::EventSource;
use termcal_providers::google::{GoogleEventSource, TokenRefresher};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cache::{CachePolicy, CredentialCache};
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::RenderService;
use crate::http::app;
use crate::signals::ShutdownSignal;
use crate::store::SqliteCredentialStore;

/// Opens the SQLite store named by the config and puts a cache in front.
pub async fn open_cache(config: &ServerConfig) -> ServerResult<Arc<CredentialCache>> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let store = SqliteCredentialStore::open(&config.database_path).await?;
    let policy = CachePolicy::default().with_populate_on_read(config.populate_cache_on_read);
    Ok(Arc::new(CredentialCache::with_policy(Arc::new(store), policy)))
}

/// Builds a render service backed by Google Calendar.
pub fn build_service(
    config: &ServerConfig,
    cache: Arc<CredentialCache>,
) -> ServerResult<RenderService> {
    let source = GoogleEventSource::new(config.fetch_timeout())
        .map_err(|e| ServerError::config(format!("failed to build calendar client: {}", e)))?;
    build_service_with(config, cache, Arc::new(source))
}

/// Builds a render service over an arbitrary event source.
pub fn build_service_with(
    config: &ServerConfig,
    cache: Arc<CredentialCache>,
    source: Arc<dyn EventSource>,
) -> ServerResult<RenderService> {
    let mut service = RenderService::new(cache, source)
        .with_fetch_timeout(config.fetch_timeout())
        .with_calendar_id(&config.calendar_id);

    match config.oauth_credentials() {
        Some(credentials) => {
            let refresher = TokenRefresher::new(credentials, config.fetch_timeout())
                .map_err(|e| ServerError::config(format!("failed to build token client: {}", e)))?;
            service = service.with_refresher(refresher);
        }
        None => warn!("no Google client credentials configured, expired tokens will not be refreshed"),
    }
    Ok(service)
}

/// Binds the configured address and serves until `shutdown` fires.
pub async fn serve(config: &ServerConfig, shutdown: ShutdownSignal) -> ServerResult<()> {
    let cache = open_cache(config).await?;
    let service = build_service(config, cache)?;
    let listener = TcpListener::bind(config.listen_addr).await?;
    serve_on(listener, Arc::new(service), shutdown).await
}

/// Serves on an already bound listener.
pub async fn serve_on(
    listener: TcpListener,
    service: Arc<RenderService>,
    shutdown: ShutdownSignal,
) -> ServerResult<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "termcal listening");
    axum::serve(listener, app(service))
        .with_graceful_shutdown(shutdown.wait())
        .await?;
    info!("server stopped");
    Ok(())
}

/// Reads a [`CredentialRecord`] JSON document and stores it.
pub async fn import_credentials(
    cache: &CredentialCache,
    path: impl AsRef<Path>,
) -> ServerResult<CredentialRecord> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await?;
    let record: CredentialRecord = serde_json::from_str(&content).map_err(|e| {
        ServerError::config(format!("invalid credential file {}: {}", path.display(), e))
    })?;
    if record.id.trim().is_empty() {
        return Err(ServerError::config(format!(
            "credential file {} has an empty id",
            path.display()
        )));
    }
    cache.put(record.clone()).await?;
    Ok(record)
}
