//! Credential cache, render service and HTTP surface for termcal.
//!
//! - [`CredentialCache`] keeps user credentials in memory in front of a
//!   SQLite [`CredentialStore`]
//! - [`RenderService`] resolves a credential, fetches events with a timeout
//!   and renders the agenda text
//! - [`app`] exposes the service over HTTP
//!
//! # Example
//!
//! ```rust,no_run
//! use termcal_server::{ServerConfig, SignalHandler, serve};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::resolve(None)?;
//!     let signals = SignalHandler::new();
//!     signals.spawn_listener();
//!     serve(&config, signals.shutdown()).await?;
//!     Ok(())
//! }
//! ```

mod app;
mod cache;
mod config;
mod error;
mod handler;
mod http;
mod signals;
mod store;

pub use app::{
    build_service, build_service_with, import_credentials, open_cache, serve, serve_on,
};
pub use cache::{CachePolicy, CredentialCache};
pub use config::{DEFAULT_PORT, ServerConfig, default_database_path};
pub use error::{CredentialError, CredentialResult, ServerError, ServerResult, StoreError};
pub use handler::{DEFAULT_FETCH_TIMEOUT, RenderService};
pub use http::{RenderQuery, app};
pub use signals::{ShutdownSignal, SignalHandler};
pub use store::{CredentialStore, MemoryCredentialStore, SqliteCredentialStore, StoreResult};
