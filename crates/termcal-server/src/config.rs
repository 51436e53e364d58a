//! Server configuration.
//!
//! Settings come from an optional `config.toml`, then environment overrides
//! (`PORT`, `GOOGLE_KEY`, `GOOGLE_SECRET`, `TERMCAL_DATABASE`).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use termcal_providers::DEFAULT_CALENDAR_ID;
use termcal_providers::google::OAuthCredentials;

use crate::error::{ServerError, ServerResult};

pub const DEFAULT_PORT: u16 = 8000;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,

    /// SQLite database holding credential records.
    pub database_path: PathBuf,

    /// Deadline for credential lookup, refresh and fetch of one request, in seconds.
    pub fetch_timeout_secs: u64,

    /// Calendar queried for every user.
    pub calendar_id: String,

    /// OAuth client id. Token refresh is enabled when both halves are set.
    pub google_client_id: Option<String>,

    pub google_client_secret: Option<String>,

    /// Keep records read from the database in memory.
    pub populate_cache_on_read: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            database_path: default_database_path(),
            fetch_timeout_secs: 15,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            google_client_id: None,
            google_client_secret: None,
            populate_cache_on_read: false,
        }
    }
}

impl ServerConfig {
    /// Parses a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ServerError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| ServerError::config(format!("{}: {}", path.display(), e)))?
            .validate()
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    pub fn load_if_exists(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads `path` when given, otherwise [`default_path`](Self::default_path)
    /// if that file exists, then applies the process environment.
    pub fn resolve(path: Option<&Path>) -> ServerResult<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::load_if_exists(Self::default_path())?,
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies environment-style overrides read through `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> ServerResult<Self> {
        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|_| ServerError::config(format!("invalid PORT '{}'", port)))?;
            self.listen_addr.set_port(port);
        }
        if let Some(id) = lookup("GOOGLE_KEY") {
            self.google_client_id = Some(id);
        }
        if let Some(secret) = lookup("GOOGLE_SECRET") {
            self.google_client_secret = Some(secret);
        }
        if let Some(path) = lookup("TERMCAL_DATABASE") {
            self.database_path = PathBuf::from(path);
        }
        self.validate()
    }

    /// Rejects settings the server cannot run with.
    pub fn validate(self) -> ServerResult<Self> {
        if self.fetch_timeout_secs == 0 {
            return Err(ServerError::config("fetch_timeout_secs must be greater than 0"));
        }
        if self.calendar_id.trim().is_empty() {
            return Err(ServerError::config("calendar_id must not be empty"));
        }
        Ok(self)
    }

    #[must_use]
    pub fn with_listen_addr(mut self, addr: SocketAddr) -> Self {
        self.listen_addr = addr;
        self
    }

    #[must_use]
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout_secs = timeout.as_secs();
        self
    }

    #[must_use]
    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    #[must_use]
    pub fn with_google_client(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.google_client_id = Some(client_id.into());
        self.google_client_secret = Some(client_secret.into());
        self
    }

    #[must_use]
    pub fn with_populate_cache_on_read(mut self, populate: bool) -> Self {
        self.populate_cache_on_read = populate;
        self
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// OAuth client credentials, when both id and secret are configured.
    pub fn oauth_credentials(&self) -> Option<OAuthCredentials> {
        match (&self.google_client_id, &self.google_client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some(OAuthCredentials::new(id.clone(), secret.clone()))
            }
            _ => None,
        }
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("termcal")
            .join("config.toml")
    }
}

/// `<data dir>/termcal/termcal.db`, or the working directory when the
/// platform has no data dir.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("termcal")
        .join("termcal.db")
}
