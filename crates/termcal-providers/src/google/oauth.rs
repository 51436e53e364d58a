//! Access-token refresh against Google's OAuth token endpoint.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use termcal_core::OAuthToken;
use tracing::info;

use crate::error::{ProviderError, ProviderResult};

/// Google's OAuth 2.0 token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// OAuth client identity used for refresh grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl OAuthCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

/// Exchanges refresh tokens for fresh access tokens.
#[derive(Debug, Clone)]
pub struct TokenRefresher {
    credentials: OAuthCredentials,
    http_client: reqwest::Client,
    token_url: String,
}

impl TokenRefresher {
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(credentials: OAuthCredentials, timeout: Duration) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ProviderError::configuration("failed to create HTTP client").with_source(e)
            })?;
        Ok(Self {
            credentials,
            http_client,
            token_url: GOOGLE_TOKEN_URL.to_string(),
        })
    }

    #[must_use]
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Refreshes `token` and returns the replacement.
    ///
    /// The refresh token is carried over unless the endpoint rotates it.
    ///
    /// # Errors
    ///
    /// Fails with an authentication error when the token has no refresh
    /// token or the grant is rejected.
    pub async fn refresh(
        &self,
        token: &OAuthToken,
        now: DateTime<Utc>,
    ) -> ProviderResult<OAuthToken> {
        let Some(refresh_token) = token.refresh_token.as_deref() else {
            return Err(ProviderError::authentication(
                "access token expired and no refresh token is stored",
            ));
        };

        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("token refresh request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::authentication(format!(
                "token refresh failed ({}): {}",
                status, body
            )));
        }

        let grant: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("invalid token response: {}", e))
        })?;

        info!("refreshed access token");
        let mut refreshed = token.refreshed(grant.access_token, grant.expires_in, now);
        if let Some(rotated) = grant.refresh_token {
            refreshed.refresh_token = Some(rotated);
        }
        if let Some(token_type) = grant.token_type {
            refreshed.token_type = token_type;
        }
        Ok(refreshed)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    token_type: Option<String>,
}
