//! OAuth credentials stored per end-user.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Seconds subtracted from a token's expiry so it is refreshed slightly early.
const EXPIRY_SKEW_SECS: i64 = 60;

/// An OAuth token as issued by the upstream provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    /// The access token for API requests.
    pub access_token: String,

    /// The token type, usually `Bearer`.
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// The refresh token for obtaining new access tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// When the access token expires. Tokens without expiry never expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl OAuthToken {
    /// Creates a bearer token without refresh token or expiry.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
            refresh_token: None,
            expiry: None,
        }
    }

    /// Builder method to set the refresh token.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Builder method to set the expiry.
    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Returns true if the access token is expired or about to expire at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => now >= expiry - Duration::seconds(EXPIRY_SKEW_SECS),
            None => false,
        }
    }

    /// Returns a replacement token after a refresh.
    ///
    /// The refresh token is carried over since providers usually omit it
    /// from refresh responses.
    pub fn refreshed(
        &self,
        access_token: impl Into<String>,
        expires_in_secs: Option<i64>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: self.token_type.clone(),
            refresh_token: self.refresh_token.clone(),
            expiry: expires_in_secs.map(|secs| now + Duration::seconds(secs)),
        }
    }
}

/// A stored credential for one end-user.
///
/// `id` never changes once created. The token is only ever replaced as a
/// whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Stable identifier derived from the upstream account id.
    pub id: String,
    /// The OAuth token used to query the calendar.
    pub token: OAuthToken,
}

impl CredentialRecord {
    /// Creates a new credential record.
    pub fn new(id: impl Into<String>, token: OAuthToken) -> Self {
        Self {
            id: id.into(),
            token,
        }
    }

    /// Returns a copy of this record carrying a new token.
    pub fn with_token(&self, token: OAuthToken) -> Self {
        Self {
            id: self.id.clone(),
            token,
        }
    }
}
