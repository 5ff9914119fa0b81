// Authentication types

use serde::{Deserialize, Serialize};

/// Access/refresh token pair as persisted in the session store.
/// Either token may be absent (logged out, or partially cleared).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl SessionTokens {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Which of the two session entries an operation addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Login request body for `POST /auth/token/`
#[derive(Debug, Serialize)]
pub struct TokenObtainRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Login response: a fresh token pair
#[derive(Debug, Deserialize)]
pub struct TokenObtainResponse {
    pub access: String,
    pub refresh: String,
}

/// Refresh request body for `POST /auth/token/refresh/`
#[derive(Debug, Serialize)]
pub struct TokenRefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Refresh response: only the access token is rotated
#[derive(Debug, Deserialize)]
pub struct TokenRefreshResponse {
    pub access: String,
}

/// How concurrent 401s share credential refreshes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshMode {
    /// Every rejected request refreshes on its own
    #[default]
    Independent,
    /// Refreshes are serialized; waiters reuse a token refreshed meanwhile
    Coalesced,
}

/// Short, log-safe prefix of a token
pub fn token_preview(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{}...", prefix)
}
