use reqwest::{Client, Url};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::credentials::SessionStore;
use super::logout::LogoutHandler;
use super::refresh;
use super::types::{token_preview, RefreshMode, TokenKind};
use crate::error::{ApiError, Result};

/// Result of trying to recover from a 401
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A usable access token, either freshly issued or refreshed by a concurrent request
    Refreshed(String),
    /// No refresh token was stored; the session has been ended
    NoRefreshToken,
}

/// Authentication manager
/// Owns the session store and the logout signal, and runs the refresh flow
pub struct AuthManager {
    /// Bare client for token endpoint calls (no gateway, no bearer)
    client: Client,

    /// API base URL
    base_url: Url,

    /// Where the token pair lives
    store: Arc<dyn SessionStore>,

    /// Navigation facility fired on terminal failure
    logout: Arc<dyn LogoutHandler>,

    /// Concurrent refresh policy
    mode: RefreshMode,

    /// Held for the duration of a refresh in `RefreshMode::Coalesced`
    refresh_lock: Mutex<()>,
}

impl AuthManager {
    pub fn new(
        client: Client,
        base_url: Url,
        store: Arc<dyn SessionStore>,
        logout: Arc<dyn LogoutHandler>,
        mode: RefreshMode,
    ) -> Self {
        Self {
            client,
            base_url,
            store,
            logout,
            mode,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn mode(&self) -> RefreshMode {
        self.mode
    }

    /// Current access token, if any
    pub fn access_token(&self) -> Result<Option<String>> {
        self.store.access_token()
    }

    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.store.access_token()?.is_some() || self.store.refresh_token()?.is_some())
    }

    /// Log in with username and password, replacing any stored session
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let pair =
            refresh::obtain_token_pair(&self.client, &self.base_url, username, password).await?;
        self.store.save_pair(&pair.access, &pair.refresh)?;
        tracing::info!(username = %username, access = %token_preview(&pair.access), "Logged in");
        Ok(())
    }

    /// Voluntary logout: forget both tokens without firing the logout signal
    pub fn logout(&self) -> Result<()> {
        self.store.clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Involuntary logout: clear the session and fire the logout signal.
    /// Storage errors are logged; the signal fires regardless.
    pub fn end_session(&self) {
        if let Err(e) = self.store.clear() {
            tracing::error!("Failed to clear session after auth failure: {}", e);
        }
        self.logout.logged_out();
    }

    /// Recover from a 401 received while presenting `rejected_token`.
    ///
    /// Returns `NoRefreshToken` after ending the session when nothing can be
    /// refreshed, and `Err(ApiError::RefreshFailed)` after ending the session
    /// when the refresh call itself fails.
    pub async fn refresh_after_unauthorized(
        &self,
        rejected_token: Option<&str>,
    ) -> Result<RefreshOutcome> {
        match self.mode {
            RefreshMode::Independent => self.refresh().await,
            RefreshMode::Coalesced => {
                let _guard = self.refresh_lock.lock().await;

                // Someone refreshed while we waited
                let current = self.store.access_token()?;
                if let Some(token) = current {
                    if rejected_token != Some(token.as_str()) {
                        tracing::debug!(
                            access = %token_preview(&token),
                            "Reusing access token refreshed by a concurrent request"
                        );
                        return Ok(RefreshOutcome::Refreshed(token));
                    }
                }

                self.refresh().await
            }
        }
    }

    async fn refresh(&self) -> Result<RefreshOutcome> {
        let Some(refresh_token) = self.store.refresh_token()? else {
            tracing::warn!("Received 401 with no refresh token stored, ending session");
            self.end_session();
            return Ok(RefreshOutcome::NoRefreshToken);
        };

        match refresh::refresh_access_token(&self.client, &self.base_url, &refresh_token).await {
            Ok(access) => {
                // The replay still uses the new token even if it cannot be saved
                if let Err(e) = self.store.set(TokenKind::Access, &access) {
                    tracing::error!("Failed to persist refreshed access token: {}", e);
                }
                Ok(RefreshOutcome::Refreshed(access))
            }
            Err(e) => {
                tracing::error!("Token refresh failed: {}", e);
                self.end_session();
                Err(ApiError::RefreshFailed(Box::new(e)))
            }
        }
    }
}
