use anyhow::Context;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthManager, LogoutHandler, RefreshMode, RefreshOutcome, SessionStore};
use crate::error::{ApiError, Result};
use crate::request::ApiRequest;

/// Connection settings for the gateway's HTTP client
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    pub connect_timeout: u64,
    pub request_timeout: u64,
    pub refresh_mode: RefreshMode,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            connect_timeout: 10,
            request_timeout: 30,
            refresh_mode: RefreshMode::Independent,
        }
    }
}

/// Authenticated request gateway
///
/// Every API call goes through [`AuthGateway::send`], which:
/// - attaches the stored access token as a bearer credential before sending
/// - passes any non-401 outcome straight back to the caller
/// - on a first 401, refreshes the access token once and replays the request
/// - ends the session (clears tokens, fires the logout handler) when no
///   refresh is possible or the refresh call fails
pub struct AuthGateway {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// API base URL, always ending in `/`
    base_url: Url,

    /// Session and refresh flow
    auth: Arc<AuthManager>,
}

impl AuthGateway {
    /// Create a gateway with its own pooled client
    pub fn new(
        base_url: Url,
        store: Arc<dyn SessionStore>,
        logout: Arc<dyn LogoutHandler>,
        options: GatewayOptions,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(options.connect_timeout))
            .timeout(Duration::from_secs(options.request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(
            client,
            base_url,
            store,
            logout,
            options.refresh_mode,
        ))
    }

    /// Create a gateway around an existing client
    pub fn with_client(
        client: Client,
        base_url: Url,
        store: Arc<dyn SessionStore>,
        logout: Arc<dyn LogoutHandler>,
        refresh_mode: RefreshMode,
    ) -> Self {
        let base_url = with_trailing_slash(base_url);
        let auth = Arc::new(AuthManager::new(
            client.clone(),
            base_url.clone(),
            store,
            logout,
            refresh_mode,
        ));
        Self {
            client,
            base_url,
            auth,
        }
    }

    pub fn auth(&self) -> &AuthManager {
        &self.auth
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send a request with transparent re-authentication.
    ///
    /// Returns the response for any 2xx status. Other statuses come back as
    /// [`ApiError::Http`] with the body untouched, except 401, which is either
    /// recovered from (refresh + one replay) or surfaced as
    /// [`ApiError::Unauthorized`] / [`ApiError::RefreshFailed`].
    pub async fn send(&self, mut request: ApiRequest) -> Result<Response> {
        // Before send: attach the current credential
        if let Some(token) = self.auth.access_token()? {
            request.set_bearer(&token)?;
        }

        // Runs at most twice: the replay is marked retried before it goes out
        loop {
            let response = self.transmit(&request).await?;

            // After receive: only 401 is intercepted
            if response.status() != StatusCode::UNAUTHORIZED {
                return check_response(response).await;
            }

            let body = response.text().await?;

            if request.is_retried() {
                tracing::warn!(
                    method = %request.method(),
                    path = %request.path(),
                    "Replayed request still unauthorized, giving up"
                );
                return Err(ApiError::Unauthorized { body });
            }

            tracing::warn!(
                method = %request.method(),
                path = %request.path(),
                "Received 401, refreshing access token"
            );
            request.mark_retried();

            let rejected = request.bearer().map(str::to_owned);
            match self.auth.refresh_after_unauthorized(rejected.as_deref()).await? {
                RefreshOutcome::Refreshed(token) => request.set_bearer(&token)?,
                RefreshOutcome::NoRefreshToken => return Err(ApiError::Unauthorized { body }),
            }
        }
    }

    /// Send and decode a JSON response body
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let context = format!("{} {}", request.method(), request.path());
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(format!("{}: {}", context, e)))
    }

    /// Send and discard the response body (e.g. `204 No Content`)
    pub async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.send(request).await?;
        Ok(())
    }

    /// Put one attempt on the wire
    async fn transmit(&self, request: &ApiRequest) -> Result<Response> {
        let url = crate::auth::endpoint(&self.base_url, request.path())?;

        tracing::debug!(
            method = %request.method(),
            url = %url,
            retried = request.is_retried(),
            authenticated = request.bearer().is_some(),
            "Sending HTTP request"
        );

        let mut builder = self
            .client
            .request(request.method().clone(), url.clone())
            .headers(request.headers().clone());
        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        match builder.send().await {
            Ok(response) => {
                tracing::debug!(status = %response.status(), url = %url, "Received HTTP response");
                Ok(response)
            }
            Err(e) => {
                // Categorize the error for better debugging
                let error_kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connection_failed"
                } else if e.is_request() {
                    "request_error"
                } else {
                    "unknown"
                };
                tracing::warn!(error_kind = error_kind, error = %e, url = %url, "HTTP request error");
                Err(ApiError::Transport(e))
            }
        }
    }
}

/// Map a non-401 response onto the caller-facing result
async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await?;
    tracing::debug!(status = %status, "Returning error response to caller");
    Err(ApiError::Http { status, body })
}

/// Parse and normalize an API base URL
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ApiError::Validation(format!("invalid API URL {:?}: {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::Validation(format!(
            "API URL must use http or https: {}",
            raw
        )));
    }
    Ok(with_trailing_slash(url))
}

/// `Url::join` drops the last path segment unless the base ends in `/`
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
