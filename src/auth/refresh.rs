// Token endpoint calls
// Both go out on the bare client: never through the gateway, never with a bearer header

use reqwest::{Client, Url};

use super::types::{
    token_preview, TokenObtainRequest, TokenObtainResponse, TokenRefreshRequest,
    TokenRefreshResponse,
};
use crate::error::{ApiError, Result};

/// Path of the login endpoint, relative to the API base
pub const TOKEN_OBTAIN_PATH: &str = "auth/token/";

/// Path of the refresh endpoint, relative to the API base
pub const TOKEN_REFRESH_PATH: &str = "auth/token/refresh/";

/// Exchange a refresh token for a new access token
pub async fn refresh_access_token(client: &Client, base: &Url, refresh_token: &str) -> Result<String> {
    let url = endpoint(base, TOKEN_REFRESH_PATH)?;
    tracing::debug!(url = %url, refresh = %token_preview(refresh_token), "Refreshing access token");

    let response = client
        .post(url)
        .json(&TokenRefreshRequest {
            refresh: refresh_token,
        })
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        tracing::error!(status = %status, "Refresh endpoint rejected the refresh token");
        return Err(ApiError::from_status(status, body));
    }

    // Body read failures are transport errors; only parsing is a decode error
    let bytes = response.bytes().await?;
    let data: TokenRefreshResponse = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::Decode(format!("refresh response: {}", e)))?;

    if data.access.is_empty() {
        return Err(ApiError::Decode(
            "refresh response does not contain an access token".to_string(),
        ));
    }

    tracing::info!(access = %token_preview(&data.access), "Access token refreshed");
    Ok(data.access)
}

/// Obtain a fresh token pair with username and password
pub async fn obtain_token_pair(
    client: &Client,
    base: &Url,
    username: &str,
    password: &str,
) -> Result<TokenObtainResponse> {
    let url = endpoint(base, TOKEN_OBTAIN_PATH)?;
    tracing::debug!(url = %url, username = %username, "Requesting token pair");

    let response = client
        .post(url)
        .json(&TokenObtainRequest { username, password })
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        return Err(ApiError::from_status(status, body));
    }

    let bytes = response.bytes().await?;
    let pair: TokenObtainResponse = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::Decode(format!("token response: {}", e)))?;

    if pair.access.is_empty() || pair.refresh.is_empty() {
        return Err(ApiError::Decode(
            "token response is missing access or refresh token".to_string(),
        ));
    }
    Ok(pair)
}

/// Resolve a relative API path against the base URL
pub fn endpoint(base: &Url, path: &str) -> Result<Url> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| ApiError::Validation(format!("invalid path {:?}: {}", path, e)))
}
