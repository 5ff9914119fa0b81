// Outbound request descriptor
// One per call; carries the single-use retry flag for the refresh-and-replay path

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, Result};

/// A fully formed API call, replayable because the body is kept as JSON
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<Value>,
    retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Validation(format!("request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Append query parameters; `None` values are skipped
    pub fn query<K, V>(mut self, params: impl IntoIterator<Item = (K, Option<V>)>) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        for (key, value) in params {
            if let Some(value) = value {
                self.query.push((key.into(), value.to_string()));
            }
        }
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Whether this request has already been replayed after a refresh
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    /// Mark the request as consumed by the refresh-and-replay path.
    /// There is no way to reset it.
    pub(crate) fn mark_retried(&mut self) {
        self.retried = true;
    }

    /// Set `Authorization: Bearer <token>`, replacing any existing value
    pub fn set_bearer(&mut self, token: &str) -> Result<()> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ApiError::Session("stored access token is not a valid header value".to_string()))?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(())
    }

    /// The bearer token currently attached, if any
    pub fn bearer(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_request_is_not_retried() {
        let mut request = ApiRequest::get("categories/");
        assert!(!request.is_retried());
        request.mark_retried();
        assert!(request.is_retried());
        // Cloning for a replay keeps the flag
        assert!(request.clone().is_retried());
    }

    #[test]
    fn test_query_skips_none() {
        let request = ApiRequest::get("budgets/").query([("year", Some(2024)), ("month", None)]);
        assert_eq!(
            request.query_pairs(),
            &[("year".to_string(), "2024".to_string())]
        );
    }

    #[test]
    fn test_json_body_is_kept_for_replay() {
        let request = ApiRequest::post("categories/")
            .json(&serde_json::json!({"name": "Food", "type": "expense"}))
            .unwrap();
        assert_eq!(request.body().unwrap()["name"], "Food");
    }

    #[test]
    fn test_invalid_token_is_rejected() {
        let mut request = ApiRequest::get("summary/");
        let err = request.set_bearer("bad\ntoken").unwrap_err();
        assert!(matches!(err, ApiError::Session(_)));
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    proptest! {
        #[test]
        fn prop_bearer_header_is_never_duplicated(
            tokens in proptest::collection::vec("[A-Za-z0-9._-]{1,40}", 1..5)
        ) {
            let mut request = ApiRequest::get("transactions/");
            for token in &tokens {
                request.set_bearer(token).unwrap();
            }

            let values: Vec<_> = request.headers().get_all(AUTHORIZATION).iter().collect();
            prop_assert_eq!(values.len(), 1);
            let expected = format!("Bearer {}", tokens.last().unwrap());
            prop_assert_eq!(values[0].to_str().unwrap(), expected.as_str());
            prop_assert_eq!(request.bearer(), Some(tokens.last().unwrap().as_str()));
        }
    }
}
