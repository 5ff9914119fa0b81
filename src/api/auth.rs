use crate::error::Result;
use crate::http_client::AuthGateway;
use crate::models::{RegisterRequest, RegisterResponse};
use crate::request::ApiRequest;

/// Account endpoints: login/logout go to the token endpoints, register goes through the gateway
pub struct AuthApi<'a> {
    gateway: &'a AuthGateway,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(gateway: &'a AuthGateway) -> Self {
        Self { gateway }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.gateway.auth().login(username, password).await
    }

    pub fn logout(&self) -> Result<()> {
        self.gateway.auth().logout()
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        request.validate()?;
        let request = ApiRequest::post("register/").json(request)?;
        self.gateway.send_json(request).await
    }
}
