use crate::error::Result;
use crate::http_client::AuthGateway;
use crate::models::{Category, CategoryInput, Page};
use crate::request::ApiRequest;

pub struct CategoriesApi<'a> {
    gateway: &'a AuthGateway,
}

impl<'a> CategoriesApi<'a> {
    pub(crate) fn new(gateway: &'a AuthGateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Page<Category>> {
        self.gateway.send_json(ApiRequest::get("categories/")).await
    }

    pub async fn create(&self, input: &CategoryInput) -> Result<Category> {
        input.validate()?;
        let request = ApiRequest::post("categories/").json(input)?;
        self.gateway.send_json(request).await
    }

    pub async fn update(&self, id: i64, input: &CategoryInput) -> Result<Category> {
        input.validate()?;
        let request = ApiRequest::put(format!("categories/{}/", id)).json(input)?;
        self.gateway.send_json(request).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.gateway
            .send_empty(ApiRequest::delete(format!("categories/{}/", id)))
            .await
    }
}
