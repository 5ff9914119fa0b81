use crate::error::Result;
use crate::http_client::AuthGateway;
use crate::models::budget::validate_month;
use crate::models::{Budget, BudgetInput, Page};
use crate::request::ApiRequest;

pub struct BudgetsApi<'a> {
    gateway: &'a AuthGateway,
}

impl<'a> BudgetsApi<'a> {
    pub(crate) fn new(gateway: &'a AuthGateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, year: Option<i32>, month: Option<u32>) -> Result<Page<Budget>> {
        if let Some(month) = month {
            validate_month(month)?;
        }
        let request = ApiRequest::get("budgets/")
            .query([("year", year.map(|y| y.to_string())), ("month", month.map(|m| m.to_string()))]);
        self.gateway.send_json(request).await
    }

    pub async fn create(&self, input: &BudgetInput) -> Result<Budget> {
        input.validate()?;
        let request = ApiRequest::post("budgets/").json(input)?;
        self.gateway.send_json(request).await
    }

    pub async fn update(&self, id: i64, input: &BudgetInput) -> Result<Budget> {
        input.validate()?;
        let request = ApiRequest::put(format!("budgets/{}/", id)).json(input)?;
        self.gateway.send_json(request).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.gateway
            .send_empty(ApiRequest::delete(format!("budgets/{}/", id)))
            .await
    }
}
