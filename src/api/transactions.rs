use chrono::NaiveDate;

use crate::error::{ApiError, Result};
use crate::http_client::AuthGateway;
use crate::models::{DailyStats, Page, Transaction, TransactionFilter, TransactionInput};
use crate::request::ApiRequest;

pub struct TransactionsApi<'a> {
    gateway: &'a AuthGateway,
}

impl<'a> TransactionsApi<'a> {
    pub(crate) fn new(gateway: &'a AuthGateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, filter: &TransactionFilter) -> Result<Page<Transaction>> {
        filter.validate()?;
        let request = ApiRequest::get("transactions/").query(filter.query_pairs());
        self.gateway.send_json(request).await
    }

    pub async fn get(&self, id: i64) -> Result<Transaction> {
        self.gateway
            .send_json(ApiRequest::get(format!("transactions/{}/", id)))
            .await
    }

    pub async fn create(&self, input: &TransactionInput) -> Result<Transaction> {
        input.validate()?;
        let request = ApiRequest::post("transactions/").json(input)?;
        self.gateway.send_json(request).await
    }

    pub async fn update(&self, id: i64, input: &TransactionInput) -> Result<Transaction> {
        input.validate()?;
        let request = ApiRequest::put(format!("transactions/{}/", id)).json(input)?;
        self.gateway.send_json(request).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.gateway
            .send_empty(ApiRequest::delete(format!("transactions/{}/", id)))
            .await
    }

    /// Daily income/expense totals between two dates (inclusive)
    pub async fn stats(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<DailyStats>> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ApiError::Validation(
                    "start must not be after end".to_string(),
                ));
            }
        }
        let request = ApiRequest::get("transactions/stats/").query([("start", start), ("end", end)]);
        self.gateway.send_json(request).await
    }
}
