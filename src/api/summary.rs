use crate::error::Result;
use crate::http_client::AuthGateway;
use crate::models::budget::validate_month;
use crate::models::Summary;
use crate::request::ApiRequest;

pub struct SummaryApi<'a> {
    gateway: &'a AuthGateway,
}

impl<'a> SummaryApi<'a> {
    pub(crate) fn new(gateway: &'a AuthGateway) -> Self {
        Self { gateway }
    }

    /// Summary for a month; the server defaults to the current month
    pub async fn get(&self, year: Option<i32>, month: Option<u32>) -> Result<Summary> {
        if let Some(month) = month {
            validate_month(month)?;
        }
        let request = ApiRequest::get("summary/")
            .query([("year", year.map(|y| y.to_string())), ("month", month.map(|m| m.to_string()))]);
        self.gateway.send_json(request).await
    }
}
