// Typed resource endpoints
// Thin wrappers that build `ApiRequest`s and send them through the gateway

mod auth;
mod budgets;
mod categories;
mod summary;
mod transactions;

pub use auth::AuthApi;
pub use budgets::BudgetsApi;
pub use categories::CategoriesApi;
pub use summary::SummaryApi;
pub use transactions::TransactionsApi;

use crate::http_client::AuthGateway;

impl AuthGateway {
    pub fn auth_api(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn categories(&self) -> CategoriesApi<'_> {
        CategoriesApi::new(self)
    }

    pub fn transactions(&self) -> TransactionsApi<'_> {
        TransactionsApi::new(self)
    }

    pub fn budgets(&self) -> BudgetsApi<'_> {
        BudgetsApi::new(self)
    }

    pub fn summary(&self) -> SummaryApi<'_> {
        SummaryApi::new(self)
    }
}
