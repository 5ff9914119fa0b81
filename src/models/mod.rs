// Data models for the budget tracker REST API

pub mod budget;
pub mod category;
pub mod page;
pub mod summary;
pub mod transaction;
pub mod user;

pub use budget::{Budget, BudgetInput};
pub use category::{Category, CategoryInput, CategoryType};
pub use page::Page;
pub use summary::{CategoryAmount, Summary};
pub use transaction::{DailyStats, Transaction, TransactionFilter, TransactionInput};
pub use user::{RegisterRequest, RegisterResponse, User};
